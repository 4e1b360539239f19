pub mod config;
pub mod resource;
