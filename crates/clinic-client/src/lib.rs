//! Data-access layer for the clinic admin backend.
//!
//! Each entity gets a [`ResourceService`] (route table plus dispatcher) and a
//! [`ResourceStore`] (list, pagination, counts and loading flag). Every store
//! operation reports back through a normalized [`OperationResult`]; only
//! [`ResourceStore::fetch_by_id`] surfaces a real error.
//!
//! ```ignore
//! use clinic_client::{ClientConfig, ClinicSession};
//!
//! let session = ClinicSession::new(&ClientConfig::new("https://clinic.example.com/api")?)?;
//! let result = session.patients.search("menon").await;
//! println!("{result}");
//! for patient in session.patients.items() {
//!     println!("{}", patient.full_name());
//! }
//! ```

pub mod config;
pub mod descriptors;
pub mod envelope;
pub mod error;
pub mod http;
pub mod service;
pub mod session;
pub mod store;
pub mod wrappers;

pub use clinic_core::{OperationResult, Severity};
pub use config::ClientConfig;
pub use envelope::{ApiReply, normalize_failure, normalize_success};
pub use error::{ClientError, Result};
pub use http::ApiClient;
pub use service::{ID_PLACEHOLDER, Operation, ResourceService, Route, ServiceDescriptor};
pub use session::ClinicSession;
pub use store::{ActiveQuery, MutationPolicy, ResourceStore, StoreOptions, StoreState};
pub use wrappers::{LoadingGuard, LoadingTracker, Outcome, run_command, run_query};
