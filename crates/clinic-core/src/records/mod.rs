//! Typed clinic records.
//!
//! Every record keeps fields it does not know about in `extra`, so a record
//! fetched, edited and sent back never loses server-side data.

mod appointment;
mod episode;
mod patient;
mod role;
mod service;
mod staff;

pub use appointment::{Appointment, AppointmentStatus};
pub use episode::{Episode, EpisodeStatus, EpisodeTemplate};
pub use patient::Patient;
pub use role::Role;
pub use service::ClinicService;
pub use staff::{Staff, StaffType};

use serde::{Deserialize, Deserializer};

pub(crate) fn default_true() -> bool {
    true
}

/// Identifiers arrive as strings from most endpoints and as numbers from a
/// few older ones.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) => s,
        Some(RawId::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
