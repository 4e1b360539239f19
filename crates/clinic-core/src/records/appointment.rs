use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{de_id, default_true};
use crate::dates::ClinicDateTime;
use crate::resource::{Resource, ResourceKind, contains_ci};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default, deserialize_with = "de_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub patient_id: String,
    pub staff_id: String,
    pub scheduled_at: ClinicDateTime,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Appointment {
    /// Still scheduled and not yet started at `now`.
    pub fn is_upcoming(&self, now: ClinicDateTime) -> bool {
        self.status == AppointmentStatus::Scheduled && self.scheduled_at > now
    }
}

impl Resource for Appointment {
    const KIND: ResourceKind = ResourceKind::Appointment;

    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn matches_text(&self, needle: &str) -> bool {
        contains_ci(&self.patient_id, needle)
            || contains_ci(&self.staff_id, needle)
            || self.notes.as_deref().is_some_and(|n| contains_ci(n, needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_is_upcoming() {
        let appt: Appointment = serde_json::from_str(
            r#"{"id":"a1","patientId":"p1","staffId":"s1","scheduledAt":"2024-06-01T10:00:00Z"}"#,
        )
        .unwrap();
        let before = ClinicDateTime::from_str("2024-05-31T10:00:00Z").unwrap();
        let after = ClinicDateTime::from_str("2024-06-02T10:00:00Z").unwrap();
        assert!(appt.is_upcoming(before));
        assert!(!appt.is_upcoming(after));
    }

    #[test]
    fn test_cancelled_is_not_upcoming() {
        let appt: Appointment = serde_json::from_str(
            r#"{"id":"a2","patientId":"p1","staffId":"s1","scheduledAt":"2099-06-01T10:00:00Z","status":"CANCELLED"}"#,
        )
        .unwrap();
        let now = ClinicDateTime::from_str("2024-01-01T00:00:00Z").unwrap();
        assert!(!appt.is_upcoming(now));
    }
}
