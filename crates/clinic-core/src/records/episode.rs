use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{de_id, default_true};
use crate::dates::{ClinicDate, days_between};
use crate::resource::{Resource, ResourceKind, contains_ci};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EpisodeStatus {
    #[default]
    Open,
    Closed,
    Cancelled,
}

/// An episode of care for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    #[serde(default, deserialize_with = "de_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub status: EpisodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<ClinicDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<ClinicDate>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Episode {
    pub fn is_open(&self) -> bool {
        self.status == EpisodeStatus::Open
    }

    /// Length in days between start and end (or `until` for open episodes).
    pub fn duration_days(&self, until: ClinicDate) -> Option<i64> {
        let start = self.start_date?;
        Some(days_between(start, self.end_date.unwrap_or(until)))
    }
}

impl Resource for Episode {
    const KIND: ResourceKind = ResourceKind::Episode;

    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivating an episode cancels it; reactivating reopens a cancelled one.
    fn set_active(&mut self, active: bool) {
        self.active = active;
        match (active, self.status) {
            (false, _) => self.status = EpisodeStatus::Cancelled,
            (true, EpisodeStatus::Cancelled) => self.status = EpisodeStatus::Open,
            (true, _) => {}
        }
    }

    fn matches_text(&self, needle: &str) -> bool {
        contains_ci(&self.patient_id, needle)
            || self
                .template_id
                .as_deref()
                .is_some_and(|t| contains_ci(t, needle))
    }
}

/// Reusable package an episode can be opened from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeTemplate {
    #[serde(default, deserialize_with = "de_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_charge: Option<f64>,
    #[serde(default)]
    pub service_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for EpisodeTemplate {
    const KIND: ResourceKind = ResourceKind::EpisodeTemplate;

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
        contains_ci(&self.name, needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_open_episode_duration() {
        let episode: Episode = serde_json::from_str(
            r#"{"id":"e1","patientId":"p1","status":"OPEN","startDate":"2024-01-01"}"#,
        )
        .unwrap();
        assert!(episode.is_open());
        let until = ClinicDate::from_str("2024-01-31").unwrap();
        assert_eq!(episode.duration_days(until), Some(30));
    }

    #[test]
    fn test_closed_episode_uses_end_date() {
        let episode: Episode = serde_json::from_str(
            r#"{"id":"e2","patientId":"p1","status":"CLOSED","startDate":"2024-01-01","endDate":"2024-01-05"}"#,
        )
        .unwrap();
        assert!(!episode.is_open());
        let until = ClinicDate::from_str("2025-01-01").unwrap();
        assert_eq!(episode.duration_days(until), Some(4));
    }

    #[test]
    fn test_cancel_and_reopen_follow_active_flag() {
        let mut episode: Episode =
            serde_json::from_str(r#"{"id":"e3","patientId":"p1","status":"OPEN"}"#).unwrap();
        episode.set_active(false);
        assert_eq!(episode.status, EpisodeStatus::Cancelled);
        assert!(!episode.is_open());

        episode.set_active(true);
        assert!(episode.is_open());
        assert!(episode.active);

        let mut closed: Episode =
            serde_json::from_str(r#"{"id":"e4","patientId":"p1","status":"CLOSED"}"#).unwrap();
        closed.set_active(true);
        assert_eq!(closed.status, EpisodeStatus::Closed);
    }

    #[test]
    fn test_template_defaults() {
        let template: EpisodeTemplate =
            serde_json::from_str(r#"{"name":"Physio x10","packageCharge":4500.0}"#).unwrap();
        assert!(template.active);
        assert!(template.service_ids.is_empty());
        assert!(template.matches_text("physio"));
    }
}
