use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The entity types managed by the admin client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Patient,
    Staff,
    Role,
    Episode,
    EpisodeTemplate,
    Appointment,
    Service,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        Self::Patient,
        Self::Staff,
        Self::Role,
        Self::Episode,
        Self::EpisodeTemplate,
        Self::Appointment,
        Self::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Staff => "staff",
            Self::Role => "role",
            Self::Episode => "episode",
            Self::EpisodeTemplate => "episode-template",
            Self::Appointment => "appointment",
            Self::Service => "service",
        }
    }

    /// REST collection segment, e.g. `patients` in `/patients/{id}`.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Patient => "patients",
            Self::Staff => "staff",
            Self::Role => "roles",
            Self::Episode => "episodes",
            Self::EpisodeTemplate => "episode-templates",
            Self::Appointment => "appointments",
            Self::Service => "services",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.collection() == normalized)
            .ok_or_else(|| CoreError::unknown_resource_kind(s))
    }
}

/// A record owned by a resource store.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> &str;

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    /// Case-insensitive free-text match used for client-side filtering.
    /// `needle` is already lower-cased.
    fn matches_text(&self, needle: &str) -> bool;
}

/// Aggregate counts for one entity, fetched independently of the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    /// Entity-specific breakdowns such as `oneTime`.
    #[serde(flatten)]
    pub breakdown: IndexMap<String, u64>,
}

impl CountSummary {
    pub fn inactive(&self) -> u64 {
        self.total.saturating_sub(self.active)
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        match key {
            "total" => Some(self.total),
            "active" => Some(self.active),
            other => self.breakdown.get(other).copied(),
        }
    }
}

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Client-side text filter. An empty or blank query keeps every record.
pub fn filter_by_text<R: Resource>(records: &[R], text: &str) -> Vec<R> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.matches_text(&needle))
        .cloned()
        .collect()
}

pub fn filter_active<R: Resource>(records: &[R], active: bool) -> Vec<R> {
    records
        .iter()
        .filter(|r| r.is_active() == active)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Role;

    fn role(id: &str, name: &str, active: bool) -> Role {
        Role {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            permissions: vec![],
            active,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("patients".parse::<ResourceKind>().unwrap(), ResourceKind::Patient);
        assert_eq!("Staff".parse::<ResourceKind>().unwrap(), ResourceKind::Staff);
        assert_eq!(
            "episode_templates".parse::<ResourceKind>().unwrap(),
            ResourceKind::EpisodeTemplate
        );
        assert!("invoices".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_kind_collection_roundtrip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.collection().parse::<ResourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_count_summary_breakdown() {
        let summary: CountSummary =
            serde_json::from_str(r#"{"total":12,"active":9,"oneTime":3}"#).unwrap();
        assert_eq!(summary.get("oneTime"), Some(3));
        assert_eq!(summary.get("total"), Some(12));
        assert_eq!(summary.inactive(), 3);
        assert_eq!(summary.get("missing"), None);
    }

    #[test]
    fn test_count_summary_defaults() {
        let summary: CountSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary, CountSummary::default());
    }

    #[test]
    fn test_filter_by_text() {
        let roles = vec![role("1", "Admin", true), role("2", "Reception", true)];
        let hits = filter_by_text(&roles, "  ADM ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
        assert_eq!(filter_by_text(&roles, "").len(), 2);
    }

    #[test]
    fn test_filter_active() {
        let roles = vec![role("1", "Admin", true), role("2", "Old", false)];
        assert_eq!(filter_active(&roles, false)[0].id, "2");
        assert_eq!(filter_active(&roles, true).len(), 1);
    }
}
