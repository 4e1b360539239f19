use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{de_id, default_true};
use crate::resource::{Resource, ResourceKind, contains_ci};

/// A billable service offered by the clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicService {
    #[serde(default, deserialize_with = "de_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<f64>,
    #[serde(default)]
    pub one_time: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for ClinicService {
    const KIND: ResourceKind = ResourceKind::Service;

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
