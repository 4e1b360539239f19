use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{de_id, default_true};
use crate::resource::{Resource, ResourceKind, contains_ci};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default, deserialize_with = "de_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Role {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p.eq_ignore_ascii_case(permission))
    }
}

impl Resource for Role {
    const KIND: ResourceKind = ResourceKind::Role;

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
            || self
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, needle))
    }
}
