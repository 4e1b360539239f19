use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{de_id, default_true};
use crate::dates::{ClinicDate, age_in_years, today_utc};
use crate::resource::{Resource, ResourceKind, contains_ci};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, deserialize_with = "de_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<ClinicDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn age_on(&self, on: ClinicDate) -> Option<u32> {
        self.date_of_birth.and_then(|dob| age_in_years(dob, on))
    }

    pub fn age_today(&self) -> Option<u32> {
        self.age_on(today_utc())
    }
}

impl Resource for Patient {
    const KIND: ResourceKind = ResourceKind::Patient;

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
        contains_ci(&self.full_name(), needle)
            || self.phone.as_deref().is_some_and(|p| contains_ci(p, needle))
            || self.email.as_deref().is_some_and(|e| contains_ci(e, needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample() -> Patient {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "firstName": "Asha",
            "lastName": "Menon",
            "dateOfBirth": "1985-09-30",
            "phone": "+91 98450 00000",
            "bloodGroup": "O+"
        }))
        .unwrap()
    }

    #[test]
    fn test_numeric_id_and_defaults() {
        let p = sample();
        assert_eq!(p.id, "42");
        assert!(p.active);
        assert_eq!(p.full_name(), "Asha Menon");
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["bloodGroup"], "O+");
        assert_eq!(value["dateOfBirth"], "1985-09-30");
    }

    #[test]
    fn test_age_on() {
        let p = sample();
        assert_eq!(p.age_on(ClinicDate::from_str("2025-09-29").unwrap()), Some(39));
        assert_eq!(p.age_on(ClinicDate::from_str("2025-09-30").unwrap()), Some(40));
    }

    #[test]
    fn test_matches_phone() {
        assert!(sample().matches_text("98450"));
        assert!(sample().matches_text("menon"));
        assert!(!sample().matches_text("rao"));
    }
}
