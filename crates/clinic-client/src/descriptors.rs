//! Route tables for each clinic entity.
//!
//! Most entities follow [`ServiceDescriptor::standard`]; the deviations
//! below mirror what the backend actually exposes.

use clinic_core::ResourceKind;
use reqwest::Method;

use crate::service::{Operation, ServiceDescriptor};

pub fn patients() -> ServiceDescriptor {
    ServiceDescriptor::standard(ResourceKind::Patient).search_param("query")
}

pub fn staff() -> ServiceDescriptor {
    ServiceDescriptor::standard(ResourceKind::Staff).search_param("name")
}

/// Roles have no aggregate endpoint.
pub fn roles() -> ServiceDescriptor {
    ServiceDescriptor::standard(ResourceKind::Role)
        .search_param("name")
        .without(Operation::Count)
}

/// Disabling an episode cancels it.
pub fn episodes() -> ServiceDescriptor {
    ServiceDescriptor::standard(ResourceKind::Episode)
        .route(Operation::Disable, Method::PATCH, "/episodes/{id}/cancel")
        .route(Operation::Enable, Method::PATCH, "/episodes/{id}/reopen")
}

pub fn episode_templates() -> ServiceDescriptor {
    ServiceDescriptor::standard(ResourceKind::EpisodeTemplate)
        .search_param("name")
        .without(Operation::Count)
}

/// "Active" appointments are the upcoming ones.
pub fn appointments() -> ServiceDescriptor {
    ServiceDescriptor::standard(ResourceKind::Appointment)
        .route(Operation::GetActive, Method::GET, "/appointments/upcoming")
        .without(Operation::Delete)
}

pub fn services() -> ServiceDescriptor {
    ServiceDescriptor::standard(ResourceKind::Service).search_param("name")
}

pub fn for_kind(kind: ResourceKind) -> ServiceDescriptor {
    match kind {
        ResourceKind::Patient => patients(),
        ResourceKind::Staff => staff(),
        ResourceKind::Role => roles(),
        ResourceKind::Episode => episodes(),
        ResourceKind::EpisodeTemplate => episode_templates(),
        ResourceKind::Appointment => appointments(),
        ResourceKind::Service => services(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_matching_descriptor() {
        for kind in ResourceKind::ALL {
            let d = for_kind(kind);
            assert_eq!(d.kind(), kind);
            assert!(d.supports(Operation::GetAll));
            assert!(d.supports(Operation::GetById));
            for (_, route) in d.routes() {
                assert!(route.template.starts_with(&format!("/{}", kind.collection())));
            }
        }
    }

    #[test]
    fn test_episode_disable_cancels() {
        let (_, path) = episodes().resolve(Operation::Disable, Some("e1")).unwrap();
        assert_eq!(path, "/episodes/e1/cancel");
    }

    #[test]
    fn test_roles_have_no_count() {
        assert!(!roles().supports(Operation::Count));
        assert_eq!(roles().search_param_name(), "name");
    }

    #[test]
    fn test_appointments_active_is_upcoming() {
        let (method, path) = appointments().resolve(Operation::GetActive, None).unwrap();
        assert_eq!(method, Method::GET);
        assert_eq!(path, "/appointments/upcoming");
        assert!(!appointments().supports(Operation::Delete));
    }
}
