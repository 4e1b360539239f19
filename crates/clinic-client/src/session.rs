use std::sync::Arc;

use clinic_core::{
    Appointment, ClinicService, Episode, EpisodeTemplate, Pagination, Patient, Resource, Role,
    Staff,
};

use crate::config::ClientConfig;
use crate::descriptors;
use crate::error::Result;
use crate::http::ApiClient;
use crate::service::ResourceService;
use crate::store::{ResourceStore, StoreOptions};

/// One store per entity, all sharing a single [`ApiClient`].
///
/// Sessions are plain values: create one per logical user session (or per
/// test) instead of reaching for global state.
pub struct ClinicSession {
    client: Arc<ApiClient>,
    pub patients: ResourceStore<Patient>,
    pub staff: ResourceStore<Staff>,
    pub roles: ResourceStore<Role>,
    pub episodes: ResourceStore<Episode>,
    pub episode_templates: ResourceStore<EpisodeTemplate>,
    pub appointments: ResourceStore<Appointment>,
    pub services: ResourceStore<ClinicService>,
}

impl ClinicSession {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let pagination = Pagination::new(config.page_size)?;
        Self::with_options(
            config,
            StoreOptions {
                pagination,
                ..StoreOptions::default()
            },
        )
    }

    pub fn with_options(config: &ClientConfig, options: StoreOptions) -> Result<Self> {
        let client = Arc::new(ApiClient::new(config)?);
        Ok(Self {
            patients: store(&client, options),
            staff: store(&client, options),
            roles: store(&client, options),
            episodes: store(&client, options),
            episode_templates: store(&client, options),
            appointments: store(&client, options),
            services: store(&client, options),
            client,
        })
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}

/// Build a store for `R` from its standard descriptor.
pub fn store<R: Resource>(client: &Arc<ApiClient>, options: StoreOptions) -> ResourceStore<R> {
    let service = ResourceService::new(Arc::clone(client), descriptors::for_kind(R::KIND));
    ResourceStore::new(service, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_uses_configured_page_size() {
        let config = ClientConfig::new("http://localhost:1/api")
            .unwrap()
            .with_page_size(25);
        let session = ClinicSession::new(&config).unwrap();
        assert_eq!(session.patients.pagination().page_size, 25);
        assert_eq!(session.services.pagination().current_page, 0);
        assert!(!session.staff.is_loading());
        assert_eq!(session.client().base_url(), "http://localhost:1/api");
    }
}
