use std::time::Duration;

use clinic_core::{CoreError, DEFAULT_PAGE_SIZE};
use url::Url;

use crate::error::Result;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub page_size: u32,
    /// Bearer token issued by the auth service, if any.
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let config = Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            token: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(CoreError::configuration(format!(
                "Unsupported URL scheme '{}' (expected http or https)",
                self.base_url.scheme()
            ))
            .into());
        }
        if self.page_size == 0 {
            return Err(CoreError::InvalidPageSize(0).into());
        }
        if self.timeout.is_zero() {
            return Err(CoreError::configuration("Timeout must be positive").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("http://localhost:8080/api").unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ClientConfig::new("ftp://clinic.example.com").unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::Configuration(_))));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let config = ClientConfig::new("https://clinic.example.com")
            .unwrap()
            .with_page_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::new("https://clinic.example.com")
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .with_page_size(50)
            .with_token("abc");
        assert!(config.validate().is_ok());
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.page_size, 50);
    }
}
