use clinic_core::{CoreError, ErrorCategory};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while talking to the clinic backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received (connection refused, DNS, timeout).
    #[error("Failed to connect to server: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Server {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    #[error("Failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response carried no data for {0}")]
    MissingData(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    pub fn server(status: u16, message: impl Into<String>, body: Option<Value>) -> Self {
        Self::Server {
            status,
            message: message.into(),
            body,
        }
    }

    pub fn missing_data(what: impl Into<String>) -> Self {
        Self::MissingData(what.into())
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404 | 410))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Server { status, .. } if matches!(status, 404 | 410) => ErrorCategory::NotFound,
            Self::Server { status, .. } if *status < 500 => ErrorCategory::Validation,
            Self::Server { .. } => ErrorCategory::Server,
            Self::Json(_) | Self::MissingData(_) => ErrorCategory::Serialization,
            Self::Url(_) => ErrorCategory::Configuration,
            Self::Core(e) => e.category(),
        }
    }
}

/// Convenience result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = ClientError::server(404, "Patient not found", None);
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "HTTP 404: Patient not found");
    }

    #[test]
    fn test_server_error_classification() {
        assert_eq!(
            ClientError::server(503, "down", None).category(),
            ErrorCategory::Server
        );
        assert_eq!(
            ClientError::server(422, "bad", None).category(),
            ErrorCategory::Validation
        );
    }

    #[test]
    fn test_core_error_passthrough() {
        let err: ClientError = CoreError::empty_identifier("staff", "disable").into();
        assert_eq!(err.to_string(), "Empty identifier for staff.disable");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_url_error_conversion() {
        let err: ClientError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ClientError::Url(_)));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
