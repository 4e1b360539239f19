use thiserror::Error;

/// Core error types for clinic client operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown resource kind: {0}")]
    UnknownResourceKind(String),

    #[error("Empty identifier for {resource}.{operation}")]
    EmptyIdentifier { resource: String, operation: String },

    #[error("No route for {resource}.{operation}")]
    MissingRoute { resource: String, operation: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(u32),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Create a new UnknownResourceKind error
    pub fn unknown_resource_kind(kind: impl Into<String>) -> Self {
        Self::UnknownResourceKind(kind.into())
    }

    /// Create a new EmptyIdentifier error
    pub fn empty_identifier(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::EmptyIdentifier {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// Create a new MissingRoute error
    pub fn missing_route(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::MissingRoute {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownResourceKind(_)
            | Self::EmptyIdentifier { .. }
            | Self::InvalidDate(_)
            | Self::InvalidPageSize(_)
            | Self::TimeError(_) => ErrorCategory::Validation,
            Self::MissingRoute { .. } | Self::Configuration(_) => ErrorCategory::Configuration,
            Self::JsonError(_) => ErrorCategory::Serialization,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Server,
    Transport,
    Serialization,
    Configuration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Server => write!(f, "server"),
            Self::Transport => write!(f, "transport"),
            Self::Serialization => write!(f, "serialization"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
