//! The uniform result returned by every store operation.
//!
//! Views never look at transport details: whatever happened on the wire ends
//! up as an [`OperationResult`] carrying a message, an HTTP-derived status and
//! a [`Severity`] used to pick the toast colour.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status used whenever no usable status is available.
pub const FALLBACK_STATUS: u16 = 500;

/// Message used when a response carries no message.
pub const DEFAULT_MESSAGE: &str = "Request completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    #[default]
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }

    /// Parse an upstream severity, tolerating case differences.
    ///
    /// Anything unrecognised maps to [`Severity::Error`].
    pub fn from_wire(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Normalized `{message, status, severity}` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub message: String,
    pub status: u16,
    pub severity: Severity,
}

impl OperationResult {
    pub fn new(message: impl Into<String>, status: u16, severity: Severity) -> Self {
        Self {
            message: message.into(),
            status: if status == 0 { FALLBACK_STATUS } else { status },
            severity,
        }
    }

    pub fn success(message: impl Into<String>, status: u16) -> Self {
        Self::new(message, status, Severity::Success)
    }

    pub fn error(message: impl Into<String>, status: u16) -> Self {
        Self::new(message, status, Severity::Error)
    }

    /// True when the status is 2xx and the severity is not an error.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.severity != Severity::Error
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.severity, self.status, self.message)
    }
}
