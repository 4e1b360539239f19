//! Response envelope handling.
//!
//! The backend wraps every body as
//! `{status, message, severity, data, page?}`. This module is the only place
//! that knows that shape: stores ask an [`ApiReply`] for its outcome, data and
//! page metadata, and turn a [`ClientError`] into a result with
//! [`normalize_failure`].

use clinic_core::outcome::{DEFAULT_MESSAGE, FALLBACK_STATUS};
use clinic_core::{OperationResult, PageMeta, Severity};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// A 2xx response from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    /// Transport-level status code.
    pub http_status: u16,
    /// Parsed body, `Value::Null` when the body was empty.
    pub body: Value,
}

impl ApiReply {
    pub fn new(http_status: u16, body: Value) -> Self {
        Self { http_status, body }
    }

    /// Normalized result of this reply.
    ///
    /// An empty body (e.g. `204 No Content`) has no envelope to read, so the
    /// transport status stands in for it.
    pub fn outcome(&self) -> OperationResult {
        if self.body.is_null() {
            return OperationResult::success(DEFAULT_MESSAGE, self.http_status);
        }
        normalize_success(&self.body)
    }

    /// Deserialize the envelope's `data` field. `Ok(None)` when absent or null.
    pub fn data<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match self.body.get("data") {
            None | Some(Value::Null) => Ok(None),
            Some(data) => Ok(Some(T::deserialize(data)?)),
        }
    }

    /// Page metadata, if the reply carried a well-formed `page` object.
    pub fn page(&self) -> Option<PageMeta> {
        self.body
            .get("page")
            .and_then(|page| PageMeta::deserialize(page).ok())
    }
}

fn message_of(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
}

fn status_of(body: &Value) -> Option<u16> {
    let raw = body.get("status")?;
    let status = match raw {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (100..=599)
        .contains(&status)
        .then(|| u16::try_from(status).ok())
        .flatten()
}

fn severity_of(body: &Value) -> Option<Severity> {
    body.get("severity")
        .and_then(Value::as_str)
        .map(Severity::from_wire)
}

/// Read `{message, status, severity}` out of a success body.
///
/// Missing fields default to `"Request completed"`, `500` and `error`, so a
/// body without an envelope is never mistaken for a success.
pub fn normalize_success(body: &Value) -> OperationResult {
    OperationResult::new(
        message_of(body).unwrap_or(DEFAULT_MESSAGE),
        status_of(body).unwrap_or(FALLBACK_STATUS),
        severity_of(body).unwrap_or(Severity::Error),
    )
}

/// Turn any failure into an error result. Severity is always `error`,
/// whatever the body claims.
pub fn normalize_failure(err: &ClientError) -> OperationResult {
    match err {
        ClientError::Server { status, body, .. } => {
            let body = body.as_ref();
            let message = body
                .and_then(message_of)
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            let status = body.and_then(status_of).unwrap_or(*status);
            OperationResult::error(message, status)
        }
        other => OperationResult::error(other.to_string(), FALLBACK_STATUS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let body = json!({"status": 201, "message": "Patient created", "severity": "SUCCESS"});
        let result = normalize_success(&body);
        assert_eq!(result.message, "Patient created");
        assert_eq!(result.status, 201);
        assert_eq!(result.severity, Severity::Success);
    }

    #[test]
    fn test_success_defaults_when_fields_missing() {
        let result = normalize_success(&json!({"data": []}));
        assert_eq!(result.message, "Request completed");
        assert_eq!(result.status, 500);
        assert_eq!(result.severity, Severity::Error);
    }

    #[test]
    fn test_out_of_range_status_falls_back() {
        let result = normalize_success(&json!({"status": 0, "severity": "info"}));
        assert_eq!(result.status, 500);
        let result = normalize_success(&json!({"status": "204", "severity": "success"}));
        assert_eq!(result.status, 204);
        let result = normalize_success(&json!({"status": -3, "severity": "success"}));
        assert_eq!(result.status, 500);
    }

    #[test]
    fn test_empty_body_uses_transport_status() {
        let reply = ApiReply::new(204, Value::Null);
        let result = reply.outcome();
        assert!(result.is_success());
        assert_eq!(result.status, 204);
    }

    #[test]
    fn test_failure_forces_error_severity() {
        let body = json!({"status": 404, "message": "Staff not found", "severity": "success"});
        let err = ClientError::server(404, "Not Found", Some(body));
        let result = normalize_failure(&err);
        assert_eq!(result.severity, Severity::Error);
        assert_eq!(result.status, 404);
        assert_eq!(result.message, "Staff not found");
    }

    #[test]
    fn test_failure_without_body_uses_error_message() {
        let err = ClientError::server(502, "Bad Gateway", None);
        let result = normalize_failure(&err);
        assert_eq!(result.status, 502);
        assert_eq!(result.message, "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_non_server_failure_is_500() {
        let err = ClientError::missing_data("patient");
        let result = normalize_failure(&err);
        assert_eq!(result.status, 500);
        assert_eq!(result.severity, Severity::Error);
        assert!(result.message.contains("patient"));
    }

    #[test]
    fn test_reply_data_and_page() {
        let reply = ApiReply::new(
            200,
            json!({
                "status": 200,
                "message": "ok",
                "severity": "success",
                "data": [1, 2, 3],
                "page": {"currentPage": 0, "pageSize": 3, "totalPages": 2, "totalItems": 5}
            }),
        );
        let data: Vec<u32> = reply.data().unwrap().unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(reply.page().unwrap().total_items, 5);
    }

    #[test]
    fn test_reply_missing_data_is_none() {
        let reply = ApiReply::new(200, json!({"status": 200, "data": null}));
        assert!(reply.data::<Vec<u32>>().unwrap().is_none());
        assert!(reply.page().is_none());
    }

    #[test]
    fn test_reply_bad_data_is_error() {
        let reply = ApiReply::new(200, json!({"data": "not a list"}));
        assert!(matches!(
            reply.data::<Vec<u32>>(),
            Err(ClientError::Json(_))
        ));
    }
}
