//! Raw engine failures.
//!
//! `EngineError` is what an `EngineClient` returns. It keeps the engine's own
//! error shape so it can be logged in full; only the normalizer looks inside it.

use serde_json::Value;
use thiserror::Error;

/// A failure reported by, or while talking to, the search engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The engine answered with a non-success status.
    #[error("Engine responded with status {status} ({error_type:?}): {reason:?}")]
    Response {
        /// Status code, taken from the body's `status` field when present.
        status: u16,
        /// The engine's `error.type`, e.g. `index_not_found_exception`.
        error_type: Option<String>,
        /// The engine's `error.reason`, or a plain-string `error`.
        reason: Option<String>,
        /// The engine's `result`, e.g. `not_found` for a missing document.
        result: Option<String>,
        /// The complete response body.
        body: Value,
    },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The engine answered but the body could not be understood.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl EngineError {
    /// Build an error from a failed response's status and body.
    ///
    /// Handles both the structured `{"error": {"type", "reason"}, "status"}`
    /// shape and older plain-string `{"error": "..."}` bodies.
    pub fn from_response(status: u16, body: Value) -> Self {
        let (error_type, reason) = match body.get("error") {
            Some(Value::Object(error)) => (
                error.get("type").and_then(Value::as_str).map(str::to_owned),
                error.get("reason").and_then(Value::as_str).map(str::to_owned),
            ),
            Some(Value::String(message)) => (None, Some(message.clone())),
            _ => (None, None),
        };
        let result = body.get("result").and_then(Value::as_str).map(str::to_owned);
        let status = body
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(status);

        Self::Response {
            status,
            error_type,
            reason,
            result,
            body,
        }
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

impl From<opensearch::Error> for EngineError {
    fn from(err: opensearch::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_structured_body() {
        let body = json!({
            "error": {
                "type": "invalid_index_name_exception",
                "reason": "Invalid index name [-bad-index-name], must not start with '_', '-', or '+'",
                "index": "-bad-index-name"
            },
            "status": 400
        });

        match EngineError::from_response(500, body) {
            EngineError::Response {
                status,
                error_type,
                reason,
                result,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(error_type.as_deref(), Some("invalid_index_name_exception"));
                assert!(reason.unwrap().starts_with("Invalid index name"));
                assert!(result.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_not_found_delete_body() {
        let body = json!({ "_index": "films", "_id": "9", "result": "not_found" });

        match EngineError::from_response(404, body) {
            EngineError::Response {
                status,
                error_type,
                result,
                ..
            } => {
                assert_eq!(status, 404);
                assert!(error_type.is_none());
                assert_eq!(result.as_deref(), Some("not_found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_plain_string_error() {
        let body = json!({ "error": "Incorrect HTTP method", "status": 405 });

        match EngineError::from_response(405, body) {
            EngineError::Response {
                error_type, reason, ..
            } => {
                assert!(error_type.is_none());
                assert_eq!(reason.as_deref(), Some("Incorrect HTTP method"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_empty_body() {
        let error = EngineError::from_response(503, Value::Null);
        assert!(matches!(error, EngineError::Response { status: 503, .. }));
    }
}
