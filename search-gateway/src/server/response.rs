//! The success/error envelope every route responds with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use search_gateway_repository::{ErrorKind, SearchGatewayError};

use crate::errors::GatewayError;

#[derive(Debug, Serialize)]
struct SuccessEnvelope<T> {
    success: bool,
    result: T,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    reason: &'a str,
    status: u16,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    success: bool,
    error: ErrorBody<'a>,
}

/// Result of a route, rendered as `{"success": true, "result": ...}` or
/// `{"success": false, "error": {"type", "reason", "status"}}`.
///
/// Errors use their tag's status code as the HTTP status.
#[derive(Debug)]
pub struct Outcome<T>(pub Result<T, SearchGatewayError>);

impl<T> From<Result<T, SearchGatewayError>> for Outcome<T> {
    fn from(result: Result<T, SearchGatewayError>) -> Self {
        Self(result)
    }
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self(Ok(value))
    }

    pub fn err(error: SearchGatewayError) -> Self {
        Self(Err(error))
    }
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        match self.0 {
            Ok(result) => (
                StatusCode::OK,
                Json(SuccessEnvelope {
                    success: true,
                    result,
                }),
            )
                .into_response(),
            Err(error) => {
                let status = error.status_code();
                let envelope = ErrorEnvelope {
                    success: false,
                    error: ErrorBody {
                        kind: error.kind().as_str(),
                        reason: error.reason(),
                        status,
                    },
                };
                let code =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (code, Json(envelope)).into_response()
            }
        }
    }
}

/// Gateway-level failures reach callers as `UnknownEngineError`, except for
/// service errors which keep their own tag.
impl From<GatewayError> for SearchGatewayError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::ServiceError(error) => error,
            other => SearchGatewayError::new(ErrorKind::UnknownEngineError, other.to_string()),
        }
    }
}
