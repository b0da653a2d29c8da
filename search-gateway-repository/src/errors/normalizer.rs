//! Maps raw engine failures onto the error taxonomy.

use crate::errors::{EngineError, ErrorKind, SearchGatewayError};

/// Engine error types with a dedicated taxonomy tag.
const ERROR_TYPE_TABLE: &[(&str, ErrorKind)] = &[
    ("invalid_index_name_exception", ErrorKind::InvalidIndexName),
    ("resource_already_exists_exception", ErrorKind::AlreadyExists),
    ("index_already_exists_exception", ErrorKind::AlreadyExists),
    ("index_not_found_exception", ErrorKind::IndexNotFound),
    ("document_missing_exception", ErrorKind::DocumentNotFound),
    ("mapper_parsing_exception", ErrorKind::InvalidMapping),
    ("mapper_exception", ErrorKind::InvalidMapping),
    ("strict_dynamic_mapping_exception", ErrorKind::InvalidMapping),
];

/// Look up the taxonomy tag for an engine error type string.
pub fn kind_for_error_type(error_type: &str) -> Option<ErrorKind> {
    ERROR_TYPE_TABLE
        .iter()
        .find(|(name, _)| *name == error_type)
        .map(|(_, kind)| *kind)
}

/// Normalize a raw engine failure.
///
/// Recognized engine error types map through a static table. A response with
/// no error type but a `not_found` result is a missing document. Everything
/// else, transport and decode failures included, is `UnknownEngineError`.
/// Never panics.
pub fn normalize(error: &EngineError) -> SearchGatewayError {
    match error {
        EngineError::Response {
            status,
            error_type,
            reason,
            result,
            ..
        } => {
            let kind = match error_type.as_deref() {
                Some(error_type) => kind_for_error_type(error_type),
                None if result.as_deref() == Some("not_found") => Some(ErrorKind::DocumentNotFound),
                None => None,
            }
            .unwrap_or(ErrorKind::UnknownEngineError);

            let reason = reason
                .clone()
                .or_else(|| error_type.clone())
                .unwrap_or_else(|| match result.as_deref() {
                    Some(result) => format!("engine reported {} (status {})", result, status),
                    None => format!("engine responded with status {}", status),
                });

            SearchGatewayError::new(kind, reason)
        }
        EngineError::Transport(msg) => {
            SearchGatewayError::unknown_engine(format!("engine unreachable: {}", msg))
        }
        EngineError::Decode(msg) => {
            SearchGatewayError::unknown_engine(format!("unreadable engine response: {}", msg))
        }
    }
}

/// Normalize a failure raised by a mapping update.
///
/// The engine rejects a conflicting mapping change with
/// `illegal_argument_exception`, which only means `InvalidMapping` here.
/// Other failures normalize as usual.
pub fn normalize_mapping_failure(error: &EngineError) -> SearchGatewayError {
    match error {
        EngineError::Response {
            error_type: Some(error_type),
            reason,
            ..
        } if error_type == "illegal_argument_exception" => SearchGatewayError::invalid_mapping(
            reason.clone().unwrap_or_else(|| error_type.clone()),
        ),
        _ => normalize(error),
    }
}

impl From<EngineError> for SearchGatewayError {
    fn from(error: EngineError) -> Self {
        normalize(&error)
    }
}
