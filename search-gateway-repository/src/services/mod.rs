//! Search gateway services.
//!
//! Application code uses these to manage indices, write and delete documents
//! and run autocomplete. Each service holds a shared `EngineClient` and returns
//! `SearchGatewayError` on failure.

mod document_service;
mod index_service;
mod search_service;

pub use document_service::{BulkPolicy, DocumentService};
pub use index_service::IndexService;
pub use search_service::{autocomplete_query, find_by_id_query, SearchService};

use tracing::warn;

use crate::errors::{normalize, normalize_mapping_failure, EngineError, SearchGatewayError};

/// Log a raw engine failure and normalize it.
///
/// The raw payload only ever reaches the log; callers get the normalized error.
pub(crate) fn engine_failure(operation: &str, index: &str, error: EngineError) -> SearchGatewayError {
    log_failure(operation, index, error, normalize)
}

/// Like [`engine_failure`], for mapping updates.
pub(crate) fn mapping_failure(index: &str, error: EngineError) -> SearchGatewayError {
    log_failure("apply_mapping", index, error, normalize_mapping_failure)
}

fn log_failure(
    operation: &str,
    index: &str,
    error: EngineError,
    normalizer: fn(&EngineError) -> SearchGatewayError,
) -> SearchGatewayError {
    let normalized = normalizer(&error);
    warn!(
        operation = operation,
        index = %index,
        kind = %normalized.kind(),
        raw = ?error,
        "Engine operation failed"
    );
    normalized
}
