//! Error types for the search gateway repository.
//!
//! `EngineError` is the raw failure an engine client reports, `SearchGatewayError`
//! is the normalized taxonomy every service returns, and [`normalize`] maps the
//! former onto the latter.

mod engine_error;
mod normalizer;
mod search_gateway_error;

pub use engine_error::EngineError;
pub use normalizer::{kind_for_error_type, normalize, normalize_mapping_failure};
pub use search_gateway_error::{ErrorKind, SearchGatewayError};
