//! Acknowledgements returned by single-document and index operations.

use serde::{Deserialize, Serialize};

/// Result reported by the engine for a single-document write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteResult {
    Created,
    Updated,
    Deleted,
    NotFound,
    Noop,
}

/// Acknowledgement of a single-document write or delete.
///
/// The engine's `result` is forwarded as-is, so callers can tell a newly
/// created document from a replaced one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAcknowledgement {
    /// Index the document lives in.
    pub index: String,
    /// Document identifier.
    pub id: String,
    /// What the engine did.
    pub result: WriteResult,
    /// Document version after the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

/// A document that was written (created or updated).
pub type PersistedDocument = DocumentAcknowledgement;

/// A document that was deleted.
pub type DeletedDocument = DocumentAcknowledgement;

/// Acknowledgement of an index-level operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexAcknowledgement {
    pub acknowledged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}
