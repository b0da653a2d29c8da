//! # Search Gateway Shared
//!
//! This crate defines the data structures exchanged between the search gateway
//! services and the search engine: documents, field mappings, bulk results and
//! the acknowledgements returned by single-document and index operations.

pub mod types;

pub use types::acknowledgement::{
    DeletedDocument, DocumentAcknowledgement, IndexAcknowledgement, PersistedDocument, WriteResult,
};
pub use types::bulk_result::{BulkAction, BulkItem, BulkItemError, BulkResult};
pub use types::document::{coerce_identifier, Document};
pub use types::mapping::{FieldKind, FieldMapping, Mapping};
