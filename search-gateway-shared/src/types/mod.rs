//! Core data structures shared across the search gateway.

pub mod acknowledgement;
pub mod bulk_result;
pub mod document;
pub mod mapping;

pub use acknowledgement::{DocumentAcknowledgement, IndexAcknowledgement, WriteResult};
pub use bulk_result::{BulkAction, BulkItem, BulkItemError, BulkResult};
pub use document::Document;
pub use mapping::{FieldKind, FieldMapping, Mapping};
