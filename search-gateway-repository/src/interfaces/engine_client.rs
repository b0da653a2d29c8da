//! Engine client trait definition.
//!
//! This module defines the only seam through which the services talk to the
//! search engine. Implementations own the connection and the request/response
//! shapes; they report failures as raw `EngineError`s and leave normalization
//! to the services.

use async_trait::async_trait;
use serde_json::Value;

use search_gateway_shared::{
    BulkResult, Document, DocumentAcknowledgement, IndexAcknowledgement, Mapping,
};

use crate::encoder::BulkRequest;
use crate::errors::EngineError;

/// Index name that addresses every index at once.
pub const ALL_INDICES: &str = "_all";

/// Abstracts the underlying search engine (OpenSearch, Elasticsearch, etc.).
///
/// One instance is shared by all services behind an `Arc`, so implementations
/// must support concurrent outstanding requests. No method retries.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Whether an index with this name exists.
    async fn index_exists(&self, index: &str) -> Result<bool, EngineError>;

    /// Create an index with engine-default settings.
    async fn create_index(&self, index: &str) -> Result<IndexAcknowledgement, EngineError>;

    /// Delete an index. [`ALL_INDICES`] deletes every index.
    async fn delete_index(&self, index: &str) -> Result<IndexAcknowledgement, EngineError>;

    /// Add field mappings to an existing index.
    async fn put_mapping(
        &self,
        index: &str,
        mapping: &Mapping,
    ) -> Result<IndexAcknowledgement, EngineError>;

    /// Create or replace the document stored under `id`.
    ///
    /// The acknowledgement's result tells whether the document was created or updated.
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Document,
    ) -> Result<DocumentAcknowledgement, EngineError>;

    /// Fetch a document's source. `Ok(None)` when the index exists but the document does not.
    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Document>, EngineError>;

    /// Delete the document stored under `id`.
    ///
    /// A missing document is an error with a `not_found` result.
    async fn delete_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<DocumentAcknowledgement, EngineError>;

    /// Submit a bulk request as a single engine call.
    ///
    /// Item failures are reported inside the `BulkResult`; an `Err` means the
    /// request as a whole was rejected or never answered.
    async fn bulk(&self, request: &BulkRequest) -> Result<BulkResult, EngineError>;

    /// Run a search request body against an index and return the raw response.
    async fn search(&self, index: &str, body: &Value) -> Result<Value, EngineError>;
}
