//! Document lifecycle service.
//!
//! Writes, reads and deletes documents one at a time or in bulk. Bulk variants
//! go through the `BatchEncoder` and are sent as a single engine call unless
//! chunking is configured, then the partial-failure policy is applied.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use search_gateway_shared::{BulkResult, DeletedDocument, Document, PersistedDocument};

use crate::config::ServiceConfig;
use crate::encoder::{BatchEncoder, BulkRequest};
use crate::errors::SearchGatewayError;
use crate::interfaces::EngineClient;
use crate::services::engine_failure;

/// How a bulk operation reports item failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkPolicy {
    /// Return the per-item result whatever happened; the caller inspects it.
    #[default]
    Lenient,
    /// Report the whole operation as failed if any item failed.
    ///
    /// Items the engine already applied stay applied. This is a reporting
    /// policy, not a rollback.
    Strict,
}

impl BulkPolicy {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// The document service.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use search_gateway_repository::opensearch::{EngineConnectionConfig, OpenSearchEngineClient};
/// use search_gateway_repository::{BulkPolicy, DocumentService};
/// use search_gateway_shared::Document;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Arc::new(OpenSearchEngineClient::new(EngineConnectionConfig::new(
///     "http://localhost:9200",
/// ))?);
/// let service = DocumentService::new(engine);
///
/// let doc = Document::new().with_field("id", 1).with_field("title", "Iron Man");
/// let persisted = service.upsert("movies", doc).await?;
/// println!("{:?}", persisted.result);
///
/// let docs = vec![Document::new().with_field("id", 2).with_field("title", "Thor")];
/// let result = service.bulk_upsert("movies", &docs, BulkPolicy::Strict).await?;
/// assert!(!result.had_errors);
/// # Ok(())
/// # }
/// ```
pub struct DocumentService {
    engine: Arc<dyn EngineClient>,
    encoder: BatchEncoder,
    config: ServiceConfig,
}

impl DocumentService {
    /// Create a document service with default configuration.
    pub fn new(engine: Arc<dyn EngineClient>) -> Self {
        Self::with_config(engine, ServiceConfig::default())
    }

    /// Create a document service with custom configuration.
    pub fn with_config(engine: Arc<dyn EngineClient>, config: ServiceConfig) -> Self {
        Self {
            engine,
            encoder: BatchEncoder::from_config(&config),
            config,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Create or replace a document.
    ///
    /// The engine's `created`/`updated` result is returned unchanged.
    ///
    /// # Errors
    ///
    /// * `MissingIdentifier` - the document has no usable identifier; nothing is sent
    /// * `IndexNotFound` - the index does not exist
    #[instrument(skip(self, document), fields(index = %index))]
    pub async fn upsert(
        &self,
        index: &str,
        document: Document,
    ) -> Result<PersistedDocument, SearchGatewayError> {
        let id = document.identifier(&self.config.id_field).ok_or_else(|| {
            SearchGatewayError::missing_identifier(format!(
                "Document requires `{}` attribute for indexing",
                self.config.id_field
            ))
        })?;

        let persisted = self
            .engine
            .index_document(index, &id, &document)
            .await
            .map_err(|e| engine_failure("upsert", index, e))?;

        debug!(id = %persisted.id, result = ?persisted.result, "Document written");
        Ok(persisted)
    }

    /// Create or replace many documents in one bulk operation.
    ///
    /// Every document is checked for an identifier before anything is sent.
    /// The result lists one item per document, in input order.
    ///
    /// # Errors
    ///
    /// * `MissingIdentifier` - some document has no identifier; nothing is sent
    /// * `PartialBulkFailure` - strict policy and at least one item failed;
    ///   successful items remain written
    /// * any normalized engine error if the request as a whole failed
    #[instrument(skip(self, documents), fields(index = %index, count = documents.len()))]
    pub async fn bulk_upsert(
        &self,
        index: &str,
        documents: &[Document],
        policy: BulkPolicy,
    ) -> Result<BulkResult, SearchGatewayError> {
        if documents.is_empty() {
            return Ok(BulkResult::empty());
        }

        let request = self.encoder.encode_index(index, documents)?;
        let result = self.dispatch(index, request).await?;
        Self::apply_policy(result, policy, "index")
    }

    /// Fetch a document by identifier.
    ///
    /// Returns `Ok(None)` when the index exists but holds no such document.
    #[instrument(skip(self), fields(index = %index))]
    pub async fn get(&self, index: &str, id: &str) -> Result<Option<Document>, SearchGatewayError> {
        Self::require_identifier(id)?;

        self.engine
            .get_document(index, id)
            .await
            .map_err(|e| engine_failure("get", index, e))
    }

    /// Delete a document by identifier.
    ///
    /// # Errors
    ///
    /// * `IndexNotFound` - the index does not exist
    /// * `DocumentNotFound` - the index exists but the document does not
    #[instrument(skip(self), fields(index = %index))]
    pub async fn remove(&self, index: &str, id: &str) -> Result<DeletedDocument, SearchGatewayError> {
        Self::require_identifier(id)?;

        let deleted = self
            .engine
            .delete_document(index, id)
            .await
            .map_err(|e| engine_failure("remove", index, e))?;

        debug!(id = %deleted.id, "Document deleted");
        Ok(deleted)
    }

    /// Delete many documents in one bulk operation.
    ///
    /// Deleting an identifier that does not exist is reported per item with a
    /// `not_found` result and does not count as a failure.
    ///
    /// # Errors
    ///
    /// Same as [`bulk_upsert`](Self::bulk_upsert).
    #[instrument(skip(self, ids), fields(index = %index, count = ids.len()))]
    pub async fn bulk_remove(
        &self,
        index: &str,
        ids: &[String],
        policy: BulkPolicy,
    ) -> Result<BulkResult, SearchGatewayError> {
        if ids.is_empty() {
            return Ok(BulkResult::empty());
        }

        let request = self.encoder.encode_delete(index, ids)?;
        let result = self.dispatch(index, request).await?;
        Self::apply_policy(result, policy, "delete")
    }

    /// Like [`bulk_remove`](Self::bulk_remove), for identifiers given as raw JSON
    /// values (numbers are accepted and coerced).
    pub async fn bulk_remove_values(
        &self,
        index: &str,
        ids: &[Value],
        policy: BulkPolicy,
    ) -> Result<BulkResult, SearchGatewayError> {
        if ids.is_empty() {
            return Ok(BulkResult::empty());
        }

        let request = self.encoder.encode_delete_values(index, ids)?;
        let result = self.dispatch(index, request).await?;
        Self::apply_policy(result, policy, "delete")
    }

    fn require_identifier(id: &str) -> Result<(), SearchGatewayError> {
        if id.is_empty() {
            return Err(SearchGatewayError::missing_identifier(
                "Document identifier must not be empty",
            ));
        }
        Ok(())
    }

    /// Send an encoded request, in chunks if configured, and merge the results.
    ///
    /// Chunks go out sequentially. If one fails, earlier chunks stay applied
    /// and the failure is returned.
    async fn dispatch(
        &self,
        index: &str,
        request: BulkRequest,
    ) -> Result<BulkResult, SearchGatewayError> {
        let batches = match self.config.bulk_chunk_size {
            Some(chunk_size) => request.into_chunks(chunk_size),
            None => vec![request],
        };

        let mut combined = BulkResult::empty();
        for batch in &batches {
            let result = self
                .engine
                .bulk(batch)
                .await
                .map_err(|e| engine_failure("bulk", index, e))?;

            if result.len() != batch.item_count() {
                warn!(
                    index = %index,
                    sent = batch.item_count(),
                    received = result.len(),
                    "Bulk response item count does not match request"
                );
                return Err(SearchGatewayError::unknown_engine(format!(
                    "bulk response has {} items for {} submitted",
                    result.len(),
                    batch.item_count()
                )));
            }

            combined.extend(result);
        }

        Ok(combined)
    }

    /// Apply the partial-failure policy to a bulk result.
    fn apply_policy(
        result: BulkResult,
        policy: BulkPolicy,
        action: &str,
    ) -> Result<BulkResult, SearchGatewayError> {
        if !result.had_errors {
            return Ok(result);
        }

        let failed = result.failed_count();
        let total = result.len();
        warn!(
            action = action,
            failed = failed,
            total = total,
            failures = ?result.failures().collect::<Vec<_>>(),
            "Bulk operation had item failures"
        );

        if policy.is_strict() {
            return Err(SearchGatewayError::partial_bulk_failure(format!(
                "Failed to {} {} of {} documents",
                action, failed, total
            )));
        }
        Ok(result)
    }
}
