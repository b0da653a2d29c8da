//! Index lifecycle service.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use search_gateway_shared::{IndexAcknowledgement, Mapping};

use crate::errors::SearchGatewayError;
use crate::interfaces::{EngineClient, ALL_INDICES};
use crate::opensearch::default_mapping;
use crate::services::{engine_failure, mapping_failure};

/// Creates and deletes indices and applies mappings.
pub struct IndexService {
    engine: Arc<dyn EngineClient>,
}

/// An empty name would address the engine root (`HEAD /`, `DELETE /`).
fn require_index_name(index: &str) -> Result<(), SearchGatewayError> {
    if index.trim().is_empty() {
        return Err(SearchGatewayError::invalid_index_name("Index name must not be empty"));
    }
    Ok(())
}

impl IndexService {
    pub fn new(engine: Arc<dyn EngineClient>) -> Self {
        Self { engine }
    }

    /// Create an empty index.
    ///
    /// # Errors
    ///
    /// * `InvalidIndexName` - the name is empty or the engine rejected it
    /// * `AlreadyExists` - an index with that name exists
    #[instrument(skip(self))]
    pub async fn create_index(&self, index: &str) -> Result<IndexAcknowledgement, SearchGatewayError> {
        require_index_name(index)?;
        let ack = self
            .engine
            .create_index(index)
            .await
            .map_err(|e| engine_failure("create_index", index, e))?;

        info!(index = %index, acknowledged = ack.acknowledged, "Index created");
        Ok(ack)
    }

    /// Delete an index after checking that it exists.
    ///
    /// The check and the delete are two engine calls. A concurrent delete
    /// between them surfaces as the engine's own (normalized) error.
    #[instrument(skip(self))]
    pub async fn delete_index(&self, index: &str) -> Result<IndexAcknowledgement, SearchGatewayError> {
        require_index_name(index)?;
        let exists = self
            .engine
            .index_exists(index)
            .await
            .map_err(|e| engine_failure("index_exists", index, e))?;

        if !exists {
            warn!(index = %index, "Refusing to delete missing index");
            return Err(SearchGatewayError::index_not_found(index));
        }

        let ack = self
            .engine
            .delete_index(index)
            .await
            .map_err(|e| engine_failure("delete_index", index, e))?;

        info!(index = %index, "Index deleted");
        Ok(ack)
    }

    /// Delete every index on the engine.
    #[instrument(skip(self))]
    pub async fn delete_all_indices(&self) -> Result<IndexAcknowledgement, SearchGatewayError> {
        let ack = self
            .engine
            .delete_index(ALL_INDICES)
            .await
            .map_err(|e| engine_failure("delete_all_indices", ALL_INDICES, e))?;

        warn!("All indices deleted");
        Ok(ack)
    }

    /// Apply a mapping to an existing index. Re-applying the same mapping
    /// succeeds.
    ///
    /// # Errors
    ///
    /// * `InvalidMapping` - the mapping conflicts with existing fields or is malformed
    /// * `IndexNotFound` - the index does not exist
    #[instrument(skip(self, mapping), fields(fields = mapping.len()))]
    pub async fn apply_mapping(
        &self,
        index: &str,
        mapping: &Mapping,
    ) -> Result<IndexAcknowledgement, SearchGatewayError> {
        require_index_name(index)?;
        let ack = self
            .engine
            .put_mapping(index, mapping)
            .await
            .map_err(|e| mapping_failure(index, e))?;

        info!(index = %index, "Mapping applied");
        Ok(ack)
    }

    pub async fn index_exists(&self, index: &str) -> Result<bool, SearchGatewayError> {
        require_index_name(index)?;
        self.engine
            .index_exists(index)
            .await
            .map_err(|e| engine_failure("index_exists", index, e))
    }

    /// The bundled autocomplete mapping.
    pub fn default_mapping(&self) -> Mapping {
        default_mapping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::BulkRequest;
    use crate::errors::{EngineError, ErrorKind};
    use async_trait::async_trait;
    use search_gateway_shared::{BulkResult, Document, DocumentAcknowledgement};
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MockEngine {
        indices: Mutex<HashSet<String>>,
        deleted: Mutex<Vec<String>>,
        calls: AtomicUsize,
        unreachable: bool,
        conflicting: bool,
    }

    impl MockEngine {
        fn with_index(name: &str) -> Self {
            let mut indices = HashSet::new();
            indices.insert(name.to_string());
            Self {
                indices: Mutex::new(indices),
                ..Self::default()
            }
        }

        fn check_reachable(&self) -> Result<(), EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unreachable {
                return Err(EngineError::transport("connection refused"));
            }
            Ok(())
        }
    }

    fn ack(index: Option<&str>) -> IndexAcknowledgement {
        IndexAcknowledgement {
            acknowledged: true,
            index: index.map(str::to_owned),
        }
    }

    #[async_trait]
    impl EngineClient for MockEngine {
        async fn index_exists(&self, index: &str) -> Result<bool, EngineError> {
            self.check_reachable()?;
            Ok(self.indices.lock().await.contains(index))
        }

        async fn create_index(&self, index: &str) -> Result<IndexAcknowledgement, EngineError> {
            self.check_reachable()?;
            if index.chars().any(|c| c.is_ascii_uppercase()) {
                return Err(EngineError::from_response(
                    400,
                    json!({ "error": { "type": "invalid_index_name_exception", "reason": "must be lowercase" }, "status": 400 }),
                ));
            }
            if !self.indices.lock().await.insert(index.to_string()) {
                return Err(EngineError::from_response(
                    400,
                    json!({ "error": { "type": "resource_already_exists_exception", "reason": "already exists" }, "status": 400 }),
                ));
            }
            Ok(ack(Some(index)))
        }

        async fn delete_index(&self, index: &str) -> Result<IndexAcknowledgement, EngineError> {
            self.check_reachable()?;
            self.deleted.lock().await.push(index.to_string());
            let mut indices = self.indices.lock().await;
            if index == ALL_INDICES {
                indices.clear();
            } else {
                indices.remove(index);
            }
            Ok(ack(None))
        }

        async fn put_mapping(
            &self,
            index: &str,
            _mapping: &Mapping,
        ) -> Result<IndexAcknowledgement, EngineError> {
            self.check_reachable()?;
            if !self.indices.lock().await.contains(index) {
                return Err(EngineError::from_response(
                    404,
                    json!({ "error": { "type": "index_not_found_exception", "reason": "no such index [x]" }, "status": 404 }),
                ));
            }
            if self.conflicting {
                return Err(EngineError::from_response(
                    400,
                    json!({ "error": { "type": "illegal_argument_exception", "reason": "mapper [title] cannot be changed from type [text] to [long]" }, "status": 400 }),
                ));
            }
            Ok(ack(None))
        }

        async fn index_document(
            &self,
            _index: &str,
            _id: &str,
            _document: &Document,
        ) -> Result<DocumentAcknowledgement, EngineError> {
            unimplemented!("not used by index service tests")
        }

        async fn get_document(
            &self,
            _index: &str,
            _id: &str,
        ) -> Result<Option<Document>, EngineError> {
            unimplemented!("not used by index service tests")
        }

        async fn delete_document(
            &self,
            _index: &str,
            _id: &str,
        ) -> Result<DocumentAcknowledgement, EngineError> {
            unimplemented!("not used by index service tests")
        }

        async fn bulk(&self, _request: &BulkRequest) -> Result<BulkResult, EngineError> {
            unimplemented!("not used by index service tests")
        }

        async fn search(&self, _index: &str, _body: &Value) -> Result<Value, EngineError> {
            unimplemented!("not used by index service tests")
        }
    }

    #[tokio::test]
    async fn test_create_index() {
        let service = IndexService::new(Arc::new(MockEngine::default()));

        let ack = service.create_index("films").await.unwrap();
        assert!(ack.acknowledged);
        assert_eq!(ack.index.as_deref(), Some("films"));
        assert!(service.index_exists("films").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_index_twice() {
        let service = IndexService::new(Arc::new(MockEngine::default()));

        service.create_index("films").await.unwrap();
        let error = service.create_index("films").await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::AlreadyExists);
        assert_eq!(error.status_code(), 409);
    }

    #[tokio::test]
    async fn test_create_index_invalid_name() {
        let service = IndexService::new(Arc::new(MockEngine::default()));
        let error = service.create_index("Films").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidIndexName);
    }

    #[tokio::test]
    async fn test_delete_missing_index_checks_first() {
        let engine = Arc::new(MockEngine::default());
        let service = IndexService::new(engine.clone());

        let error = service.delete_index("films").await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::IndexNotFound);
        assert_eq!(error.reason(), "no such index [films]");
        assert!(engine.deleted.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_existing_index() {
        let engine = Arc::new(MockEngine::with_index("films"));
        let service = IndexService::new(engine.clone());

        service.delete_index("films").await.unwrap();

        assert!(!service.index_exists("films").await.unwrap());
        assert_eq!(engine.deleted.lock().await.as_slice(), &["films".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_all_indices() {
        let engine = Arc::new(MockEngine::with_index("films"));
        let service = IndexService::new(engine.clone());

        service.delete_all_indices().await.unwrap();

        assert_eq!(engine.deleted.lock().await.as_slice(), &[ALL_INDICES.to_string()]);
        assert!(engine.indices.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_indices_unreachable() {
        let engine = Arc::new(MockEngine {
            unreachable: true,
            ..MockEngine::default()
        });
        let service = IndexService::new(engine);

        let error = service.delete_all_indices().await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnknownEngineError);
        assert_eq!(error.status_code(), 500);
    }

    #[tokio::test]
    async fn test_apply_mapping_idempotent() {
        let service = IndexService::new(Arc::new(MockEngine::with_index("films")));
        let mapping = service.default_mapping();

        assert!(service.apply_mapping("films", &mapping).await.unwrap().acknowledged);
        assert!(service.apply_mapping("films", &mapping).await.unwrap().acknowledged);
    }

    #[tokio::test]
    async fn test_apply_mapping_missing_index() {
        let service = IndexService::new(Arc::new(MockEngine::default()));

        let error = service
            .apply_mapping("films", &default_mapping())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::IndexNotFound);
    }

    #[tokio::test]
    async fn test_apply_conflicting_mapping() {
        let mut engine = MockEngine::with_index("films");
        engine.conflicting = true;
        let service = IndexService::new(Arc::new(engine));

        let error = service
            .apply_mapping("films", &default_mapping())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidMapping);
        assert_eq!(error.status_code(), 400);
        assert!(error.reason().contains("mapper [title]"));
    }

    #[tokio::test]
    async fn test_empty_index_name_never_reaches_engine() {
        let engine = Arc::new(MockEngine::with_index("films"));
        let service = IndexService::new(engine.clone());

        for name in ["", "  "] {
            let error = service.delete_index(name).await.unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidIndexName);
            assert_eq!(error.status_code(), 400);

            let error = service.create_index(name).await.unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidIndexName);

            let error = service.apply_mapping(name, &default_mapping()).await.unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidIndexName);

            assert!(service.index_exists(name).await.is_err());
        }

        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
        assert!(engine.deleted.lock().await.is_empty());
        assert!(engine.indices.lock().await.contains("films"));
    }
}
