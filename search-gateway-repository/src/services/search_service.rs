//! Read path: autocomplete suggestions and lookup by identifier.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::config::ServiceConfig;
use crate::errors::SearchGatewayError;
use crate::interfaces::EngineClient;
use crate::services::engine_failure;

/// Build a completion-suggest request with one `<field>Suggester` per field.
pub fn autocomplete_query(prefix: &str, size: usize, fields: &[String]) -> Value {
    let suggesters: Map<String, Value> = fields
        .iter()
        .map(|field| {
            (
                format!("{}Suggester", field),
                json!({
                    "prefix": prefix,
                    "completion": {
                        "field": field,
                        "size": size,
                        "fuzzy": { "fuzziness": "auto" }
                    }
                }),
            )
        })
        .collect();

    json!({ "suggest": suggesters })
}

/// Build a term query on the document identifier.
pub fn find_by_id_query(id: &str) -> Value {
    json!({
        "query": {
            "term": { "_id": id }
        }
    })
}

/// Runs searches and returns the engine response unmodified.
pub struct SearchService {
    engine: Arc<dyn EngineClient>,
    suggest_fields: Vec<String>,
}

impl SearchService {
    pub fn new(engine: Arc<dyn EngineClient>) -> Self {
        Self::with_config(engine, &ServiceConfig::default())
    }

    pub fn with_config(engine: Arc<dyn EngineClient>, config: &ServiceConfig) -> Self {
        Self {
            engine,
            suggest_fields: config.suggest_fields.clone(),
        }
    }

    /// Suggest completions for `prefix` on every configured suggest field.
    #[instrument(skip(self), fields(index = %index))]
    pub async fn autocomplete(
        &self,
        index: &str,
        prefix: &str,
        size: usize,
    ) -> Result<Value, SearchGatewayError> {
        let query = autocomplete_query(prefix, size, &self.suggest_fields);
        debug!(fields = ?self.suggest_fields, "Running autocomplete");

        self.engine
            .search(index, &query)
            .await
            .map_err(|e| engine_failure("autocomplete", index, e))
    }

    #[instrument(skip(self), fields(index = %index))]
    pub async fn find_by_id(&self, index: &str, id: &str) -> Result<Value, SearchGatewayError> {
        self.engine
            .search(index, &find_by_id_query(id))
            .await
            .map_err(|e| engine_failure("find_by_id", index, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::BulkRequest;
    use crate::errors::{EngineError, ErrorKind};
    use async_trait::async_trait;
    use search_gateway_shared::{
        BulkResult, Document, DocumentAcknowledgement, IndexAcknowledgement, Mapping,
    };
    use tokio::sync::Mutex;

    /// Records search bodies and answers with a canned response.
    #[derive(Default)]
    struct MockEngine {
        searches: Mutex<Vec<(String, Value)>>,
        missing_index: bool,
    }

    #[async_trait]
    impl EngineClient for MockEngine {
        async fn index_exists(&self, _index: &str) -> Result<bool, EngineError> {
            Ok(!self.missing_index)
        }

        async fn create_index(&self, _index: &str) -> Result<IndexAcknowledgement, EngineError> {
            unimplemented!("not used by search service tests")
        }

        async fn delete_index(&self, _index: &str) -> Result<IndexAcknowledgement, EngineError> {
            unimplemented!("not used by search service tests")
        }

        async fn put_mapping(
            &self,
            _index: &str,
            _mapping: &Mapping,
        ) -> Result<IndexAcknowledgement, EngineError> {
            unimplemented!("not used by search service tests")
        }

        async fn index_document(
            &self,
            _index: &str,
            _id: &str,
            _document: &Document,
        ) -> Result<DocumentAcknowledgement, EngineError> {
            unimplemented!("not used by search service tests")
        }

        async fn get_document(
            &self,
            _index: &str,
            _id: &str,
        ) -> Result<Option<Document>, EngineError> {
            unimplemented!("not used by search service tests")
        }

        async fn delete_document(
            &self,
            _index: &str,
            _id: &str,
        ) -> Result<DocumentAcknowledgement, EngineError> {
            unimplemented!("not used by search service tests")
        }

        async fn bulk(&self, _request: &BulkRequest) -> Result<BulkResult, EngineError> {
            unimplemented!("not used by search service tests")
        }

        async fn search(&self, index: &str, body: &Value) -> Result<Value, EngineError> {
            if self.missing_index {
                return Err(EngineError::from_response(
                    404,
                    json!({ "error": { "type": "index_not_found_exception", "reason": "no such index [movies]" }, "status": 404 }),
                ));
            }
            self.searches
                .lock()
                .await
                .push((index.to_string(), body.clone()));
            Ok(json!({ "took": 2, "suggest": {} }))
        }
    }

    #[test]
    fn test_autocomplete_query_shape() {
        let fields = vec!["title".to_string(), "phase".to_string()];
        let query = autocomplete_query("iron", 5, &fields);

        let suggest = query["suggest"].as_object().unwrap();
        assert_eq!(suggest.len(), 2);
        assert_eq!(query["suggest"]["titleSuggester"]["prefix"], "iron");
        assert_eq!(query["suggest"]["titleSuggester"]["completion"]["field"], "title");
        assert_eq!(query["suggest"]["titleSuggester"]["completion"]["size"], 5);
        assert_eq!(
            query["suggest"]["phaseSuggester"]["completion"]["fuzzy"]["fuzziness"],
            "auto"
        );
    }

    #[test]
    fn test_find_by_id_query_shape() {
        assert_eq!(
            find_by_id_query("7"),
            json!({ "query": { "term": { "_id": "7" } } })
        );
    }

    #[tokio::test]
    async fn test_autocomplete_uses_configured_fields() {
        let engine = Arc::new(MockEngine::default());
        let config = ServiceConfig::default().with_suggest_fields(["name"]);
        let service = SearchService::with_config(engine.clone(), &config);

        let response = service.autocomplete("movies", "th", 3).await.unwrap();
        assert_eq!(response["took"], 2);

        let searches = engine.searches.lock().await;
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].0, "movies");
        assert!(searches[0].1["suggest"]["nameSuggester"].is_object());
        assert!(searches[0].1["suggest"].get("titleSuggester").is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_missing_index() {
        let engine = Arc::new(MockEngine {
            missing_index: true,
            ..MockEngine::default()
        });
        let service = SearchService::new(engine);

        let error = service.find_by_id("movies", "1").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IndexNotFound);
    }
}
