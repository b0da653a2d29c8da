//! In-memory engine shared by the integration tests.
//!
//! Mimics the response shapes of a real engine closely enough for the
//! services' normalization and policy logic to be exercised end to end.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use search_gateway_repository::{BulkRequest, EngineClient, EngineError, ALL_INDICES};
use search_gateway_shared::{
    BulkAction, BulkItem, BulkItemError, BulkResult, Document, DocumentAcknowledgement,
    FieldMapping, IndexAcknowledgement, Mapping, WriteResult,
};

#[derive(Default)]
struct StoredIndex {
    documents: BTreeMap<String, (Document, i64)>,
    properties: BTreeMap<String, FieldMapping>,
}

#[derive(Default)]
struct EngineState {
    indices: HashMap<String, StoredIndex>,
    calls: Vec<String>,
    bulk_calls: Vec<BulkRequest>,
}

/// Engine that keeps everything in memory and records every call.
#[derive(Default)]
pub struct InMemoryEngine {
    state: Mutex<EngineState>,
    rejected_ids: HashSet<String>,
    unreachable: AtomicBool,
}

fn engine_error(status: u16, error_type: &str, reason: &str) -> EngineError {
    EngineError::from_response(
        status,
        json!({
            "error": { "type": error_type, "reason": reason },
            "status": status
        }),
    )
}

fn index_not_found(index: &str) -> EngineError {
    engine_error(
        404,
        "index_not_found_exception",
        &format!("no such index [{}]", index),
    )
}

fn rejected(id: &str) -> BulkItemError {
    BulkItemError {
        error_type: "mapper_parsing_exception".to_string(),
        reason: Some(format!("failed to parse document [{}]", id)),
    }
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents with these identifiers are refused with `mapper_parsing_exception`.
    pub fn rejecting(ids: &[&str]) -> Self {
        Self {
            rejected_ids: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Names of the engine operations called so far, in order.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn bulk_calls(&self) -> Vec<BulkRequest> {
        self.state.lock().await.bulk_calls.clone()
    }

    pub async fn document_count(&self, index: &str) -> usize {
        self.state
            .lock()
            .await
            .indices
            .get(index)
            .map_or(0, |stored| stored.documents.len())
    }

    async fn enter(&self, operation: &str) -> Result<tokio::sync::MutexGuard<'_, EngineState>, EngineError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(EngineError::transport("error sending request: connection refused"));
        }
        let mut state = self.state.lock().await;
        state.calls.push(operation.to_string());
        Ok(state)
    }

    fn write(stored: &mut StoredIndex, id: &str, document: Document) -> (WriteResult, i64) {
        let version = stored.documents.get(id).map_or(1, |(_, v)| v + 1);
        let result = if version == 1 {
            WriteResult::Created
        } else {
            WriteResult::Updated
        };
        stored.documents.insert(id.to_string(), (document, version));
        (result, version)
    }
}

#[async_trait]
impl EngineClient for InMemoryEngine {
    async fn index_exists(&self, index: &str) -> Result<bool, EngineError> {
        let state = self.enter("index_exists").await?;
        Ok(state.indices.contains_key(index))
    }

    async fn create_index(&self, index: &str) -> Result<IndexAcknowledgement, EngineError> {
        let mut state = self.enter("create_index").await?;

        if index.is_empty() || index.starts_with('_') || index.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(engine_error(
                400,
                "invalid_index_name_exception",
                &format!("Invalid index name [{}], must be lowercase", index),
            ));
        }
        if state.indices.contains_key(index) {
            return Err(engine_error(
                400,
                "resource_already_exists_exception",
                &format!("index [{}] already exists", index),
            ));
        }

        state.indices.insert(index.to_string(), StoredIndex::default());
        Ok(IndexAcknowledgement {
            acknowledged: true,
            index: Some(index.to_string()),
        })
    }

    async fn delete_index(&self, index: &str) -> Result<IndexAcknowledgement, EngineError> {
        let mut state = self.enter("delete_index").await?;

        if index == ALL_INDICES {
            state.indices.clear();
        } else if state.indices.remove(index).is_none() {
            return Err(index_not_found(index));
        }
        Ok(IndexAcknowledgement {
            acknowledged: true,
            index: None,
        })
    }

    async fn put_mapping(
        &self,
        index: &str,
        mapping: &Mapping,
    ) -> Result<IndexAcknowledgement, EngineError> {
        let mut state = self.enter("put_mapping").await?;
        let stored = state
            .indices
            .get_mut(index)
            .ok_or_else(|| index_not_found(index))?;

        for (field, incoming) in &mapping.properties {
            if let Some(existing) = stored.properties.get(field) {
                if existing.kind != incoming.kind {
                    return Err(engine_error(
                        400,
                        "illegal_argument_exception",
                        &format!(
                            "mapper [{}] cannot be changed from type [{:?}] to [{:?}]",
                            field, existing.kind, incoming.kind
                        ),
                    ));
                }
            }
        }
        for (field, incoming) in &mapping.properties {
            stored.properties.insert(field.clone(), incoming.clone());
        }

        Ok(IndexAcknowledgement {
            acknowledged: true,
            index: None,
        })
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Document,
    ) -> Result<DocumentAcknowledgement, EngineError> {
        let mut state = self.enter("index_document").await?;
        if self.rejected_ids.contains(id) {
            return Err(engine_error(
                400,
                "mapper_parsing_exception",
                &format!("failed to parse document [{}]", id),
            ));
        }
        let stored = state
            .indices
            .get_mut(index)
            .ok_or_else(|| index_not_found(index))?;

        let (result, version) = Self::write(stored, id, document.clone());
        Ok(DocumentAcknowledgement {
            index: index.to_string(),
            id: id.to_string(),
            result,
            version: Some(version),
        })
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Document>, EngineError> {
        let state = self.enter("get_document").await?;
        let stored = state.indices.get(index).ok_or_else(|| index_not_found(index))?;
        Ok(stored.documents.get(id).map(|(document, _)| document.clone()))
    }

    async fn delete_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<DocumentAcknowledgement, EngineError> {
        let mut state = self.enter("delete_document").await?;
        let stored = state
            .indices
            .get_mut(index)
            .ok_or_else(|| index_not_found(index))?;

        match stored.documents.remove(id) {
            Some((_, version)) => Ok(DocumentAcknowledgement {
                index: index.to_string(),
                id: id.to_string(),
                result: WriteResult::Deleted,
                version: Some(version + 1),
            }),
            None => Err(EngineError::from_response(
                404,
                json!({ "_index": index, "_id": id, "_version": 1, "result": "not_found" }),
            )),
        }
    }

    async fn bulk(&self, request: &BulkRequest) -> Result<BulkResult, EngineError> {
        let mut state = self.enter("bulk").await?;
        state.bulk_calls.push(request.clone());

        let action = request.action();
        let mut items = Vec::with_capacity(request.item_count());

        for (entry, id) in request
            .entries()
            .chunks(action.entries_per_item())
            .zip(request.ids())
        {
            let index = entry[0][action.as_str()]["_index"]
                .as_str()
                .unwrap_or_default()
                .to_string();

            let mut item = BulkItem {
                action,
                index: index.clone(),
                id: id.clone(),
                status: 200,
                result: None,
                version: None,
                error: None,
            };

            let Some(stored) = state.indices.get_mut(&index) else {
                item.status = 404;
                item.error = Some(BulkItemError {
                    error_type: "index_not_found_exception".to_string(),
                    reason: Some(format!("no such index [{}]", index)),
                });
                items.push(item);
                continue;
            };

            match action {
                BulkAction::Delete => match stored.documents.remove(id) {
                    Some((_, version)) => {
                        item.result = Some("deleted".to_string());
                        item.version = Some(version + 1);
                    }
                    None => {
                        item.status = 404;
                        item.result = Some("not_found".to_string());
                    }
                },
                _ if self.rejected_ids.contains(id) => {
                    item.status = 400;
                    item.error = Some(rejected(id));
                }
                _ => {
                    let body = entry.get(1).cloned().unwrap_or(Value::Null);
                    let document = Document::try_from(body).unwrap_or_default();
                    let (result, version) = Self::write(stored, id, document);
                    item.status = if result == WriteResult::Created { 201 } else { 200 };
                    item.result = Some(
                        match result {
                            WriteResult::Created => "created",
                            _ => "updated",
                        }
                        .to_string(),
                    );
                    item.version = Some(version);
                }
            }
            items.push(item);
        }

        Ok(BulkResult::from_items(1, items))
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Value, EngineError> {
        let state = self.enter("search").await?;
        let stored = state.indices.get(index).ok_or_else(|| index_not_found(index))?;

        let hits: Vec<Value> = match body["query"]["term"]["_id"].as_str() {
            Some(id) => stored
                .documents
                .get(id)
                .map(|(document, _)| json!({ "_index": index, "_id": id, "_source": document }))
                .into_iter()
                .collect(),
            None => Vec::new(),
        };

        Ok(json!({
            "took": 1,
            "timed_out": false,
            "hits": { "total": { "value": hits.len(), "relation": "eq" }, "hits": hits },
            "suggest": {}
        }))
    }
}
