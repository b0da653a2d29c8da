// HTTP request handlers
use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use serde_json::{json, Value};
use tracing::{info, warn};

use search_gateway_repository::{BulkPolicy, ErrorKind, SearchGatewayError};
use search_gateway_shared::{
    BulkResult, DeletedDocument, Document, IndexAcknowledgement, Mapping, PersistedDocument,
};

use crate::fixture::load_fixture;
use crate::server::response::Outcome;
use crate::server::state::AppState;

/// Raw query string parameters. Values are validated by the handlers so a
/// bad value still gets an error envelope.
pub type QueryParams = HashMap<String, String>;

/// The non-empty `indexName` parameter, if any.
pub fn index_name_param(params: &QueryParams) -> Option<String> {
    params
        .get("indexName")
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

/// The bulk policy selected by the `strict` parameter (lenient when absent).
pub fn bulk_policy_param(params: &QueryParams) -> Result<BulkPolicy, SearchGatewayError> {
    match params.get("strict").map(|value| value.trim().to_ascii_lowercase()) {
        None => Ok(BulkPolicy::Lenient),
        Some(value) if value.is_empty() || value == "true" => Ok(BulkPolicy::Strict),
        Some(value) if value == "false" => Ok(BulkPolicy::Lenient),
        Some(value) => Err(SearchGatewayError::missing_identifier(format!(
            "`strict` must be true or false, got `{}`",
            value
        ))),
    }
}

/// Parse the autocomplete size path segment.
pub fn parse_size(size: &str) -> Result<usize, SearchGatewayError> {
    size.trim().parse().map_err(|_| {
        SearchGatewayError::missing_identifier(format!(
            "`size` must be a non-negative integer, got `{}`",
            size
        ))
    })
}

/// Parse a request body holding one document.
pub fn parse_document(body: &[u8]) -> Result<Document, SearchGatewayError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        SearchGatewayError::missing_identifier(format!("Request body is not a JSON document: {}", e))
    })?;
    Document::try_from(value)
        .map_err(|_| SearchGatewayError::missing_identifier("Request body must be a JSON object"))
}

/// Parse a request body holding an array of documents.
pub fn parse_documents(body: &[u8]) -> Result<Vec<Document>, SearchGatewayError> {
    let values: Vec<Value> = serde_json::from_slice(body).map_err(|e| {
        SearchGatewayError::missing_identifier(format!("Request body is not a JSON array: {}", e))
    })?;
    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            Document::try_from(value).map_err(|_| {
                SearchGatewayError::missing_identifier(format!(
                    "Document at position {} is not a JSON object",
                    position
                ))
            })
        })
        .collect()
}

/// Parse a request body holding an array of identifiers.
pub fn parse_identifiers(body: &[u8]) -> Result<Vec<Value>, SearchGatewayError> {
    serde_json::from_slice(body).map_err(|e| {
        SearchGatewayError::missing_identifier(format!(
            "Request body is not a JSON array of identifiers: {}",
            e
        ))
    })
}

/// Parse an optional mapping body. An empty body means "use the default mapping".
pub fn parse_mapping(body: &[u8]) -> Result<Option<Mapping>, SearchGatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| SearchGatewayError::invalid_mapping(format!("Malformed mapping: {}", e)))
}

/// Health check endpoint
pub async fn health_check() -> Outcome<Value> {
    Outcome::ok(json!({ "status": "ok" }))
}

pub async fn create_index(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Outcome<IndexAcknowledgement> {
    let Some(index) = index_name_param(&params) else {
        return Outcome::err(SearchGatewayError::invalid_index_name(
            "`indexName` query parameter is required",
        ));
    };

    info!(index = %index, "Create index requested");
    state.indices.create_index(&index).await.into()
}

/// Deletes the named index, or every index when no name is given.
pub async fn delete_index(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Outcome<IndexAcknowledgement> {
    match index_name_param(&params) {
        Some(index) => {
            info!(index = %index, "Delete index requested");
            state.indices.delete_index(&index).await.into()
        }
        None => {
            warn!("Delete of all indices requested");
            state.indices.delete_all_indices().await.into()
        }
    }
}

pub async fn apply_mapping(
    State(state): State<AppState>,
    Path(index): Path<String>,
    body: Bytes,
) -> Outcome<IndexAcknowledgement> {
    let mapping = match parse_mapping(&body) {
        Ok(Some(mapping)) => mapping,
        Ok(None) => state.indices.default_mapping(),
        Err(e) => return Outcome::err(e),
    };

    info!(index = %index, fields = mapping.len(), "Apply mapping requested");
    state.indices.apply_mapping(&index, &mapping).await.into()
}

pub async fn upsert_document(
    State(state): State<AppState>,
    Path(index): Path<String>,
    body: Bytes,
) -> Outcome<PersistedDocument> {
    let document = match parse_document(&body) {
        Ok(document) => document,
        Err(e) => return Outcome::err(e),
    };
    state.documents.upsert(&index, document).await.into()
}

pub async fn get_document(
    State(state): State<AppState>,
    Path((index, id)): Path<(String, String)>,
) -> Outcome<Document> {
    match state.documents.get(&index, &id).await {
        Ok(Some(document)) => Outcome::ok(document),
        Ok(None) => Outcome::err(SearchGatewayError::new(
            ErrorKind::DocumentNotFound,
            format!("document [{}] not found in [{}]", id, index),
        )),
        Err(e) => Outcome::err(e),
    }
}

pub async fn remove_document(
    State(state): State<AppState>,
    Path((index, id)): Path<(String, String)>,
) -> Outcome<DeletedDocument> {
    state.documents.remove(&index, &id).await.into()
}

pub async fn bulk_upsert(
    State(state): State<AppState>,
    Path(index): Path<String>,
    Query(params): Query<QueryParams>,
    body: Bytes,
) -> Outcome<BulkResult> {
    let policy = match bulk_policy_param(&params) {
        Ok(policy) => policy,
        Err(e) => return Outcome::err(e),
    };
    let documents = match parse_documents(&body) {
        Ok(documents) => documents,
        Err(e) => return Outcome::err(e),
    };

    info!(index = %index, count = documents.len(), ?policy, "Bulk upsert requested");
    state
        .documents
        .bulk_upsert(&index, &documents, policy)
        .await
        .into()
}

pub async fn bulk_remove(
    State(state): State<AppState>,
    Path(index): Path<String>,
    Query(params): Query<QueryParams>,
    body: Bytes,
) -> Outcome<BulkResult> {
    let policy = match bulk_policy_param(&params) {
        Ok(policy) => policy,
        Err(e) => return Outcome::err(e),
    };
    let ids = match parse_identifiers(&body) {
        Ok(ids) => ids,
        Err(e) => return Outcome::err(e),
    };

    info!(index = %index, count = ids.len(), ?policy, "Bulk remove requested");
    state
        .documents
        .bulk_remove_values(&index, &ids, policy)
        .await
        .into()
}

/// Loads the fixture file and bulk upserts it into the fixture index.
pub async fn populate(State(state): State<AppState>) -> Outcome<BulkResult> {
    let documents = match load_fixture(&state.fixture).await {
        Ok(documents) => documents,
        Err(e) => return Outcome::err(e.into()),
    };

    info!(
        index = %state.fixture.index,
        count = documents.len(),
        "Populating index from fixture"
    );
    state
        .documents
        .bulk_upsert(&state.fixture.index, &documents, BulkPolicy::Lenient)
        .await
        .into()
}

pub async fn autocomplete(
    State(state): State<AppState>,
    Path((term, size)): Path<(String, String)>,
) -> Outcome<Value> {
    let size = match parse_size(&size) {
        Ok(size) => size,
        Err(e) => return Outcome::err(e),
    };
    state
        .search
        .autocomplete(&state.fixture.index, &term, size)
        .await
        .into()
}

pub async fn find_movie(State(state): State<AppState>, Path(id): Path<String>) -> Outcome<Value> {
    state.search.find_by_id(&state.fixture.index, &id).await.into()
}
