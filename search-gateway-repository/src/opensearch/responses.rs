//! Parsing of OpenSearch response bodies.
//!
//! Kept free of I/O so the shapes can be tested without a running engine.

use serde::Deserialize;
use serde_json::Value;

use search_gateway_shared::{
    BulkAction, BulkItem, BulkItemError, BulkResult, Document, DocumentAcknowledgement,
    IndexAcknowledgement, WriteResult,
};

use crate::errors::EngineError;

/// Turn a raw response text into JSON. Empty bodies become `Null`, and bodies
/// that are not JSON are kept as a string so they can still be logged.
pub(crate) fn body_from_text(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

/// Pass successful bodies through; turn everything else into an `EngineError`.
pub(crate) fn ensure_success(status: u16, body: Value) -> Result<Value, EngineError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(EngineError::from_response(status, body))
    }
}

/// Parse an index-level acknowledgement (`create`, `delete`, `put_mapping`).
pub(crate) fn parse_index_ack(body: &Value) -> IndexAcknowledgement {
    IndexAcknowledgement {
        acknowledged: body
            .get("acknowledged")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        index: body.get("index").and_then(Value::as_str).map(str::to_owned),
    }
}

#[derive(Debug, Deserialize)]
struct RawWriteResponse {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_version")]
    version: Option<i64>,
    result: WriteResult,
}

/// Parse a single-document index or delete response.
pub(crate) fn parse_document_ack(body: Value) -> Result<DocumentAcknowledgement, EngineError> {
    let raw: RawWriteResponse =
        serde_json::from_value(body).map_err(|e| EngineError::decode(e.to_string()))?;
    Ok(DocumentAcknowledgement {
        index: raw.index,
        id: raw.id,
        result: raw.result,
        version: raw.version,
    })
}

/// Parse a get response.
///
/// A 404 without an engine error means the index exists but the document does
/// not; a 404 carrying `index_not_found_exception` stays an error.
pub(crate) fn parse_get_response(status: u16, body: Value) -> Result<Option<Document>, EngineError> {
    if status == 404 && body.get("error").is_none() {
        return Ok(None);
    }
    let body = ensure_success(status, body)?;

    if !body.get("found").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(None);
    }
    match body.get("_source") {
        Some(Value::Object(source)) => Ok(Some(Document::from(source.clone()))),
        _ => Err(EngineError::decode("get response has no `_source` object")),
    }
}

#[derive(Debug, Deserialize)]
struct RawBulkResponse {
    #[serde(default)]
    took: u64,
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<RawBulkEntry>,
}

/// Bulk response items are keyed by their action: `{"index": {...}}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawBulkEntry {
    Index(RawBulkItem),
    Create(RawBulkItem),
    Update(RawBulkItem),
    Delete(RawBulkItem),
}

#[derive(Debug, Deserialize)]
struct RawBulkItem {
    #[serde(rename = "_index", default)]
    index: String,
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(rename = "_version")]
    version: Option<i64>,
    result: Option<String>,
    status: u16,
    error: Option<Value>,
}

fn item_error(error: Value) -> BulkItemError {
    match error {
        Value::Object(error) => BulkItemError {
            error_type: error
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string(),
            reason: error.get("reason").and_then(Value::as_str).map(str::to_owned),
        },
        Value::String(reason) => BulkItemError {
            error_type: "unknown_error".to_string(),
            reason: Some(reason),
        },
        other => BulkItemError {
            error_type: "unknown_error".to_string(),
            reason: Some(other.to_string()),
        },
    }
}

/// Parse a bulk response into a `BulkResult`, keeping item order.
pub(crate) fn parse_bulk_response(body: Value) -> Result<BulkResult, EngineError> {
    let raw: RawBulkResponse =
        serde_json::from_value(body).map_err(|e| EngineError::decode(e.to_string()))?;

    let items = raw
        .items
        .into_iter()
        .map(|entry| {
            let (action, item) = match entry {
                RawBulkEntry::Index(item) => (BulkAction::Index, item),
                RawBulkEntry::Create(item) => (BulkAction::Create, item),
                RawBulkEntry::Update(item) => (BulkAction::Update, item),
                RawBulkEntry::Delete(item) => (BulkAction::Delete, item),
            };
            BulkItem {
                action,
                index: item.index,
                id: item.id,
                status: item.status,
                result: item.result,
                version: item.version,
                error: item.error.map(item_error),
            }
        })
        .collect();

    let mut result = BulkResult::from_items(raw.took, items);
    result.had_errors |= raw.errors;
    Ok(result)
}
