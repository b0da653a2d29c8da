//! Bulk request encoding.
//!
//! Turns documents or identifiers into the engine's flat bulk body: a header
//! line per item, followed by the document itself for write actions.

use serde_json::{Map, Value};

use search_gateway_shared::{coerce_identifier, BulkAction, Document};

use crate::config::ServiceConfig;
use crate::errors::SearchGatewayError;

/// An encoded bulk request.
///
/// `entries` is the flat body sent to the engine; `ids` holds one identifier
/// per item, in the same order, so responses can be checked against it.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    action: BulkAction,
    entries: Vec<Value>,
    ids: Vec<String>,
}

impl BulkRequest {
    /// The action every item in this request performs.
    pub fn action(&self) -> BulkAction {
        self.action
    }

    /// The flat body: header, body, header, body, ... (or headers only for deletes).
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Identifiers in request order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of items (documents or identifiers) in the request.
    pub fn item_count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Split into consecutive requests of at most `max_items` items each.
    ///
    /// Item order is preserved across and within the returned requests.
    pub fn into_chunks(self, max_items: usize) -> Vec<BulkRequest> {
        let max_items = max_items.max(1);
        if self.item_count() <= max_items {
            return vec![self];
        }

        let stride = self.action.entries_per_item();
        self.entries
            .chunks(max_items * stride)
            .zip(self.ids.chunks(max_items))
            .map(|(entries, ids)| BulkRequest {
                action: self.action,
                entries: entries.to_vec(),
                ids: ids.to_vec(),
            })
            .collect()
    }
}

/// Encodes documents and identifiers into bulk requests.
#[derive(Debug, Clone)]
pub struct BatchEncoder {
    id_field: String,
    document_kind: Option<String>,
}

impl BatchEncoder {
    /// Create an encoder reading identifiers from `id_field`.
    pub fn new(id_field: impl Into<String>, document_kind: Option<String>) -> Self {
        Self {
            id_field: id_field.into(),
            document_kind,
        }
    }

    /// Create an encoder from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.id_field.clone(), config.document_kind.clone())
    }

    /// The document field identifiers are read from.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Build the action header for one item.
    fn header(&self, action: BulkAction, index: &str, id: &str) -> Value {
        let mut meta = Map::new();
        meta.insert("_index".to_string(), Value::from(index));
        if let Some(kind) = &self.document_kind {
            meta.insert("_type".to_string(), Value::from(kind.as_str()));
        }
        meta.insert("_id".to_string(), Value::from(id));

        let mut header = Map::new();
        header.insert(action.as_str().to_string(), Value::Object(meta));
        Value::Object(header)
    }

    /// Encode documents as `index` (create or replace) actions.
    ///
    /// Every document must carry a usable identifier. The first document
    /// without one fails the whole batch, so nothing is sent.
    pub fn encode_index(
        &self,
        index: &str,
        documents: &[Document],
    ) -> Result<BulkRequest, SearchGatewayError> {
        let mut entries = Vec::with_capacity(documents.len() * 2);
        let mut ids = Vec::with_capacity(documents.len());

        for (position, document) in documents.iter().enumerate() {
            let id = document.identifier(&self.id_field).ok_or_else(|| {
                SearchGatewayError::missing_identifier(format!(
                    "Document at position {} requires `{}` attribute for indexing",
                    position, self.id_field
                ))
            })?;

            entries.push(self.header(BulkAction::Index, index, &id));
            entries.push(Value::Object(document.as_map().clone()));
            ids.push(id);
        }

        Ok(BulkRequest {
            action: BulkAction::Index,
            entries,
            ids,
        })
    }

    /// Encode identifiers as `delete` actions.
    pub fn encode_delete(
        &self,
        index: &str,
        ids: &[String],
    ) -> Result<BulkRequest, SearchGatewayError> {
        if let Some(position) = ids.iter().position(|id| id.is_empty()) {
            return Err(SearchGatewayError::missing_identifier(format!(
                "Identifier at position {} is empty",
                position
            )));
        }

        let entries = ids
            .iter()
            .map(|id| self.header(BulkAction::Delete, index, id))
            .collect();

        Ok(BulkRequest {
            action: BulkAction::Delete,
            entries,
            ids: ids.to_vec(),
        })
    }

    /// Encode raw JSON identifiers as `delete` actions, coercing them first.
    pub fn encode_delete_values(
        &self,
        index: &str,
        ids: &[Value],
    ) -> Result<BulkRequest, SearchGatewayError> {
        let ids = ids
            .iter()
            .enumerate()
            .map(|(position, value)| {
                coerce_identifier(value).ok_or_else(|| {
                    SearchGatewayError::missing_identifier(format!(
                        "Identifier at position {} is not a string or number",
                        position
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.encode_delete(index, &ids)
    }
}
