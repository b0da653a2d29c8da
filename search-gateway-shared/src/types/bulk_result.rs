//! Bulk operation result types.
//!
//! A bulk result holds one item per submitted document or identifier, in the
//! order they were submitted.

use serde::{Deserialize, Serialize};

/// Bulk action kind as it appears in request headers and response items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    /// Create or replace a document.
    Index,
    /// Create a document, failing if it exists.
    Create,
    /// Partially update a document.
    Update,
    /// Delete a document.
    Delete,
}

impl BulkAction {
    /// The action name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Number of bulk entries one item of this action occupies.
    ///
    /// Write actions send a header followed by a body; deletes send the header only.
    pub fn entries_per_item(&self) -> usize {
        match self {
            Self::Delete => 1,
            _ => 2,
        }
    }
}

/// Error details attached to a failed bulk item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemError {
    /// Engine error type (e.g. `mapper_parsing_exception`).
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human readable reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Outcome of a single item within a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItem {
    /// The action the item was submitted with.
    pub action: BulkAction,
    /// Target index.
    pub index: String,
    /// Document identifier.
    pub id: String,
    /// HTTP-style status reported for this item.
    pub status: u16,
    /// Engine result (`created`, `updated`, `deleted`, `not_found`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Document version after the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Error details if the item failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BulkItemError>,
}

impl BulkItem {
    /// An item failed when the engine attached an error to it.
    ///
    /// A delete of a missing document reports `not_found` with a 404 status but
    /// no error, and is not a failure.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of a bulk operation.
///
/// `items` has the same length and order as the submitted batch, and
/// `had_errors` is true when at least one item failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    /// Engine-side processing time in milliseconds.
    pub took: u64,
    /// Whether any item failed.
    pub had_errors: bool,
    /// Per-item outcomes, in submission order.
    pub items: Vec<BulkItem>,
}

impl BulkResult {
    /// An empty result, used when there was nothing to send.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from items, deriving `had_errors` from them.
    pub fn from_items(took: u64, items: Vec<BulkItem>) -> Self {
        let had_errors = items.iter().any(BulkItem::is_failure);
        Self {
            took,
            had_errors,
            items,
        }
    }

    /// Append the items of a later batch, keeping submission order.
    pub fn extend(&mut self, other: BulkResult) {
        self.took += other.took;
        self.had_errors |= other.had_errors;
        self.items.extend(other.items);
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the result holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BulkItem> {
        self.items.iter().filter(|item| item.is_failure())
    }

    /// Number of failed items.
    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Number of successful items.
    pub fn succeeded_count(&self) -> usize {
        self.len() - self.failed_count()
    }

    /// Identifiers in result order.
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }
}
