//! Document type for the search index.
//!
//! A document is an arbitrary JSON object. Its identity comes from the caller:
//! one configured field (usually `id`) carries the identifier that becomes the
//! engine-side `_id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document as it is stored in the search engine.
///
/// Documents are replaced wholesale on every write; there is no partial patch.
///
/// # Example
///
/// ```
/// use search_gateway_shared::Document;
///
/// let doc = Document::new()
///     .with_field("id", 1)
///     .with_field("title", "Iron Man");
///
/// assert_eq!(doc.identifier("id").as_deref(), Some("1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add a field and return the document, for building documents inline.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Resolve the document identifier stored under `field`.
    ///
    /// Returns `None` when the field is absent or cannot be used as an
    /// identifier (see [`coerce_identifier`]).
    pub fn identifier(&self, field: &str) -> Option<String> {
        self.0.get(field).and_then(coerce_identifier)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the document into its JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Value::Object(document.0)
    }
}

impl TryFrom<Value> for Document {
    type Error = Value;

    /// Accepts JSON objects only; any other value is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

/// Coerce a JSON value into the engine's identifier representation.
///
/// Non-empty strings are used as-is and numbers are rendered in their JSON
/// form (`1` becomes `"1"`). Every other value (null, empty string, booleans,
/// arrays, objects) is not an identifier.
pub fn coerce_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
