//! Field mapping types.
//!
//! A mapping tells the engine how each field is stored and analysed. It
//! serializes to the engine's `{"properties": {...}}` request body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Data kind of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Keyword,
    /// Prefix suggestions for autocomplete.
    Completion,
    SearchAsYouType,
    Date,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Object,
    Nested,
}

/// Storage and analysis settings for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// The field's data kind.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Analyzer applied at index time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    /// Analyzer applied to query input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_analyzer: Option<String>,
    /// Date format, for `date` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Whether the field is searchable at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
}

impl FieldMapping {
    /// A field of the given kind with engine defaults.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            analyzer: None,
            search_analyzer: None,
            format: None,
            index: None,
        }
    }

    /// A `keyword` field: stored verbatim, not analysed.
    pub fn keyword() -> Self {
        Self::new(FieldKind::Keyword)
    }

    /// A `completion` field analysed with `analyzer` at index and query time.
    pub fn completion(analyzer: impl Into<String>) -> Self {
        Self::new(FieldKind::Completion).with_analyzer(analyzer)
    }

    /// A `date` field accepting the given format expression.
    pub fn date(format: impl Into<String>) -> Self {
        Self::new(FieldKind::Date).with_format(format)
    }

    /// Use `analyzer` for both indexing and searching.
    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        let analyzer = analyzer.into();
        self.search_analyzer = Some(analyzer.clone());
        self.analyzer = Some(analyzer);
        self
    }

    /// Override the query-time analyzer.
    pub fn with_search_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.search_analyzer = Some(analyzer.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Store the field without making it searchable.
    pub fn not_indexed(mut self) -> Self {
        self.index = Some(false);
        self
    }
}

/// Field mapping for an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Field name to field settings, ordered by name.
    #[serde(default)]
    pub properties: BTreeMap<String, FieldMapping>,
}

impl Mapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field mapping and return the mapping.
    pub fn field(mut self, name: impl Into<String>, field: FieldMapping) -> Self {
        self.properties.insert(name.into(), field);
        self
    }

    /// Look up a field mapping.
    pub fn get(&self, name: &str) -> Option<&FieldMapping> {
        self.properties.get(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
