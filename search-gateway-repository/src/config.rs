//! Configuration types for the search gateway services.

/// Document kind tag expected by legacy engines that still accept `_type`.
pub const LEGACY_DOCUMENT_KIND: &str = "_doc";

/// Identifier field read from documents by default.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Completion fields queried by autocomplete by default.
pub const DEFAULT_SUGGEST_FIELDS: [&str; 2] = ["title", "phase"];

/// Configuration shared by the document and search services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Document field holding the caller-supplied identifier.
    pub id_field: String,

    /// Document kind tag (`_type`) embedded in every bulk header.
    ///
    /// `None` by default: OpenSearch 2.x rejects bulk requests whose headers
    /// carry `_type`. Set it only for legacy engines that require one.
    pub document_kind: Option<String>,

    /// Maximum number of documents per engine bulk call.
    ///
    /// `None` sends every bulk operation as one batch. Chunks are sent one
    /// after another and their results concatenated in input order.
    pub bulk_chunk_size: Option<usize>,

    /// Completion fields queried by autocomplete, one suggester per field.
    pub suggest_fields: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            id_field: DEFAULT_ID_FIELD.to_string(),
            document_kind: None,
            bulk_chunk_size: None,
            suggest_fields: DEFAULT_SUGGEST_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl ServiceConfig {
    /// Read identifiers from `field` instead of `id`.
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Use `kind` as the bulk header document kind tag.
    pub fn with_document_kind(mut self, kind: impl Into<String>) -> Self {
        self.document_kind = Some(kind.into());
        self
    }

    /// Leave the document kind tag out of bulk headers.
    pub fn without_document_kind(mut self) -> Self {
        self.document_kind = None;
        self
    }

    /// Split bulk operations into engine calls of at most `chunk_size` documents.
    ///
    /// A chunk size of zero leaves bulk operations unchunked.
    pub fn with_bulk_chunk_size(mut self, chunk_size: usize) -> Self {
        self.bulk_chunk_size = (chunk_size > 0).then_some(chunk_size);
        self
    }

    /// Query these completion fields for autocomplete.
    pub fn with_suggest_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggest_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}
