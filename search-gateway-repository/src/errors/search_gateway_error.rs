//! Search gateway error taxonomy.
//!
//! Every service operation fails with one of a fixed set of errors. Each error
//! carries a human readable reason and maps to an HTTP-style status code.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Tag identifying which kind of failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InvalidIndexName,
    AlreadyExists,
    IndexNotFound,
    DocumentNotFound,
    MissingIdentifier,
    InvalidMapping,
    PartialBulkFailure,
    UnknownEngineError,
}

impl ErrorKind {
    /// HTTP-style status code associated with the tag.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidIndexName => 400,
            Self::AlreadyExists => 409,
            Self::IndexNotFound => 404,
            Self::DocumentNotFound => 404,
            Self::MissingIdentifier => 400,
            Self::InvalidMapping => 400,
            Self::PartialBulkFailure => 500,
            Self::UnknownEngineError => 500,
        }
    }

    /// The tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidIndexName => "InvalidIndexName",
            Self::AlreadyExists => "AlreadyExists",
            Self::IndexNotFound => "IndexNotFound",
            Self::DocumentNotFound => "DocumentNotFound",
            Self::MissingIdentifier => "MissingIdentifier",
            Self::InvalidMapping => "InvalidMapping",
            Self::PartialBulkFailure => "PartialBulkFailure",
            Self::UnknownEngineError => "UnknownEngineError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified errors from search gateway operations.
///
/// Returned by `DocumentService`, `IndexService` and `SearchService`. Engine
/// failures reach this type only through [`normalize`](crate::errors::normalize);
/// `MissingIdentifier` and `PartialBulkFailure` are raised by the services
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchGatewayError {
    /// The engine rejected the index name.
    #[error("Invalid index name: {0}")]
    InvalidIndexName(String),

    /// An index with that name already exists.
    #[error("Index already exists: {0}")]
    AlreadyExists(String),

    /// The targeted index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// The index exists but the document does not.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// A document lacks its identifier. Raised before any engine call.
    #[error("Missing identifier: {0}")]
    MissingIdentifier(String),

    /// The mapping is incompatible with the index's existing mapping or data.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// A strict bulk operation had at least one failed item.
    #[error("Partial bulk failure: {0}")]
    PartialBulkFailure(String),

    /// Unrecognized engine failure, including connectivity loss.
    #[error("Unknown engine error: {0}")]
    UnknownEngineError(String),
}

impl SearchGatewayError {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        match kind {
            ErrorKind::InvalidIndexName => Self::InvalidIndexName(reason),
            ErrorKind::AlreadyExists => Self::AlreadyExists(reason),
            ErrorKind::IndexNotFound => Self::IndexNotFound(reason),
            ErrorKind::DocumentNotFound => Self::DocumentNotFound(reason),
            ErrorKind::MissingIdentifier => Self::MissingIdentifier(reason),
            ErrorKind::InvalidMapping => Self::InvalidMapping(reason),
            ErrorKind::PartialBulkFailure => Self::PartialBulkFailure(reason),
            ErrorKind::UnknownEngineError => Self::UnknownEngineError(reason),
        }
    }

    /// Create an invalid index name error.
    pub fn invalid_index_name(msg: impl Into<String>) -> Self {
        Self::InvalidIndexName(msg.into())
    }

    /// Create an index not found error.
    pub fn index_not_found(index: &str) -> Self {
        Self::IndexNotFound(format!("no such index [{}]", index))
    }

    /// Create a missing identifier error.
    pub fn missing_identifier(msg: impl Into<String>) -> Self {
        Self::MissingIdentifier(msg.into())
    }

    /// Create an invalid mapping error.
    pub fn invalid_mapping(msg: impl Into<String>) -> Self {
        Self::InvalidMapping(msg.into())
    }

    /// Create a partial bulk failure error.
    pub fn partial_bulk_failure(msg: impl Into<String>) -> Self {
        Self::PartialBulkFailure(msg.into())
    }

    /// Create an unknown engine error.
    pub fn unknown_engine(msg: impl Into<String>) -> Self {
        Self::UnknownEngineError(msg.into())
    }

    /// The taxonomy tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIndexName(_) => ErrorKind::InvalidIndexName,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::IndexNotFound(_) => ErrorKind::IndexNotFound,
            Self::DocumentNotFound(_) => ErrorKind::DocumentNotFound,
            Self::MissingIdentifier(_) => ErrorKind::MissingIdentifier,
            Self::InvalidMapping(_) => ErrorKind::InvalidMapping,
            Self::PartialBulkFailure(_) => ErrorKind::PartialBulkFailure,
            Self::UnknownEngineError(_) => ErrorKind::UnknownEngineError,
        }
    }

    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// The human readable reason, without the tag prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::InvalidIndexName(reason)
            | Self::AlreadyExists(reason)
            | Self::IndexNotFound(reason)
            | Self::DocumentNotFound(reason)
            | Self::MissingIdentifier(reason)
            | Self::InvalidMapping(reason)
            | Self::PartialBulkFailure(reason)
            | Self::UnknownEngineError(reason) => reason,
        }
    }
}
