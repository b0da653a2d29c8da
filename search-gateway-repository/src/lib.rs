//! # Search Gateway Repository
//!
//! This crate provides the document, index and search services of the search
//! gateway, the engine client trait they are built on, and a concrete
//! implementation of that trait for OpenSearch. Engine failures are normalized
//! into a closed error taxonomy before they reach callers.

pub mod config;
pub mod encoder;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod services;

pub use config::ServiceConfig;
pub use encoder::{BatchEncoder, BulkRequest};
pub use errors::{normalize, normalize_mapping_failure, EngineError, ErrorKind, SearchGatewayError};
pub use interfaces::{EngineClient, ALL_INDICES};
pub use opensearch::{default_mapping, EngineConnectionConfig, OpenSearchEngineClient};
pub use services::{BulkPolicy, DocumentService, IndexService, SearchService};
