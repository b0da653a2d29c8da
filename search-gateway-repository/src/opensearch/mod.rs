//! OpenSearch implementation of the engine client.
//!
//! This module provides a concrete implementation of `EngineClient` using
//! OpenSearch as the backend, plus the default index mapping.

mod client;
mod index_config;
mod responses;

pub use client::{EngineConnectionConfig, OpenSearchEngineClient, DEFAULT_REQUEST_TIMEOUT};
pub use index_config::{default_mapping, DEFAULT_INDEX_NAME};
