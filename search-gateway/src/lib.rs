//! # Search Gateway
//!
//! HTTP gateway in front of an OpenSearch engine: index lifecycle, document
//! writes and deletes (single and bulk), fixture loading and autocomplete.
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`server`]: Axum router, handlers and the response envelope
//! - [`fixture`]: Bulk data fixture loading
//! - [`errors`]: Error types for the gateway

pub mod config;
pub mod errors;
pub mod fixture;
pub mod server;

pub use config::{Dependencies, GatewayConfig};
pub use errors::GatewayError;
