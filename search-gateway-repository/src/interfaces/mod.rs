//! Interface definitions for the search engine client.
//!
//! This module defines the abstract `EngineClient` trait that the services are
//! built on, so the engine connection can be injected and swapped in tests.

mod engine_client;

pub use engine_client::{EngineClient, ALL_INDICES};
