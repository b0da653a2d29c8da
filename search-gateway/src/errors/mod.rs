//! Error types for the search gateway binary.

use search_gateway_repository::{EngineError, SearchGatewayError};
use thiserror::Error;

/// Errors that can occur during gateway startup or while serving.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The bulk data fixture could not be read or parsed.
    #[error("Fixture error: {0}")]
    FixtureError(String),

    /// HTTP server error.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Error from a gateway service.
    #[error("Service error: {0}")]
    ServiceError(#[from] SearchGatewayError),
}

impl GatewayError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a fixture error.
    pub fn fixture(msg: impl Into<String>) -> Self {
        Self::FixtureError(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }
}

impl From<EngineError> for GatewayError {
    fn from(err: EngineError) -> Self {
        Self::ConfigError(format!("Failed to create engine client: {}", err))
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::ServerError(err.to_string())
    }
}
