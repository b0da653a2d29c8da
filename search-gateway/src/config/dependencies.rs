//! Dependency initialization and wiring for the search gateway.

use std::sync::Arc;

use tracing::info;

use search_gateway_repository::{
    DocumentService, EngineClient, EngineConnectionConfig, IndexService, OpenSearchEngineClient,
    SearchService,
};

use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use crate::server::state::AppState;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared state handed to the HTTP handlers.
    pub state: AppState,
}

impl Dependencies {
    /// Build the engine client and services from configuration.
    ///
    /// No request is made to the engine here; an unreachable engine shows up
    /// as `UnknownEngineError` outcomes on the first calls.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        info!(
            engine_url = %config.engine_url,
            timeout_secs = config.engine_timeout.as_secs(),
            id_field = %config.service.id_field,
            document_kind = ?config.service.document_kind,
            bulk_chunk_size = ?config.service.bulk_chunk_size,
            "Initializing dependencies"
        );

        let connection =
            EngineConnectionConfig::new(config.engine_url.clone()).with_timeout(config.engine_timeout);
        let engine: Arc<dyn EngineClient> = Arc::new(OpenSearchEngineClient::new(connection)?);

        Ok(Self::with_engine(engine, config))
    }

    /// Wire the services around an existing engine client.
    pub fn with_engine(engine: Arc<dyn EngineClient>, config: &GatewayConfig) -> Self {
        let state = AppState {
            indices: Arc::new(IndexService::new(engine.clone())),
            documents: Arc::new(DocumentService::with_config(
                engine.clone(),
                config.service.clone(),
            )),
            search: Arc::new(SearchService::with_config(engine, &config.service)),
            fixture: Arc::new(config.fixture.clone()),
        };

        Self { state }
    }
}
