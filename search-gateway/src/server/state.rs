// App state for the Axum server
use std::sync::Arc;

use search_gateway_repository::{DocumentService, IndexService, SearchService};

use crate::fixture::FixtureConfig;

#[derive(Clone)]
pub struct AppState {
    pub indices: Arc<IndexService>,
    pub documents: Arc<DocumentService>,
    pub search: Arc<SearchService>,
    pub fixture: Arc<FixtureConfig>,
}
