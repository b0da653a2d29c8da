//! Bulk data fixture loading.
//!
//! A fixture is a JSON file whose top-level object holds an array of records
//! under a configured key, e.g. `{"movies": [{...}, {...}]}`.

use serde_json::Value;
use tracing::{debug, error};

use search_gateway_shared::Document;

use crate::errors::GatewayError;

/// Default fixture file path.
pub const DEFAULT_FIXTURE_PATH: &str = "./data/marvel_movies.json";

/// Default index the fixture is loaded into.
pub const DEFAULT_FIXTURE_INDEX: &str = "movies";

/// Default key holding the records.
pub const DEFAULT_FIXTURE_KEY: &str = "movies";

/// Where the fixture lives and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureConfig {
    pub path: String,
    pub index: String,
    pub key: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_FIXTURE_PATH.to_string(),
            index: DEFAULT_FIXTURE_INDEX.to_string(),
            key: DEFAULT_FIXTURE_KEY.to_string(),
        }
    }
}

/// Parse fixture text into documents.
pub fn parse_fixture(text: &str, key: &str) -> Result<Vec<Document>, GatewayError> {
    let root: Value = serde_json::from_str(text)
        .map_err(|e| GatewayError::fixture(format!("Invalid JSON: {}", e)))?;

    let records = match root.get(key) {
        Some(Value::Array(records)) => records,
        Some(_) => {
            return Err(GatewayError::fixture(format!(
                "`{}` is not an array of records",
                key
            )))
        }
        None => return Err(GatewayError::fixture(format!("Missing `{}` key", key))),
    };

    records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            Document::try_from(record.clone()).map_err(|_| {
                GatewayError::fixture(format!("Record at position {} is not an object", position))
            })
        })
        .collect()
}

/// Read and parse the configured fixture file.
pub async fn load_fixture(config: &FixtureConfig) -> Result<Vec<Document>, GatewayError> {
    let text = tokio::fs::read_to_string(&config.path).await.map_err(|e| {
        error!(path = %config.path, error = %e, "Failed to read fixture");
        GatewayError::fixture(format!("Cannot read {}: {}", config.path, e))
    })?;

    let documents = parse_fixture(&text, &config.key).inspect_err(|e| {
        error!(path = %config.path, error = %e, "Failed to parse fixture");
    })?;

    debug!(path = %config.path, records = documents.len(), "Fixture loaded");
    Ok(documents)
}
