//! Gateway configuration read from the environment.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::warn;

use search_gateway_repository::ServiceConfig;

use crate::errors::GatewayError;
use crate::fixture::FixtureConfig;

/// Default engine URL.
const DEFAULT_ENGINE_URL: &str = "http://localhost:9200";

/// Default engine request timeout in seconds.
const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 30;

/// Default listen host.
const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default listen port.
const DEFAULT_SERVER_PORT: u16 = 3000;

/// Origins allowed by the CORS layer.
const ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Complete gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub engine_url: String,
    pub engine_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub service: ServiceConfig,
    pub fixture: FixtureConfig,
}

impl GatewayConfig {
    /// Read configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ENGINE_URL`: engine URL (default: http://localhost:9200, `ES_URL` accepted as fallback)
    /// - `ENGINE_TIMEOUT_SECS`: per-request timeout (default: 30)
    /// - `SERVER_HOST` / `PORT`: listen address (default: 127.0.0.1:3000)
    /// - `ID_FIELD`: document identifier field (default: id)
    /// - `DOCUMENT_KIND`: `_type` written in bulk headers (default: unset; `_doc` for legacy engines)
    /// - `BULK_CHUNK_SIZE`: maximum documents per bulk call (default: unchunked)
    /// - `SUGGEST_FIELDS`: comma separated autocomplete fields (default: title,phase)
    /// - `FIXTURE_PATH`, `FIXTURE_INDEX`, `FIXTURE_KEY`: bulk data fixture
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let engine_url = lookup("ENGINE_URL")
            .or_else(|| lookup("ES_URL"))
            .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string());
        let engine_timeout = Duration::from_secs(parse_or(
            &lookup,
            "ENGINE_TIMEOUT_SECS",
            DEFAULT_ENGINE_TIMEOUT_SECS,
        ));
        let host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_SERVER_PORT);

        let mut service = ServiceConfig::default();
        if let Some(id_field) = lookup("ID_FIELD").filter(|f| !f.trim().is_empty()) {
            service = service.with_id_field(id_field.trim());
        }
        match lookup("DOCUMENT_KIND") {
            Some(kind) if kind.trim().is_empty() => service = service.without_document_kind(),
            Some(kind) => service = service.with_document_kind(kind.trim()),
            None => {}
        }
        if let Some(chunk_size) = lookup("BULK_CHUNK_SIZE") {
            match chunk_size.trim().parse::<usize>() {
                Ok(chunk_size) => service = service.with_bulk_chunk_size(chunk_size),
                Err(_) => warn!(value = %chunk_size, "Invalid BULK_CHUNK_SIZE, bulk operations stay unchunked"),
            }
        }
        if let Some(fields) = lookup("SUGGEST_FIELDS") {
            let fields: Vec<String> = fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_owned)
                .collect();
            if !fields.is_empty() {
                service = service.with_suggest_fields(fields);
            }
        }

        let defaults = FixtureConfig::default();
        let fixture = FixtureConfig {
            path: lookup("FIXTURE_PATH").unwrap_or(defaults.path),
            index: lookup("FIXTURE_INDEX").unwrap_or(defaults.index),
            key: lookup("FIXTURE_KEY").unwrap_or(defaults.key),
        };

        Self {
            engine_url,
            engine_timeout,
            host,
            port,
            service,
            fixture,
        }
    }

    /// The socket address to listen on.
    pub fn listen_addr(&self) -> Result<SocketAddr, GatewayError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| GatewayError::config(format!("Invalid listen address: {}", e)))
    }
}

/// Parse a variable, falling back to `default` when unset or malformed.
fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Invalid value, using default");
            default
        }),
        None => default,
    }
}

/// Create CORS layer for local frontends.
pub fn create_cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}
