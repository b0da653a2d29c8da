//! OpenSearch engine client implementation.
//!
//! This module provides the concrete implementation of `EngineClient` using the
//! OpenSearch Rust crate.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesPutMappingParts},
    BulkParts, DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use search_gateway_shared::{
    BulkResult, Document, DocumentAcknowledgement, IndexAcknowledgement, Mapping,
};

use crate::encoder::BulkRequest;
use crate::errors::EngineError;
use crate::interfaces::EngineClient;
use crate::opensearch::responses;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the OpenSearch client.
#[derive(Debug, Clone)]
pub struct EngineConnectionConfig {
    /// Engine URL, e.g. `http://localhost:9200`.
    pub url: String,
    /// Per-request timeout applied by the transport.
    pub timeout: Duration,
}

impl EngineConnectionConfig {
    /// Settings for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenSearch engine client.
///
/// Wraps a single-node connection pool. The underlying transport pools HTTP
/// connections, so one instance serves any number of concurrent requests.
///
/// # Example
///
/// ```no_run
/// use search_gateway_repository::opensearch::{EngineConnectionConfig, OpenSearchEngineClient};
///
/// # fn example() -> Result<(), search_gateway_repository::EngineError> {
/// let client = OpenSearchEngineClient::new(EngineConnectionConfig::new("http://localhost:9200"))?;
/// # Ok(())
/// # }
/// ```
pub struct OpenSearchEngineClient {
    client: OpenSearch,
}

impl OpenSearchEngineClient {
    /// Create a client for the configured engine URL.
    ///
    /// No request is made; an unreachable engine surfaces on first use.
    pub fn new(config: EngineConnectionConfig) -> Result<Self, EngineError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| EngineError::transport(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EngineError::transport(e.to_string()))?;

        info!(
            url = %config.url,
            timeout_secs = config.timeout.as_secs(),
            "Created OpenSearch engine client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Read a response into its status and JSON body.
    async fn read(response: Response) -> Result<(u16, Value), EngineError> {
        let status = response.status_code().as_u16();
        let text = response.text().await?;
        Ok((status, responses::body_from_text(text)))
    }

    /// Read a response, failing on non-success statuses.
    async fn read_success(response: Response) -> Result<Value, EngineError> {
        let (status, body) = Self::read(response).await?;
        responses::ensure_success(status, body)
    }
}

#[async_trait]
impl EngineClient for OpenSearchEngineClient {
    async fn index_exists(&self, index: &str) -> Result<bool, EngineError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            // HEAD responses carry no body.
            status => Err(EngineError::from_response(status, Value::Null)),
        }
    }

    async fn create_index(&self, index: &str) -> Result<IndexAcknowledgement, EngineError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        debug!(index = %index, "Index created");
        Ok(responses::parse_index_ack(&body))
    }

    async fn delete_index(&self, index: &str) -> Result<IndexAcknowledgement, EngineError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        debug!(index = %index, "Index deleted");
        Ok(responses::parse_index_ack(&body))
    }

    async fn put_mapping(
        &self,
        index: &str,
        mapping: &Mapping,
    ) -> Result<IndexAcknowledgement, EngineError> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(mapping)
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        debug!(index = %index, fields = mapping.len(), "Mapping applied");
        Ok(responses::parse_index_ack(&body))
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Document,
    ) -> Result<DocumentAcknowledgement, EngineError> {
        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(document)
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        responses::parse_document_ack(body)
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Document>, EngineError> {
        let response = self
            .client
            .get(GetParts::IndexId(index, id))
            .send()
            .await?;

        let (status, body) = Self::read(response).await?;
        responses::parse_get_response(status, body)
    }

    async fn delete_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<DocumentAcknowledgement, EngineError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        responses::parse_document_ack(body)
    }

    async fn bulk(&self, request: &BulkRequest) -> Result<BulkResult, EngineError> {
        let body: Vec<JsonBody<Value>> = request
            .entries()
            .iter()
            .cloned()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        let result = responses::parse_bulk_response(body)?;
        debug!(
            action = request.action().as_str(),
            items = result.len(),
            had_errors = result.had_errors,
            took_ms = result.took,
            "Bulk request completed"
        );
        Ok(result)
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Value, EngineError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await?;

        Self::read_success(response).await
    }
}
