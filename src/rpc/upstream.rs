// Upstream RPC client - forwards calls to an external provider

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::types::{JsonRpcRequest, JsonRpcResponse};

/// Upstream client errors
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Executes a call on the upstream provider
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Forward the request and return the provider's response as-is
    async fn forward(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, UpstreamError>;
}

/// JSON-RPC over HTTP upstream
pub struct HttpUpstream {
    url: String,
    client: Client,
}

impl HttpUpstream {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn forward(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, UpstreamError> {
        debug!("Forwarding {} to {}", request.method, self.url);

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpstreamError::Http(response.status().as_u16()));
        }

        response
            .json::<JsonRpcResponse>()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))
    }
}
