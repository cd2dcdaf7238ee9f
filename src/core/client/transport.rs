//! HTTP transport used by the resilient client.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::{StudioError, StudioResult};

/// User-Agent header value for API requests.
pub const USER_AGENT: &str = concat!("VoiceoverStudio/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// A single JSON-over-HTTP POST.
///
/// Implementations report every failure (connection error, non-success
/// status, unreadable body) as an `Err`; retrying is the caller's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> StudioResult<Value>;
}

/// Shared, type-erased transport.
pub type BoxedTransport = Arc<dyn Transport>;

/// Production transport backed by a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl ReqwestTransport {
    /// Create a transport that authenticates with `api_key` when present.
    pub fn new(api_key: Option<String>) -> StudioResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StudioError::ConfigurationError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_key })
    }

    fn build_request(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);

        match self.api_key.as_deref() {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &Value) -> StudioResult<Value> {
        let response = self
            .build_request(url, body)
            .send()
            .await
            .map_err(|e| StudioError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StudioError::NetworkError(format!(
                "HTTP error! status: {status}: {error_text}"
            )));
        }

        let value = response
            .json::<Value>()
            .await
            .map_err(|e| StudioError::NetworkError(format!("Failed to parse response: {e}")))?;

        debug!(url, status = status.as_u16(), "Request succeeded");
        Ok(value)
    }
}
