// HTTP client for the memory backend service

use crate::core::errors::GatewayError;
use crate::memory::{Answer, MemoryBackend, SearchResults};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

/// Thin JSON-over-HTTP client for the memory backend.
///
/// One request/response turnaround per call: no pooling guarantees beyond
/// reqwest's defaults, no retries, no backoff. A failed call is surfaced
/// immediately as `GatewayError::Backend`.
pub struct HttpMemoryBackend {
    http_client: Client,
    base_url: String,
    service_token: Option<String>,
}

impl HttpMemoryBackend {
    pub fn new(
        base_url: impl Into<String>,
        service_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, GatewayError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(2)) // Fail fast on connection
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                GatewayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_token,
        })
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Forwarding backend operation");

        let mut request = self.http_client.post(&url).json(&body);
        if let Some(token) = &self.service_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!(url = %url, error = %e, "Backend request failed");
            GatewayError::Backend(format!("request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(url = %url, status = %status, detail = %detail, "Backend returned error status");
            return Err(GatewayError::Backend(format!(
                "backend returned HTTP {}",
                status.as_u16()
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            error!(url = %url, error = %e, "Backend returned invalid JSON");
            GatewayError::Backend(format!("invalid response body: {}", e))
        })
    }
}

#[async_trait]
impl MemoryBackend for HttpMemoryBackend {
    async fn add(
        &self,
        user_id: &str,
        text: &str,
        metadata: Value,
    ) -> Result<Value, GatewayError> {
        self.post_json(
            "/memories/add",
            json!({ "user_id": user_id, "text": text, "metadata": metadata }),
        )
        .await
    }

    async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<SearchResults, GatewayError> {
        let value = self
            .post_json(
                "/memories/search",
                json!({ "user_id": user_id, "query": query, "limit": limit }),
            )
            .await?;
        serde_json::from_value(value)
            .map_err(|e| GatewayError::Backend(format!("malformed search result: {}", e)))
    }

    async fn ask(&self, user_id: &str, question: &str) -> Result<Answer, GatewayError> {
        let value = self
            .post_json(
                "/memories/ask",
                json!({ "user_id": user_id, "question": question }),
            )
            .await?;
        serde_json::from_value(value)
            .map_err(|e| GatewayError::Backend(format!("malformed answer: {}", e)))
    }

    async fn deep_query(&self, user_id: &str, query: &str) -> Result<Value, GatewayError> {
        self.post_json(
            "/memories/deep-query",
            json!({ "user_id": user_id, "query": query }),
        )
        .await
    }

    async fn clear(&self, user_id: &str, confirm: bool) -> Result<Value, GatewayError> {
        if !confirm {
            return Err(GatewayError::Backend(
                "clear requires explicit confirmation".to_string(),
            ));
        }
        self.post_json(
            "/memories/clear",
            json!({ "user_id": user_id, "confirm": true }),
        )
        .await
    }
}
