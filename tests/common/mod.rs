// Common test utilities and helpers for all test modules

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use memory_gateway::api::{create_router, AppState};
use memory_gateway::auth::token::TokenValidator;
use memory_gateway::config::Config;
use memory_gateway::core::errors::GatewayError;
use memory_gateway::core::identity::SessionIdentity;
use memory_gateway::memory::{Answer, Memory, MemoryBackend, SearchResults};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Mock memory backend recording every call it receives.
pub struct MockBackend {
    pub calls: Mutex<Vec<(String, Value)>>,
    pub should_fail: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            should_fail: false,
        }
    }
}

impl MockBackend {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    fn record(&self, op: &str, detail: Value) -> Result<(), GatewayError> {
        if self.should_fail {
            return Err(GatewayError::Backend("backend unavailable".to_string()));
        }
        self.calls.lock().unwrap().push((op.to_string(), detail));
        Ok(())
    }
}

#[async_trait]
impl MemoryBackend for MockBackend {
    async fn add(&self, user_id: &str, text: &str, metadata: Value) -> Result<Value, GatewayError> {
        self.record(
            "add",
            json!({ "user_id": user_id, "text": text, "metadata": metadata }),
        )?;
        Ok(json!({ "status": "ok", "id": "mem-1" }))
    }

    async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<SearchResults, GatewayError> {
        self.record(
            "search",
            json!({ "user_id": user_id, "query": query, "limit": limit }),
        )?;
        Ok(SearchResults {
            memories: vec![Memory {
                id: "mem-1".to_string(),
                text: "prefers espresso".to_string(),
                score: Some(0.92),
                metadata: None,
            }],
            total: 1,
        })
    }

    async fn ask(&self, user_id: &str, question: &str) -> Result<Answer, GatewayError> {
        self.record("ask", json!({ "user_id": user_id, "question": question }))?;
        Ok(Answer {
            answer: "They prefer espresso.".to_string(),
            sources: vec!["mem-1".to_string()],
            confidence: Some(0.9),
        })
    }

    async fn deep_query(&self, user_id: &str, query: &str) -> Result<Value, GatewayError> {
        self.record("deep_query", json!({ "user_id": user_id, "query": query }))?;
        Ok(json!({ "analysis": "nothing unusual" }))
    }

    async fn clear(&self, user_id: &str, confirm: bool) -> Result<Value, GatewayError> {
        self.record("clear", json!({ "user_id": user_id, "confirm": confirm }))?;
        Ok(json!({ "status": "cleared" }))
    }
}

/// Mock validator keyed on fixed token strings.
///
/// "token-claude" and "token-default" authenticate as the respective client
/// families; anything else is rejected as invalid.
pub struct MockValidator;

#[async_trait]
impl TokenValidator for MockValidator {
    async fn authenticate(&self, token: &str) -> Result<SessionIdentity, GatewayError> {
        match token {
            "token-claude" => Ok(SessionIdentity {
                user_id: "user-claude".to_string(),
                email: "claude-user@example.com".to_string(),
                client_name: "claude".to_string(),
            }),
            "token-default" => Ok(SessionIdentity {
                user_id: "user-default".to_string(),
                email: "default-user@example.com".to_string(),
                client_name: "chatgpt".to_string(),
            }),
            _ => Err(GatewayError::InvalidToken),
        }
    }
}

pub fn test_app_state(backend: Arc<MockBackend>, config: Config) -> AppState {
    AppState {
        validator: Arc::new(MockValidator),
        backend,
        config: Arc::new(config),
    }
}

pub fn test_app(backend: Arc<MockBackend>) -> Router {
    create_router(test_app_state(backend, Config::test_config()))
}

pub fn test_app_with_config(backend: Arc<MockBackend>, config: Config) -> Router {
    create_router(test_app_state(backend, config))
}

/// Authenticated JSON-RPC POST to /mcp.
pub fn mcp_request(token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
