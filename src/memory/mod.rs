//! Memory backend collaborator surface.
//!
//! The gateway owns no storage: every tool call bottoms out in one of these
//! async operations against the external memory service. A failure is
//! surfaced immediately as an error; this layer performs no retries.

pub mod http;

use crate::core::errors::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use http::HttpMemoryBackend;

/// One stored memory returned by a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Result of a semantic search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub memories: Vec<Memory>,
    pub total: usize,
}

/// Result of a question answered over the memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Trait for the external memory service
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    /// Store a new memory for the user.
    async fn add(
        &self,
        user_id: &str,
        text: &str,
        metadata: Value,
    ) -> Result<Value, GatewayError>;

    /// Semantic search over the user's memories.
    async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<SearchResults, GatewayError>;

    /// Answer a question using the user's memories.
    async fn ask(&self, user_id: &str, question: &str) -> Result<Answer, GatewayError>;

    /// Slow, thorough analysis across the whole store.
    async fn deep_query(&self, user_id: &str, query: &str) -> Result<Value, GatewayError>;

    /// Delete all memories for the user. Requires explicit confirmation.
    async fn clear(&self, user_id: &str, confirm: bool) -> Result<Value, GatewayError>;
}
