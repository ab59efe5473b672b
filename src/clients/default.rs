//! Fallback profile for unrecognized client names.
//!
//! Conservative surface: the destructive `clear_memories` tool is not
//! declared, and calls to it are rejected even if a client sends one anyway.

use crate::clients::{execute_tool, ClientProfile};
use crate::core::errors::GatewayError;
use crate::core::identity::RequestScope;
use crate::memory::MemoryBackend;
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct DefaultProfile;

const TOOLS: &[&str] = &[
    "add_memories",
    "search_memory",
    "ask_memory",
    "deep_memory_query",
];

#[async_trait]
impl ClientProfile for DefaultProfile {
    fn name(&self) -> &'static str {
        "default"
    }

    fn tools_schema(&self, _include_annotations: bool) -> Vec<Value> {
        vec![
            json!({
                "name": "add_memories",
                "description": "Store new information about the user.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "text": {"type": "string", "description": "The information to remember"}
                    },
                    "required": ["text"]
                }
            }),
            json!({
                "name": "search_memory",
                "description": "Semantic search over the user's stored memories.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "What to look for"},
                        "limit": {"type": "integer", "description": "Maximum number of results", "default": 10}
                    },
                    "required": ["query"]
                }
            }),
            json!({
                "name": "ask_memory",
                "description": "Ask a question answered from the user's memories.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "question": {"type": "string", "description": "The question to answer"}
                    },
                    "required": ["question"]
                }
            }),
            json!({
                "name": "deep_memory_query",
                "description": "Thorough analysis across the user's entire memory store.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "The analysis to perform"}
                    },
                    "required": ["query"]
                }
            }),
        ]
    }

    async fn handle_tool_call(
        &self,
        tool_name: &str,
        arguments: Value,
        backend: &dyn MemoryBackend,
        scope: &RequestScope,
    ) -> Result<Value, GatewayError> {
        if !TOOLS.contains(&tool_name) {
            return Err(GatewayError::UnknownTool(tool_name.to_string()));
        }
        execute_tool(tool_name, &arguments, backend, scope).await
    }
}
