//! Client profile for Claude desktop/web clients.

use crate::clients::{execute_tool, ClientProfile};
use crate::core::errors::GatewayError;
use crate::core::identity::RequestScope;
use crate::memory::MemoryBackend;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

pub struct ClaudeProfile;

impl ClaudeProfile {
    /// Arguments accepted by other integrations but not by Claude clients.
    /// Stripped before the backend call to keep the surface backward
    /// compatible with older desktop builds.
    fn sanitize_arguments(tool_name: &str, arguments: &mut Value) {
        if let Some(map) = arguments.as_object_mut() {
            match tool_name {
                "search_memory" => {
                    map.remove("tags_filter");
                }
                "add_memories" => {
                    map.remove("tags");
                }
                _ => {}
            }
        }
    }
}

#[async_trait]
impl ClientProfile for ClaudeProfile {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn tools_schema(&self, include_annotations: bool) -> Vec<Value> {
        let mut tools = vec![
            json!({
                "name": "add_memories",
                "description": "Store new information about the user. Use whenever the user shares facts, preferences, or context worth remembering across conversations.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "text": {"type": "string", "description": "The information to remember"},
                        "metadata": {"type": "object", "description": "Optional structured metadata to store alongside the memory"}
                    },
                    "required": ["text"]
                }
            }),
            json!({
                "name": "search_memory",
                "description": "Semantic search over the user's stored memories. Returns the closest matches with relevance scores.",
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
                "description": "Ask a question answered from the user's memories. Fast, conversational; returns an answer with sources.",
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
                "description": "Thorough analysis across the user's entire memory store. Slower than ask_memory; use for synthesis across many memories.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "The analysis to perform"}
                    },
                    "required": ["query"]
                }
            }),
            json!({
                "name": "clear_memories",
                "description": "Delete all of the user's stored memories. Destructive; requires confirm=true.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "confirm": {"type": "boolean", "description": "Must be true to proceed"}
                    },
                    "required": ["confirm"]
                }
            }),
        ];

        if include_annotations {
            let annotations: &[(&str, Value)] = &[
                ("add_memories", json!({"readOnly": false, "sensitive": true, "destructive": false})),
                ("search_memory", json!({"readOnly": true, "sensitive": true, "destructive": false})),
                ("ask_memory", json!({"readOnly": true, "sensitive": true, "destructive": false})),
                ("deep_memory_query", json!({"readOnly": true, "sensitive": true, "destructive": false})),
                ("clear_memories", json!({"readOnly": false, "sensitive": true, "destructive": true})),
            ];
            for tool in tools.iter_mut() {
                let name = tool["name"].as_str().unwrap_or_default().to_string();
                if let Some((_, ann)) = annotations.iter().find(|(n, _)| *n == name) {
                    tool["annotations"] = ann.clone();
                }
            }
        }

        tools
    }

    async fn handle_tool_call(
        &self,
        tool_name: &str,
        mut arguments: Value,
        backend: &dyn MemoryBackend,
        scope: &RequestScope,
    ) -> Result<Value, GatewayError> {
        Self::sanitize_arguments(tool_name, &mut arguments);

        let result = execute_tool(tool_name, &arguments, backend, scope).await?;

        // Usage accounting happens after the response is sent.
        let user_id = scope.user_id().to_string();
        let tool = tool_name.to_string();
        scope.defer(Box::pin(async move {
            info!(user_id = %user_id, tool = %tool, "tool call completed");
        }));

        Ok(result)
    }
}
