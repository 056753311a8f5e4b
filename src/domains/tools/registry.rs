//! Tool Registry - tool metadata and name-based dispatch.
//!
//! The rmcp router (see `router.rs`) serves STDIO/TCP. The HTTP transport
//! speaks JSON-RPC itself and dispatches through this registry instead.

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use super::definitions::{BeehiivClient, GetSubscribersTool};

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    client: Arc<BeehiivClient>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: Arc<BeehiivClient>) -> Self {
        Self { client }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![GetSubscribersTool::NAME]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![GetSubscribersTool::to_tool()]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> crate::Result<serde_json::Value> {
        match name {
            GetSubscribersTool::NAME => {
                Ok(GetSubscribersTool::http_handler(arguments, self.client.clone()).await?)
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(super::ToolError::not_found(name).into())
            }
        }
    }
}
