//! MCP Server implementation.
//!
//! `McpServer` implements rmcp's `ServerHandler`. Tool calls are routed by
//! the `ToolRouter` built in `domains/tools/router.rs`; the HTTP transport
//! uses the `list_tools`/`call_tool` helpers instead.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::tools::{build_tool_router, definitions::BeehiivClient};

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared beehiiv API client, for HTTP dispatch.
    #[cfg(feature = "http")]
    client: Arc<BeehiivClient>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails only if the HTTP client cannot be built or the beehiiv base URL
    /// is malformed. Missing credentials are not an error here.
    pub fn new(config: Config) -> crate::Result<Self> {
        let config = Arc::new(config);
        let client = Arc::new(BeehiivClient::new(config.beehiiv.clone())?);

        info!("beehiiv API base URL: {}", config.beehiiv.base_url);

        Ok(Self {
            tool_router: build_tool_router::<Self>(client.clone()),
            #[cfg(feature = "http")]
            client,
            config,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Server instructions sent on initialize.
    pub fn instructions() -> &'static str {
        "Exposes the beehiiv subscriber API. Use get-subscribers to list \
         subscribers of the configured publication; pass the returned cursor \
         back to fetch the next page."
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "title": t.title,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> crate::Result<serde_json::Value> {
        ToolRegistry::new(self.client.clone())
            .call_tool(name, arguments)
            .await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(Self::instructions().to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
