//! STDIO transport implementation.
//!
//! The default MCP mode: JSON-RPC over stdin/stdout. Logs go to stderr so
//! they never corrupt the protocol stream.

use rmcp::ServiceExt;
use tracing::{error, info};

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve until the client closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let service = server.serve(rmcp::transport::stdio()).await.map_err(|e| {
            error!("Failed to attach to stdio: {}", e);
            TransportError::init(e.to_string())
        })?;

        info!("Ready - communicating via stdin/stdout");

        let reason = service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO transport finished: {:?}", reason);
        Ok(())
    }
}
