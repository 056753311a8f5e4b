//! Tool Router - builds the rmcp ToolRouter for STDIO/TCP transport.
//!
//! Each tool knows how to create its own route; this module only collects
//! them.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{BeehiivClient, GetSubscribersTool};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<BeehiivClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new().with_route(GetSubscribersTool::create_route(client))
}
