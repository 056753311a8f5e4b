//! beehiiv MCP server library.
//!
//! Exposes one MCP tool, `get-subscribers`, which queries the subscriptions
//! of a beehiiv publication and returns the API's JSON response as text.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler, and
//!   transports
//! - **domains::tools**: tool definitions, router and registry
//!
//! # Example
//!
//! ```rust,no_run
//! use beehiiv_mcp::{Config, McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start a transport with the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
