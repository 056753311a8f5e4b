//! Configuration management for the MCP server.
//!
//! Everything the server needs is resolved once at startup by
//! [`Config::from_env`] and handed to the server by value. Tools never read
//! the process environment themselves.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Environment variable holding the beehiiv API key.
pub const API_KEY_VAR: &str = "BEEHIIV_API_KEY";

/// Environment variable holding the beehiiv publication identifier.
pub const PUBLICATION_ID_VAR: &str = "BEEHIIV_PUBLICATION_ID";

/// Environment variable overriding the beehiiv API base URL.
pub const BASE_URL_VAR: &str = "BEEHIIV_API_BASE_URL";

/// Default beehiiv REST API root.
pub const DEFAULT_BASE_URL: &str = "https://api.beehiiv.com/v2";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// beehiiv API access.
    pub beehiiv: BeehiivConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Credentials and endpoint for the beehiiv API.
///
/// Both credentials are optional here: a missing value only produces a
/// startup warning, and each tool call reports it as an error result.
#[derive(Clone, Serialize, Deserialize)]
pub struct BeehiivConfig {
    /// Bearer token sent with every request.
    pub api_key: Option<String>,

    /// Publication whose subscriptions are queried.
    pub publication_id: Option<String>,

    /// API root, without trailing slash.
    pub base_url: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for BeehiivConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeehiivConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("publication_id", &self.publication_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for BeehiivConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            publication_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl BeehiivConfig {
    /// Read the beehiiv settings from the environment.
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var(API_KEY_VAR),
            publication_id: non_empty_var(PUBLICATION_ID_VAR),
            base_url: non_empty_var(BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Names of required variables that were not provided.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push(API_KEY_VAR);
        }
        if self.publication_id.is_none() {
            missing.push(PUBLICATION_ID_VAR);
        }
        missing
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "beehiiv-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            beehiiv: BeehiivConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`, ...); beehiiv settings use the
    /// `BEEHIIV_` prefix.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();
        config.beehiiv = BeehiivConfig::from_env();

        config
    }
}
