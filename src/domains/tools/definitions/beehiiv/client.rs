//! Thin async client for the beehiiv REST API.
//!
//! One `reqwest::Client` is built at startup and shared by every tool call.
//! The client holds no mutable state, so concurrent calls need no locking.

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use crate::core::config::{API_KEY_VAR, BeehiivConfig, PUBLICATION_ID_VAR};
use crate::core::{Error, Result};

/// Failures of a single beehiiv request.
///
/// Every variant ends up as the text of an error tool result, so the
/// messages are written for the client to read.
#[derive(Debug, thiserror::Error)]
pub enum BeehiivError {
    /// A required credential was not configured.
    #[error("{0} environment variable is required")]
    MissingCredential(&'static str),

    /// The API answered with a non-success status.
    #[error("HTTP {status} - {body}")]
    Api { status: u16, body: String },

    /// The request could not be sent or its body could not be read.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The query string could not be encoded.
    #[error("{0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// The success body was not valid JSON.
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// beehiiv API client bound to one configuration.
#[derive(Debug, Clone)]
pub struct BeehiivClient {
    http: reqwest::Client,
    config: BeehiivConfig,
}

impl BeehiivClient {
    /// Build a client for the given configuration.
    ///
    /// Only the base URL is checked here. Missing credentials are reported
    /// per call so the server can still start without them.
    pub fn new(config: BeehiivConfig) -> Result<Self> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| Error::config(format!("invalid beehiiv base URL '{}': {}", config.base_url, e)))?;

        let http = reqwest::Client::builder().build()?;

        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &BeehiivConfig {
        &self.config
    }

    /// Subscriptions endpoint for a publication.
    fn subscriptions_url(&self, publication_id: &str) -> String {
        format!(
            "{}/publications/{}/subscriptions",
            self.config.base_url, publication_id
        )
    }

    /// `GET /publications/{id}/subscriptions` with an already-encoded query.
    ///
    /// Credentials are checked before anything touches the network: API key
    /// first, then publication id.
    #[instrument(skip(self))]
    pub async fn list_subscriptions(
        &self,
        query: &str,
    ) -> std::result::Result<serde_json::Value, BeehiivError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(BeehiivError::MissingCredential(API_KEY_VAR))?;
        let publication_id = self
            .config
            .publication_id
            .as_deref()
            .ok_or(BeehiivError::MissingCredential(PUBLICATION_ID_VAR))?;

        let url = format!("{}?{}", self.subscriptions_url(publication_id), query);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(BeehiivError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        debug!("API response received: {} bytes", bytes.len());

        Ok(serde_json::from_slice(&bytes)?)
    }
}
