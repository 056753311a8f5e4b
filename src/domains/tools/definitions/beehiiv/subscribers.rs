//! beehiiv `get-subscribers` tool.
//!
//! Forwards a filtered, paginated subscriber query to the beehiiv
//! subscriptions endpoint and relays the JSON response as pretty-printed
//! text. The payload is not interpreted; the cursor is passed through and
//! never followed.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::client::{BeehiivClient, BeehiivError};
use crate::domains::tools::ToolError;

const MIN_LIMIT: u32 = 1;
const MAX_LIMIT: u32 = 100;

fn default_limit() -> u32 {
    10
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Sort direction accepted by the subscriptions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters for the `get-subscribers` tool.
///
/// String filters are forwarded as-is; beehiiv decides whether they are
/// valid.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetSubscribersParams {
    /// Number of results to return (1-100, default 10).
    #[schemars(description = "Number of results to return (1-100, default 10)")]
    #[schemars(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[schemars(description = "Cursor for pagination")]
    pub cursor: Option<String>,

    #[schemars(description = "Filter by subscription status")]
    pub status: Option<String>,

    #[schemars(description = "Filter by subscription tier")]
    pub tier: Option<String>,

    #[schemars(description = "Exact email match filter")]
    pub email: Option<String>,

    #[schemars(
        description = "Expand additional data (premium tiers, referrals, stats, custom fields)"
    )]
    pub expand: Option<Vec<String>>,

    #[schemars(description = "Sort field (defaults to 'created')")]
    pub order_by: Option<String>,

    #[schemars(description = "Sort direction")]
    pub direction: Option<SortDirection>,
}

impl GetSubscribersParams {
    /// Deserialize and range-check raw tool arguments.
    pub fn from_arguments(arguments: serde_json::Value) -> Result<Self, ToolError> {
        let params: Self = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Reject values the schema rules out.
    pub fn validate(&self) -> Result<(), ToolError> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&self.limit) {
            return Err(ToolError::invalid_arguments(format!(
                "limit must be between {} and {}, got {}",
                MIN_LIMIT, MAX_LIMIT, self.limit
            )));
        }
        Ok(())
    }

    /// Query parameters in wire order.
    ///
    /// `limit` is always present. Optional fields appear only when set to a
    /// non-empty value, and each `expand` entry becomes its own `expand[]`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];

        let mut push = |key: &'static str, value: &Option<String>| {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        };
        push("cursor", &self.cursor);
        push("status", &self.status);
        push("tier", &self.tier);
        push("email", &self.email);

        for item in self.expand.iter().flatten() {
            pairs.push(("expand[]", item.clone()));
        }

        if let Some(order_by) = self.order_by.as_deref().filter(|v| !v.is_empty()) {
            pairs.push(("order_by", order_by.to_string()));
        }
        if let Some(direction) = self.direction {
            pairs.push(("direction", direction.as_str().to_string()));
        }

        pairs
    }

    /// URL-encoded query string.
    pub fn query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self.query_pairs())
    }
}

// ============================================================================
// Tool Implementation
// ============================================================================

/// beehiiv subscriber listing tool.
#[derive(Debug, Clone)]
pub struct GetSubscribersTool;

impl GetSubscribersTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-subscribers";

    /// Human-readable title.
    pub const TITLE: &'static str = "Get Beehiiv Subscribers";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Retrieve subscribers from a Beehiiv publication with filtering and pagination options";

    /// Run one query. Every failure becomes an error result.
    #[instrument(skip_all, fields(limit = params.limit))]
    pub async fn execute(params: &GetSubscribersParams, client: &BeehiivClient) -> CallToolResult {
        info!("Fetching beehiiv subscribers");

        match Self::fetch(params, client).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                warn!("get-subscribers failed: {}", e);
                CallToolResult::error(vec![Content::text(format!("Error: {}", e))])
            }
        }
    }

    async fn fetch(
        params: &GetSubscribersParams,
        client: &BeehiivClient,
    ) -> Result<String, BeehiivError> {
        let query = params.query_string()?;
        let data = client.list_subscriptions(&query).await?;
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Parse raw arguments, then execute.
    ///
    /// Invalid arguments are returned as `Err` so the caller can reject the
    /// call at the protocol level; nothing is sent in that case.
    pub async fn call(
        arguments: serde_json::Value,
        client: &BeehiivClient,
    ) -> Result<CallToolResult, ToolError> {
        let params = GetSubscribersParams::from_arguments(arguments)?;
        Ok(Self::execute(&params, client).await)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<BeehiivClient>,
    ) -> Result<serde_json::Value, ToolError> {
        let result = Self::call(arguments, &client).await?;
        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        }))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetSubscribersParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some(Self::TITLE.into()),
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(client: Arc<BeehiivClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let client = client.clone();
            async move {
                Self::call(serde_json::Value::Object(args), &client)
                    .await
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BeehiivConfig;
    use rmcp::model::RawContent;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SUBSCRIPTIONS_PATH: &str = "/v2/publications/pub_123/subscriptions";

    fn client_for(server: &MockServer) -> BeehiivClient {
        BeehiivClient::new(BeehiivConfig {
            api_key: Some("key_abc".to_string()),
            publication_id: Some("pub_123".to_string()),
            base_url: format!("{}/v2", server.uri()),
        })
        .unwrap()
    }

    fn result_text(result: &CallToolResult) -> String {
        assert_eq!(result.content.len(), 1);
        match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {:?}", other),
        }
    }

    fn keys(query: &str) -> Vec<String> {
        serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect()
    }

    #[test]
    fn test_params_default_limit() {
        let params = GetSubscribersParams::from_arguments(json!({})).unwrap();
        assert_eq!(params.limit, 10);
        assert_eq!(params.query_string().unwrap(), "limit=10");
    }

    #[test]
    fn test_limit_range_is_inclusive() {
        for ok in [1, 50, 100] {
            assert!(GetSubscribersParams::from_arguments(json!({ "limit": ok })).is_ok());
        }
        for bad in [json!(0), json!(101), json!(-1), json!(1000), json!(10.0), json!("10")] {
            let err = GetSubscribersParams::from_arguments(json!({ "limit": bad })).unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments(_)));
        }
    }

    #[test]
    fn test_direction_restricted_to_asc_desc() {
        let params = GetSubscribersParams::from_arguments(json!({ "direction": "desc" })).unwrap();
        assert_eq!(params.direction, Some(SortDirection::Desc));
        assert!(GetSubscribersParams::from_arguments(json!({ "direction": "up" })).is_err());
    }

    #[test]
    fn test_limit_appears_exactly_once() {
        let params = GetSubscribersParams::from_arguments(json!({
            "limit": 25,
            "cursor": "abc",
            "expand": ["stats"]
        }))
        .unwrap();
        let query = params.query_string().unwrap();
        let limits: Vec<_> = keys(&query).into_iter().filter(|k| k == "limit").collect();
        assert_eq!(limits.len(), 1);
        assert!(query.starts_with("limit=25"));
    }

    #[test]
    fn test_expand_repeated_in_order() {
        let params = GetSubscribersParams::from_arguments(json!({
            "expand": ["stats", "custom_fields", "referrals"]
        }))
        .unwrap();
        let query = params.query_string().unwrap();
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&query).unwrap();
        let expands: Vec<_> = pairs
            .iter()
            .filter(|(k, _)| k == "expand[]")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(expands, vec!["stats", "custom_fields", "referrals"]);
    }

    #[test]
    fn test_omitted_fields_never_sent() {
        let params = GetSubscribersParams::from_arguments(json!({ "limit": 5 })).unwrap();
        assert_eq!(keys(&params.query_string().unwrap()), vec!["limit"]);

        let empty = GetSubscribersParams::from_arguments(json!({
            "cursor": "",
            "email": "",
            "expand": []
        }))
        .unwrap();
        assert_eq!(keys(&empty.query_string().unwrap()), vec!["limit"]);
    }

    #[test]
    fn test_all_fields_in_wire_order() {
        let params = GetSubscribersParams::from_arguments(json!({
            "limit": 3,
            "cursor": "c1",
            "status": "active",
            "tier": "premium",
            "email": "a+b@example.com",
            "expand": ["stats"],
            "order_by": "created",
            "direction": "asc"
        }))
        .unwrap();
        let query = params.query_string().unwrap();
        assert_eq!(
            keys(&query),
            vec![
                "limit", "cursor", "status", "tier", "email", "expand[]", "order_by", "direction"
            ]
        );
        assert!(query.contains("email=a%2Bb%40example.com"));
    }

    #[test]
    fn test_to_tool_metadata() {
        let tool = GetSubscribersTool::to_tool();
        assert_eq!(tool.name, "get-subscribers");
        assert_eq!(tool.title.as_deref(), Some("Get Beehiiv Subscribers"));
        let properties = tool.input_schema["properties"].as_object().unwrap();
        for field in [
            "limit", "cursor", "status", "tier", "email", "expand", "order_by", "direction",
        ] {
            assert!(properties.contains_key(field), "missing {}", field);
        }
        assert_eq!(properties["limit"]["maximum"], json!(100));
        assert_eq!(properties["limit"]["default"], json!(10));
    }

    #[tokio::test]
    async fn test_success_is_pretty_printed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUBSCRIPTIONS_PATH))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"data":[]}"#, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let result = GetSubscribersTool::call(json!({}), &client_for(&server))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result_text(&result), "{\n  \"data\": []\n}");
    }

    #[tokio::test]
    async fn test_success_preserves_key_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"total_results":1,"data":[{"id":"sub_1"}]}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let result = GetSubscribersTool::call(json!({}), &client_for(&server))
            .await
            .unwrap();
        let text = result_text(&result);
        assert!(text.find("total_results").unwrap() < text.find("data").unwrap());
    }

    #[tokio::test]
    async fn test_remote_rejection_embeds_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUBSCRIPTIONS_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let result = GetSubscribersTool::call(json!({}), &client_for(&server))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        let text = result_text(&result);
        assert!(text.contains("404"));
        assert!(text.contains("not found"));
        assert_eq!(text, "Error: HTTP 404 - not found");
    }

    #[tokio::test]
    async fn test_missing_api_key_names_variable_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = BeehiivClient::new(BeehiivConfig {
            api_key: None,
            publication_id: Some("pub_123".to_string()),
            base_url: server.uri(),
        })
        .unwrap();

        let result = GetSubscribersTool::call(json!({}), &client).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            "Error: BEEHIIV_API_KEY environment variable is required"
        );
    }

    #[tokio::test]
    async fn test_out_of_range_limit_rejected_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for limit in [0, 101] {
            let err = GetSubscribersTool::call(json!({ "limit": limit }), &client)
                .await
                .unwrap_err();
            assert!(err.to_string().contains("limit"));
        }
    }

    #[tokio::test]
    async fn test_query_forwarded_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUBSCRIPTIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let args = json!({
            "limit": 50,
            "status": "active",
            "expand": ["stats", "referrals"],
            "direction": "desc"
        });
        let result = GetSubscribersTool::call(args, &client_for(&server))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let pairs: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "50".to_string()),
                ("status".to_string(), "active".to_string()),
                ("expand[]".to_string(), "stats".to_string()),
                ("expand[]".to_string(), "referrals".to_string()),
                ("direction".to_string(), "desc".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_json_becomes_error_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = GetSubscribersTool::call(json!({}), &client_for(&server))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_connection_failure_becomes_error_result() {
        let client = BeehiivClient::new(BeehiivConfig {
            api_key: Some("key_abc".to_string()),
            publication_id: Some("pub_123".to_string()),
            base_url: "http://127.0.0.1:1/v2".to_string(),
        })
        .unwrap();

        let result = GetSubscribersTool::call(json!({}), &client).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(result_text(&result).starts_with("Error: "));
    }
}
