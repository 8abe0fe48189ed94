pub(crate) mod types;

use anyhow::{anyhow, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use crate::schema::StructuredOutput;
use types::*;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const STRUCTURED_TOOL: &str = "structured_response";

// =============================================================================
// Claude
// =============================================================================

/// Claude Messages API, used only through forced tool calls.
#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
    http: reqwest::Client,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 4096,
            base_url: ANTHROPIC_API_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask for a `T` by forcing a single tool call whose input schema is `T`'s.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let request = ChatRequest::new(&self.model)
            .system(system_prompt)
            .message(WireMessage::user(user_prompt))
            .max_tokens(self.max_tokens)
            .forced_tool(ToolDefinitionWire {
                name: STRUCTURED_TOOL.to_string(),
                description: "Extract structured data from the input.".to_string(),
                input_schema: T::tool_schema(),
            });

        let input = self.send(&request).await?.into_tool_input(STRUCTURED_TOOL)?;

        serde_json::from_value(input).context("Tool input does not match the requested schema")
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(model = %request.model, max_tokens = request.max_tokens, "Forced tool call");

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Claude API error ({status}): {body}"));
        }

        Ok(response.json().await?)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_anthropic() {
        let ai = Claude::new("sk-ant-test", "claude-3-7-sonnet-20250219");
        assert_eq!(ai.model(), "claude-3-7-sonnet-20250219");
        assert_eq!(ai.base_url, ANTHROPIC_API_URL);
        assert_eq!(ai.max_tokens, 4096);
    }

    #[test]
    fn builders_override_defaults() {
        let ai = Claude::new("sk-ant-test", "claude-3-7-sonnet-20250219")
            .with_base_url("https://custom.api.com")
            .with_max_tokens(4000);
        assert_eq!(ai.base_url, "https://custom.api.com");
        assert_eq!(ai.max_tokens, 4000);
    }

    #[test]
    fn headers_carry_key_and_version() {
        let headers = Claude::new("sk-ant-test", "m").headers().unwrap();
        assert_eq!(headers["x-api-key"], "sk-ant-test");
        assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
    }

    #[test]
    fn invalid_key_is_an_error() {
        assert!(Claude::new("bad\nkey", "m").headers().is_err());
    }

    #[tokio::test]
    async fn unreachable_api_is_an_error() {
        #[derive(serde::Deserialize, schemars::JsonSchema)]
        struct Answer {
            #[allow(dead_code)]
            value: String,
        }

        let ai = Claude::new("sk-ant-test", "m").with_base_url("http://127.0.0.1:9");
        let result = ai.extract::<Answer>("system", "user").await;
        assert!(result.is_err());
    }
}
