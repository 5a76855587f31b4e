//! Anthropic Claude adapter speaking the native Messages API.
//!
//! Wire contract:
//! - `POST {base_url}/v1/messages`
//! - `x-api-key: <key>` and `anthropic-version: 2023-06-01`
//! - body `{model, max_tokens, temperature, messages: [user]}`
//! - reply text is `content[0].text`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::duologue::backend_adapter::BackendAdapter;
use crate::duologue::clients::common::{join_url, require_credential, send_and_decode};
use crate::duologue::config::{DebateConfig, SamplingParams};
use crate::duologue::error::DebateError;
use crate::duologue::http_client_pool::get_http_client;

pub const PROVIDER_KEY: &str = "anthropic";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [UserMessage<'a>; 1],
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Option<Vec<ContentBlock>>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first content block, or `""`.
    fn into_text(self) -> String {
        self.content
            .and_then(|blocks| blocks.into_iter().next())
            .and_then(|block| block.text)
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }
}

/// Client wrapper for Anthropic's Messages API.
pub struct ClaudeClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
    sampling: SamplingParams,
}

impl ClaudeClient {
    pub fn new() -> Self {
        Self::new_with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client pointing at a custom Claude-compatible base URL.
    pub fn new_with_base_url(base_url: &str) -> Self {
        let defaults = DebateConfig::default();
        ClaudeClient {
            base_url: base_url.to_string(),
            http: get_http_client(base_url),
            timeout: defaults.request_timeout,
            sampling: defaults.sampling,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }
}

impl Default for ClaudeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendAdapter for ClaudeClient {
    fn provider_key(&self) -> &str {
        PROVIDER_KEY
    }

    async fn send(
        &self,
        prompt: &str,
        credential: Option<&str>,
        model_id: &str,
    ) -> Result<String, DebateError> {
        let api_key = require_credential(PROVIDER_KEY, credential)?;

        let body = MessagesRequest {
            model: model_id,
            max_tokens: self.sampling.max_output_tokens,
            temperature: self.sampling.temperature,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let request = self
            .http
            .post(join_url(&self.base_url, "/v1/messages"))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let response: MessagesResponse =
            send_and_decode(PROVIDER_KEY, request, self.timeout).await?;
        Ok(response.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> String {
        serde_json::from_str::<MessagesResponse>(json)
            .unwrap()
            .into_text()
    }

    #[test]
    fn first_block_text_is_used() {
        let json = r#"{"id":"msg_1","type":"message","content":[
            {"type":"text","text":" Cats, obviously. "},
            {"type":"text","text":"second"}]}"#;
        assert_eq!(decode(json), "Cats, obviously.");
    }

    #[test]
    fn absent_links_collapse_to_empty() {
        assert_eq!(decode("{}"), "");
        assert_eq!(decode(r#"{"content":[]}"#), "");
        assert_eq!(decode(r#"{"content":[{"type":"tool_use"}]}"#), "");
    }
}
