//! The `OpenAIClient` struct implements [`BackendAdapter`] for OpenAI's Chat Completions API.
//!
//! Wire contract:
//! - `POST {base_url}/v1/chat/completions`
//! - `Authorization: Bearer <key>`
//! - body `{model, messages: [system, user], temperature}`
//! - reply text is `choices[0].message.content`
//!
//! # Example
//!
//! ```rust,no_run
//! use duologue::backend_adapter::BackendAdapter;
//! use duologue::clients::openai::OpenAIClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let key = std::env::var("OPENAI_API_KEY").ok();
//!     let client = OpenAIClient::new();
//!     let text = client
//!         .send("Topic: Cats vs dogs\nYour role: ChatGPT.", key.as_deref(), "gpt-4o-mini")
//!         .await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::duologue::backend_adapter::BackendAdapter;
use crate::duologue::clients::common::{join_url, require_credential, send_and_decode};
use crate::duologue::config::{DebateConfig, SamplingParams};
use crate::duologue::error::DebateError;
use crate::duologue::http_client_pool::get_http_client;

pub const PROVIDER_KEY: &str = "openai";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const SYSTEM_PROMPT: &str = "You are an insightful debater.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// First choice's message content, or `""` when any link is missing.
    fn into_text(self) -> String {
        self.choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default()
    }
}

/// Client wrapper for OpenAI's Chat Completions API.
pub struct OpenAIClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
    sampling: SamplingParams,
}

impl OpenAIClient {
    /// Client for the public OpenAI endpoint with default timeout and sampling.
    pub fn new() -> Self {
        Self::new_with_base_url(DEFAULT_BASE_URL)
    }

    /// Client targeting an OpenAI compatible endpoint (self-hosted gateway, test server).
    pub fn new_with_base_url(base_url: &str) -> Self {
        let defaults = DebateConfig::default();
        OpenAIClient {
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

impl Default for OpenAIClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendAdapter for OpenAIClient {
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

        let body = ChatRequest {
            model: model_id,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.sampling.temperature,
        };

        let request = self
            .http
            .post(join_url(&self.base_url, "/v1/chat/completions"))
            .bearer_auth(api_key)
            .json(&body);

        let response: ChatCompletionResponse =
            send_and_decode(PROVIDER_KEY, request, self.timeout).await?;
        Ok(response.into_text())
    }
}
