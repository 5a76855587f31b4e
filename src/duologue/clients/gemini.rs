//! Google Gemini adapter for the `generateContent` REST endpoint.
//!
//! Wire contract:
//! - `POST {base_url}/v1beta/models/{model}:generateContent?key=<key>`
//! - no auth header; the key travels in the query string
//! - body `{contents: [{parts: [{text}]}], generationConfig: {temperature, maxOutputTokens}}`
//! - reply text is every `text` part of `candidates[0].content` concatenated

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::duologue::backend_adapter::BackendAdapter;
use crate::duologue::clients::common::{join_url, require_credential, send_and_decode};
use crate::duologue::config::{DebateConfig, SamplingParams};
use crate::duologue::error::DebateError;
use crate::duologue::http_client_pool::get_http_client;

pub const PROVIDER_KEY: &str = "gemini";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenation of all text parts of the first candidate. Parts without text (inline
    /// data, function calls) contribute nothing.
    fn into_text(self) -> String {
        let parts = self
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .unwrap_or_default();

        parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<String>()
            .trim()
            .to_string()
    }
}

/// Client wrapper for the Gemini `generateContent` API.
pub struct GeminiClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
    sampling: SamplingParams,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self::new_with_base_url(DEFAULT_BASE_URL)
    }

    /// This function is used to create a GeminiClient with a custom base URL
    /// The default base URL is "<https://generativelanguage.googleapis.com>"
    pub fn new_with_base_url(base_url: &str) -> Self {
        let defaults = DebateConfig::default();
        GeminiClient {
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

    fn endpoint(&self, model_id: &str) -> String {
        join_url(
            &self.base_url,
            &format!(
                "/v1beta/models/{}:generateContent",
                urlencoding::encode(model_id)
            ),
        )
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendAdapter for GeminiClient {
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

        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.sampling.temperature,
                max_output_tokens: self.sampling.max_output_tokens,
            },
        };

        let request = self
            .http
            .post(self.endpoint(model_id))
            .query(&[("key", api_key)])
            .json(&body);

        let response: GenerateContentResponse =
            send_and_decode(PROVIDER_KEY, request, self.timeout).await?;
        Ok(response.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> String {
        serde_json::from_str::<GenerateContentResponse>(json)
            .unwrap()
            .into_text()
    }

    #[test]
    fn text_parts_of_first_candidate_are_concatenated() {
        let json = r#"{"candidates":[
            {"content":{"role":"model","parts":[{"text":"Hello, "},{"inlineData":{}},{"text":"world. "}]}},
            {"content":{"parts":[{"text":"other candidate"}]}}]}"#;
        assert_eq!(decode(json), "Hello, world.");
    }

    #[test]
    fn absent_links_collapse_to_empty() {
        assert_eq!(decode("{}"), "");
        assert_eq!(decode(r#"{"candidates":[]}"#), "");
        assert_eq!(decode(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#), "");
        assert_eq!(decode(r#"{"candidates":[{"content":{}}]}"#), "");
    }

    #[test]
    fn model_id_is_path_encoded() {
        let client = GeminiClient::new_with_base_url("http://127.0.0.1:1");
        assert_eq!(
            client.endpoint("gemini-1.5-flash"),
            "http://127.0.0.1:1/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(
            client.endpoint("tuned/model"),
            "http://127.0.0.1:1/v1beta/models/tuned%2Fmodel:generateContent"
        );
    }
}
