//! A BackendAdapter is a wrapper around one text-generation provider's wire protocol.
//! It translates a prompt into that provider's request and the provider's response back
//! into plain text.
//! It does not know about speakers, turns or the transcript; the
//! [`TurnOrchestrator`](crate::orchestrator::TurnOrchestrator) attaches the speaker label
//! and the [`DebateSession`](crate::session::DebateSession) owns the history.

use async_trait::async_trait;

use crate::duologue::error::DebateError;

/// Trait defining the interface every provider adapter implements.
///
/// Implementations must:
/// - fail with [`DebateError::Configuration`] before touching the network when
///   `credential` is absent or blank;
/// - issue exactly one request per call, without retries or caching;
/// - fail with [`DebateError::Backend`] on transport errors, timeouts and non-2xx statuses;
/// - return `""` when a 2xx response lacks the expected text fields.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Registry key this adapter speaks for (e.g. `"openai"`).
    fn provider_key(&self) -> &str;

    /// Send `prompt` to `model_id` and return the normalized reply text.
    async fn send(
        &self,
        prompt: &str,
        credential: Option<&str>,
        model_id: &str,
    ) -> Result<String, DebateError>;
}
