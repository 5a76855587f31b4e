//! The turn orchestrator: one prompt, one backend call, one canonical reply.
//!
//! [`TurnOrchestrator::take_turn`] builds the prompt from the transcript, selects the
//! adapter registered for the requested backend, resolves that backend's credential and
//! wraps the normalized text with the speaker label. It never touches the caller's
//! transcript, so a failed turn leaves nothing to roll back and can simply be retried.
//!
//! [`TurnOrchestrator::step`] is the inbound control surface used by the HTTP layer: it
//! validates the raw request and speaks with the backend's registered label.
//!
//! Callers must not run two turns of the same session concurrently; the orchestrator itself
//! holds no per-session state and can be shared across sessions behind an `Arc`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use duologue::orchestrator::TurnOrchestrator;
//! use duologue::registry::{BackendIdentity, BackendRegistry};
//! use duologue::{Credentials, DebateConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(BackendRegistry::with_defaults(&DebateConfig::default()));
//!     let orchestrator = TurnOrchestrator::new(registry, Credentials::Environment);
//!
//!     let reply = orchestrator
//!         .take_turn(
//!             "Should cities ban cars?",
//!             &[],
//!             &BackendIdentity::from("openai"),
//!             "ChatGPT (OpenAI gpt-4o-mini)",
//!             None,
//!         )
//!         .await?;
//!     println!("{}: {}", reply.speaker, reply.text);
//!     Ok(())
//! }
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::duologue::config::Credentials;
use crate::duologue::error::DebateError;
use crate::duologue::event::{EventHandler, TurnEvent};
use crate::duologue::prompt_builder::build_prompt;
use crate::duologue::registry::{BackendIdentity, BackendRegistry, ProviderInfo};
use crate::duologue::transcript::{CanonicalReply, TranscriptEntry};

/// Raw inbound step request, as posted by a UI.
///
/// `engine` and `topic` are optional at the type level so a missing field is reported as
/// [`DebateError::InvalidInput`] rather than a decoding failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRequest {
    pub engine: Option<String>,
    pub topic: Option<String>,
    #[serde(default)]
    pub history: Vec<TranscriptEntry>,
    pub extra_prompt: Option<String>,
}

pub struct TurnOrchestrator {
    registry: Arc<BackendRegistry>,
    credentials: Credentials,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl TurnOrchestrator {
    pub fn new(registry: Arc<BackendRegistry>, credentials: Credentials) -> Self {
        TurnOrchestrator {
            registry,
            credentials,
            event_handler: None,
        }
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Registry listing, `{key, label}` per backend.
    pub fn list_providers(&self) -> Vec<ProviderInfo> {
        self.registry.list()
    }

    /// Produce the next reply for `backend`, speaking as `speaker_label`.
    ///
    /// # Errors
    ///
    /// - [`DebateError::InvalidInput`] when `topic` is blank
    /// - [`DebateError::UnknownBackend`] when `backend` is not registered
    /// - [`DebateError::Configuration`] when the backend's credential is missing
    /// - [`DebateError::Backend`] when the upstream call fails
    pub async fn take_turn(
        &self,
        topic: &str,
        transcript: &[TranscriptEntry],
        backend: &BackendIdentity,
        speaker_label: &str,
        extra_instructions: Option<&str>,
    ) -> Result<CanonicalReply, DebateError> {
        let prompt = build_prompt(topic, transcript, speaker_label, extra_instructions)?;
        let registered = self.registry.resolve(backend.as_str())?;
        let credential = self.credentials.resolve(&registered.credential_var);

        debug!(
            "duologue::orchestrator: dispatching turn {} to {} ({}), prompt {} chars",
            transcript.len() + 1,
            backend,
            registered.model_id,
            prompt.len()
        );
        self.emit(TurnEvent::TurnStarted {
            backend: backend.to_string(),
            speaker: speaker_label.to_string(),
            transcript_len: transcript.len(),
        })
        .await;

        let outcome = registered
            .adapter()
            .send(&prompt, credential.as_deref(), &registered.model_id)
            .await;

        match outcome {
            Ok(text) => {
                info!(
                    "duologue::orchestrator: {} replied with {} chars",
                    backend,
                    text.len()
                );
                self.emit(TurnEvent::TurnCompleted {
                    backend: backend.to_string(),
                    speaker: speaker_label.to_string(),
                    response_length: text.len(),
                })
                .await;
                Ok(CanonicalReply {
                    speaker: speaker_label.to_string(),
                    text,
                })
            }
            Err(err) => {
                warn!("duologue::orchestrator: turn for {} failed: {}", backend, err);
                self.emit(TurnEvent::TurnFailed {
                    backend: backend.to_string(),
                    error: err.to_string(),
                })
                .await;
                Err(err)
            }
        }
    }

    /// Handle one inbound step request. The reply speaks with the engine's registered label.
    ///
    /// Missing `engine` or `topic` fails before any backend is contacted.
    pub async fn step(&self, request: StepRequest) -> Result<CanonicalReply, DebateError> {
        let engine = non_blank(request.engine.as_deref());
        let topic = non_blank(request.topic.as_deref());
        let (engine, topic) = match (engine, topic) {
            (Some(engine), Some(topic)) => (engine, topic),
            _ => {
                return Err(DebateError::InvalidInput(
                    "Missing engine or topic.".to_string(),
                ))
            }
        };

        let label = self.registry.resolve(engine)?.label.clone();
        self.take_turn(
            topic,
            &request.history,
            &BackendIdentity::from(engine),
            &label,
            request.extra_prompt.as_deref(),
        )
        .await
    }

    async fn emit(&self, event: TurnEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_turn_event(&event).await;
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
