//! Registry of the backends a debate can choose from.
//!
//! Each entry binds a [`BackendIdentity`] to a display label, a model identifier, the
//! environment variable holding its credential, and the adapter that speaks its protocol.
//! Lookups of unregistered identities fail with [`DebateError::UnknownBackend`]; there is
//! no fallback adapter.
//!
//! ```rust
//! use duologue::registry::BackendRegistry;
//! use duologue::DebateConfig;
//!
//! let registry = BackendRegistry::with_defaults(&DebateConfig::default());
//! let keys: Vec<String> = registry.list().into_iter().map(|p| p.key).collect();
//! assert_eq!(keys, vec!["anthropic", "gemini", "openai"]);
//! assert!(registry.resolve("mistral").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::duologue::backend_adapter::BackendAdapter;
use crate::duologue::clients::claude::ClaudeClient;
use crate::duologue::clients::gemini::GeminiClient;
use crate::duologue::clients::openai::OpenAIClient;
use crate::duologue::config::DebateConfig;
use crate::duologue::error::DebateError;

/// Opaque key selecting one registered backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendIdentity(String);

impl BackendIdentity {
    pub fn new(key: impl Into<String>) -> Self {
        BackendIdentity(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BackendIdentity {
    fn from(key: &str) -> Self {
        BackendIdentity(key.to_string())
    }
}

impl From<String> for BackendIdentity {
    fn from(key: String) -> Self {
        BackendIdentity(key)
    }
}

/// `{key, label}` pair exposed by the registry listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub key: String,
    pub label: String,
}

/// One configured backend.
#[derive(Clone)]
pub struct RegisteredBackend {
    pub key: BackendIdentity,
    /// Display label, also used as the speaker name in the transcript.
    pub label: String,
    pub model_id: String,
    /// Name of the environment variable holding this backend's secret.
    pub credential_var: String,
    adapter: Arc<dyn BackendAdapter>,
}

impl RegisteredBackend {
    pub fn new(
        key: impl Into<BackendIdentity>,
        label: impl Into<String>,
        model_id: impl Into<String>,
        credential_var: impl Into<String>,
        adapter: Arc<dyn BackendAdapter>,
    ) -> Self {
        RegisteredBackend {
            key: key.into(),
            label: label.into(),
            model_id: model_id.into(),
            credential_var: credential_var.into(),
            adapter,
        }
    }

    pub fn adapter(&self) -> &Arc<dyn BackendAdapter> {
        &self.adapter
    }
}

impl fmt::Debug for RegisteredBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredBackend")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("model_id", &self.model_id)
            .field("credential_var", &self.credential_var)
            .field("adapter", &self.adapter.provider_key())
            .finish()
    }
}

/// Ordered set of registered backends. Read-only once shared.
#[derive(Clone, Debug, Default)]
pub struct BackendRegistry {
    backends: Vec<RegisteredBackend>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The three stock backends, with timeout and sampling taken from `config`.
    pub fn with_defaults(config: &DebateConfig) -> Self {
        let mut registry = BackendRegistry::new();
        registry.register(RegisteredBackend::new(
            "anthropic",
            "Claude 3.5 Sonnet",
            "claude-3-5-sonnet-latest",
            "ANTHROPIC_API_KEY",
            Arc::new(
                ClaudeClient::new()
                    .with_timeout(config.request_timeout)
                    .with_sampling(config.sampling),
            ),
        ));
        registry.register(RegisteredBackend::new(
            "gemini",
            "Gemini 1.5 Flash",
            "gemini-1.5-flash",
            "GEMINI_API_KEY",
            Arc::new(
                GeminiClient::new()
                    .with_timeout(config.request_timeout)
                    .with_sampling(config.sampling),
            ),
        ));
        registry.register(RegisteredBackend::new(
            "openai",
            "ChatGPT (OpenAI gpt-4o-mini)",
            "gpt-4o-mini",
            "OPENAI_API_KEY",
            Arc::new(
                OpenAIClient::new()
                    .with_timeout(config.request_timeout)
                    .with_sampling(config.sampling),
            ),
        ));
        registry
    }

    /// Add a backend. Registering an existing key replaces it in place.
    pub fn register(&mut self, backend: RegisteredBackend) -> &mut Self {
        match self.backends.iter_mut().find(|b| b.key == backend.key) {
            Some(existing) => *existing = backend,
            None => self.backends.push(backend),
        }
        self
    }

    /// Builder-style variant of [`BackendRegistry::register`].
    pub fn with_backend(mut self, backend: RegisteredBackend) -> Self {
        self.register(backend);
        self
    }

    pub fn resolve(&self, key: &str) -> Result<&RegisteredBackend, DebateError> {
        self.backends
            .iter()
            .find(|b| b.key.as_str() == key)
            .ok_or_else(|| DebateError::UnknownBackend(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.backends.iter().any(|b| b.key.as_str() == key)
    }

    /// `{key, label}` for every backend, in registration order.
    pub fn list(&self) -> Vec<ProviderInfo> {
        self.backends
            .iter()
            .map(|b| ProviderInfo {
                key: b.key.to_string(),
                label: b.label.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_expose_reference_labels() {
        let registry = BackendRegistry::with_defaults(&DebateConfig::default());
        let providers = registry.list();
        assert_eq!(providers.len(), 3);
        assert_eq!(
            providers[0],
            ProviderInfo {
                key: "anthropic".into(),
                label: "Claude 3.5 Sonnet".into()
            }
        );
        assert_eq!(providers[2].label, "ChatGPT (OpenAI gpt-4o-mini)");

        let gemini = registry.resolve("gemini").unwrap();
        assert_eq!(gemini.model_id, "gemini-1.5-flash");
        assert_eq!(gemini.credential_var, "GEMINI_API_KEY");
        assert_eq!(gemini.adapter().provider_key(), "gemini");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let registry = BackendRegistry::with_defaults(&DebateConfig::default());
        assert_eq!(
            registry.resolve("OpenAI").unwrap_err(),
            DebateError::UnknownBackend("OpenAI".into())
        );
    }

    #[test]
    fn register_replaces_same_key_in_place() {
        let mut registry = BackendRegistry::with_defaults(&DebateConfig::default());
        registry.register(RegisteredBackend::new(
            "gemini",
            "Gemini Pro",
            "gemini-1.5-pro",
            "GEMINI_API_KEY",
            Arc::new(GeminiClient::new()),
        ));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.list()[1].label, "Gemini Pro");
    }
}
