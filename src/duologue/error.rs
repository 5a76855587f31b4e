//! Error taxonomy shared by the prompt builder, the backend adapters, the turn orchestrator
//! and the debate session.
//!
//! Every failure of a turn surfaces to the caller as exactly one [`DebateError`]; nothing is
//! retried internally and nothing is folded into an empty reply.
//!
//! ```rust
//! use duologue::DebateError;
//!
//! let err = DebateError::UnknownBackend("mistral".into());
//! assert_eq!(err.to_string(), "Unknown provider: mistral");
//! assert_eq!(err.http_status(), 400);
//! ```

use std::error::Error;
use std::fmt;

/// Errors that can occur while building a prompt, selecting a backend or running a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum DebateError {
    /// Required caller input is missing or blank (e.g. an empty topic).
    InvalidInput(String),
    /// The requested backend identity is not registered.
    UnknownBackend(String),
    /// The backend exists but its credential is not configured.
    Configuration(String),
    /// The backend call failed: transport error, timeout, non-2xx status or an
    /// undecodable body.
    Backend {
        /// Registry key of the provider that failed.
        provider_key: String,
        /// Upstream HTTP status, when a response was received.
        http_status: Option<u16>,
        /// Upstream body or transport error description.
        message: String,
        /// Whether the call was aborted by the request timeout.
        timed_out: bool,
    },
    /// A session operation was attempted in a state that does not allow it, or a turn
    /// result arrived for a turn the session no longer waits for.
    InvalidState(String),
}

impl DebateError {
    /// Status code the HTTP control surface answers with for this error.
    ///
    /// Caller mistakes map to `400`, everything on the provider side to `500`.
    pub fn http_status(&self) -> u16 {
        match self {
            DebateError::InvalidInput(_) | DebateError::UnknownBackend(_) => 400,
            DebateError::InvalidState(_) => 409,
            DebateError::Configuration(_) | DebateError::Backend { .. } => 500,
        }
    }

    /// `true` when the error came from an upstream request that hit its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DebateError::Backend { timed_out: true, .. })
    }
}

impl fmt::Display for DebateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebateError::InvalidInput(msg) => write!(f, "{}", msg),
            DebateError::UnknownBackend(key) => write!(f, "Unknown provider: {}", key),
            DebateError::Configuration(msg) => write!(f, "{}", msg),
            DebateError::Backend {
                provider_key,
                http_status,
                message,
                timed_out,
            } => match (http_status, timed_out) {
                (_, true) => write!(f, "{} error: request timed out ({})", provider_key, message),
                (Some(status), false) => write!(f, "{} error: {} {}", provider_key, status, message),
                (None, false) => write!(f, "{} error: {}", provider_key, message),
            },
            DebateError::InvalidState(msg) => write!(f, "Invalid session state: {}", msg),
        }
    }
}

impl Error for DebateError {}
