//! Configuration for Duologue.
//!
//! [`DebateConfig`] carries the process-level knobs (listen port, per-request timeout and
//! sampling parameters) and [`Credentials`] resolves one secret per backend. Both can be
//! built by hand or read from the environment; no config-file parsing is involved.
//!
//! # Example
//!
//! ```rust
//! use duologue::DebateConfig;
//! use std::time::Duration;
//!
//! let config = DebateConfig::from_lookup(|name| match name {
//!     "PORT" => Some("8080".to_string()),
//!     "DUOLOGUE_TIMEOUT_SECS" => Some("15".to_string()),
//!     _ => None,
//! });
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.request_timeout, Duration::from_secs(15));
//! assert_eq!(config.sampling.max_output_tokens, 500);
//! ```

use log::warn;
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const PORT_VAR: &str = "PORT";
pub const TIMEOUT_VAR: &str = "DUOLOGUE_TIMEOUT_SECS";
pub const TEMPERATURE_VAR: &str = "DUOLOGUE_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "DUOLOGUE_MAX_TOKENS";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sampling parameters sent with every backend request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    /// Upper bound on generated tokens. The OpenAI adapter does not send it.
    pub max_output_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        SamplingParams {
            temperature: 0.8,
            max_output_tokens: 500,
        }
    }
}

/// Global configuration for a Duologue process.
#[derive(Clone, Debug, PartialEq)]
pub struct DebateConfig {
    /// Port the HTTP control surface listens on.
    pub port: u16,
    /// Bound on every outbound backend request, so a hung provider cannot stall a session.
    pub request_timeout: Duration,
    pub sampling: SamplingParams,
}

impl Default for DebateConfig {
    fn default() -> Self {
        DebateConfig {
            port: DEFAULT_PORT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sampling: SamplingParams::default(),
        }
    }
}

impl DebateConfig {
    /// Read `PORT`, `DUOLOGUE_TIMEOUT_SECS`, `DUOLOGUE_TEMPERATURE` and
    /// `DUOLOGUE_MAX_TOKENS` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Missing values take the default;
    /// unparseable values are logged and take the default too.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DebateConfig::default();
        DebateConfig {
            port: parse_or(&lookup, PORT_VAR, defaults.port),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                TIMEOUT_VAR,
                defaults.request_timeout.as_secs(),
            )),
            sampling: SamplingParams {
                temperature: parse_or(&lookup, TEMPERATURE_VAR, defaults.sampling.temperature),
                max_output_tokens: parse_or(
                    &lookup,
                    MAX_TOKENS_VAR,
                    defaults.sampling.max_output_tokens,
                ),
            },
        }
    }

    /// `0.0.0.0:{port}`.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            warn!(
                "duologue::config: ignoring unparseable {}={:?}, using default",
                name, raw
            );
            default
        }),
        _ => default,
    }
}

/// Where backend secrets come from.
///
/// Blank values are treated as absent, so an exported-but-empty variable still yields a
/// configuration error instead of an unauthenticated request.
#[derive(Clone)]
pub enum Credentials {
    /// Look each variable up in the process environment at call time.
    Environment,
    /// Fixed secrets keyed by variable name.
    Fixed(HashMap<String, String>),
}

impl Credentials {
    /// Convenience constructor for [`Credentials::Fixed`].
    pub fn fixed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Credentials::Fixed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Secret stored under `variable`, if present and non-blank.
    pub fn resolve(&self, variable: &str) -> Option<String> {
        let value = match self {
            Credentials::Environment => std::env::var(variable).ok(),
            Credentials::Fixed(secrets) => secrets.get(variable).cloned(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials::Environment
    }
}

// Never print secret values.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Environment => f.write_str("Credentials::Environment"),
            Credentials::Fixed(secrets) => {
                let mut names: Vec<&String> = secrets.keys().collect();
                names.sort();
                f.debug_tuple("Credentials::Fixed").field(&names).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = DebateConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.sampling.temperature, 0.8);
        assert_eq!(config.sampling.max_output_tokens, 500);
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        let config = DebateConfig::from_lookup(|name| match name {
            "PORT" => Some("not-a-port".to_string()),
            "DUOLOGUE_TEMPERATURE" => Some("0.3".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 3000);
        assert_eq!(config.sampling.temperature, 0.3);
    }

    #[test]
    fn blank_secrets_are_absent() {
        let creds = Credentials::fixed([("OPENAI_API_KEY", "  "), ("GEMINI_API_KEY", "g-key")]);
        assert_eq!(creds.resolve("OPENAI_API_KEY"), None);
        assert_eq!(creds.resolve("GEMINI_API_KEY"), Some("g-key".to_string()));
        assert_eq!(creds.resolve("ANTHROPIC_API_KEY"), None);
    }

    #[test]
    fn debug_output_hides_secret_values() {
        let creds = Credentials::fixed([("OPENAI_API_KEY", "sk-secret")]);
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("OPENAI_API_KEY"));
        assert!(!rendered.contains("sk-secret"));
    }
}
