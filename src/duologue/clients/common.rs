use crate::duologue::error::DebateError;
use log::error;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// Return the credential, or a configuration error when it is absent or blank.
///
/// Adapters call this before building any request so a missing key never reaches the wire.
pub fn require_credential<'a>(
    provider_key: &str,
    credential: Option<&'a str>,
) -> Result<&'a str, DebateError> {
    match credential.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => {
            error!(
                "duologue::clients::{}: credential is not configured",
                provider_key
            );
            Err(DebateError::Configuration(format!(
                "Missing credential for provider '{}'",
                provider_key
            )))
        }
    }
}

/// Send a prepared request with `timeout`, fail on any non-2xx status, and decode the body.
///
/// The upstream body is kept verbatim in the error for non-2xx responses. A 2xx body that is
/// not valid JSON for `T` is also a backend failure; only absent fields may collapse to
/// empty text, and that is the response type's job.
pub async fn send_and_decode<T: DeserializeOwned>(
    provider_key: &str,
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<T, DebateError> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|err| transport_error(provider_key, err))?;

    let status = response.status();
    let body = response.text().await.map_err(reqwest::Error::without_url);

    if !status.is_success() {
        return Err(status_error(provider_key, status.as_u16(), body));
    }
    let body = body.map_err(|err| transport_error(provider_key, err))?;

    serde_json::from_str(&body).map_err(|err| {
        error!(
            "duologue::clients::{}: could not decode response body: {}",
            provider_key, err
        );
        DebateError::Backend {
            provider_key: provider_key.to_string(),
            http_status: Some(status.as_u16()),
            message: format!("Could not decode response body: {}", err),
            timed_out: false,
        }
    })
}

/// Error for a non-2xx response. The status is kept even when the body could not be read.
fn status_error<E: fmt::Display>(
    provider_key: &str,
    status: u16,
    body: Result<String, E>,
) -> DebateError {
    let message = match body {
        Ok(body) => body,
        Err(err) => format!("failed to read response body: {}", err),
    };
    error!(
        "duologue::clients::{}: upstream returned {}: {}",
        provider_key, status, message
    );
    DebateError::Backend {
        provider_key: provider_key.to_string(),
        http_status: Some(status),
        message,
        timed_out: false,
    }
}

/// Classify a reqwest failure. The URL is stripped because some providers carry the key in
/// the query string.
fn transport_error(provider_key: &str, err: reqwest::Error) -> DebateError {
    let err = err.without_url();
    let timed_out = err.is_timeout();
    error!(
        "duologue::clients::{}: request failed (timeout: {}): {}",
        provider_key, timed_out, err
    );
    DebateError::Backend {
        provider_key: provider_key.to_string(),
        http_status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
        timed_out,
    }
}

/// Join a base URL and a path without doubling the slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_credential_is_a_configuration_error() {
        assert!(matches!(
            require_credential("openai", None),
            Err(DebateError::Configuration(_))
        ));
        assert!(matches!(
            require_credential("openai", Some(" ")),
            Err(DebateError::Configuration(_))
        ));
        assert_eq!(require_credential("openai", Some(" sk ")).unwrap(), "sk");
    }

    #[test]
    fn unreadable_error_body_keeps_the_status() {
        let err = status_error("claude", 529, Err::<String, _>("connection reset"));
        assert_eq!(
            err,
            DebateError::Backend {
                provider_key: "claude".into(),
                http_status: Some(529),
                message: "failed to read response body: connection reset".into(),
                timed_out: false,
            }
        );

        let err = status_error::<String>("openai", 429, Ok("slow down".into()));
        assert_eq!(err.to_string(), "openai error: 429 slow down");
    }

    #[test]
    fn join_url_handles_trailing_slashes() {
        assert_eq!(
            join_url("https://api.openai.com/", "/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            join_url("http://127.0.0.1:9000", "v1/messages"),
            "http://127.0.0.1:9000/v1/messages"
        );
    }
}
