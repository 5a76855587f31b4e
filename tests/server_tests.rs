#![cfg(feature = "server")]

use async_trait::async_trait;
use duologue::orchestrator::TurnOrchestrator;
use duologue::registry::{BackendRegistry, RegisteredBackend};
use duologue::{server, BackendAdapter, Credentials, DebateError};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

struct FixedAdapter {
    key: &'static str,
    response: Result<String, DebateError>,
}

#[async_trait]
impl BackendAdapter for FixedAdapter {
    fn provider_key(&self) -> &str {
        self.key
    }

    async fn send(
        &self,
        _prompt: &str,
        credential: Option<&str>,
        _model_id: &str,
    ) -> Result<String, DebateError> {
        if credential.is_none() {
            return Err(DebateError::Configuration(format!(
                "Missing credential for provider '{}'",
                self.key
            )));
        }
        self.response.clone()
    }
}

async fn spawn_server() -> String {
    let registry = BackendRegistry::new()
        .with_backend(RegisteredBackend::new(
            "good",
            "Good Bot",
            "good-1",
            "GOOD_KEY",
            Arc::new(FixedAdapter {
                key: "good",
                response: Ok("A fine point.".to_string()),
            }),
        ))
        .with_backend(RegisteredBackend::new(
            "flaky",
            "Flaky Bot",
            "flaky-1",
            "FLAKY_KEY",
            Arc::new(FixedAdapter {
                key: "flaky",
                response: Err(DebateError::Backend {
                    provider_key: "flaky".into(),
                    http_status: Some(502),
                    message: "bad gateway".into(),
                    timed_out: false,
                }),
            }),
        ))
        .with_backend(RegisteredBackend::new(
            "keyless",
            "Keyless Bot",
            "keyless-1",
            "KEYLESS_KEY",
            Arc::new(FixedAdapter {
                key: "keyless",
                response: Ok("unreachable".to_string()),
            }),
        ));
    let orchestrator = Arc::new(TurnOrchestrator::new(
        Arc::new(registry),
        Credentials::fixed([("GOOD_KEY", "g"), ("FLAKY_KEY", "f")]),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(orchestrator))
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

async fn post_step(base: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/step", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn providers_are_listed_in_order() {
    let base = spawn_server().await;
    let body: Value = reqwest::get(format!("{}/api/providers", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!({"providers": [
            {"key": "good", "label": "Good Bot"},
            {"key": "flaky", "label": "Flaky Bot"},
            {"key": "keyless", "label": "Keyless Bot"}
        ]})
    );
}

#[tokio::test]
async fn step_returns_speaker_and_text() {
    let base = spawn_server().await;
    let (status, body) = post_step(
        &base,
        json!({
            "engine": "good",
            "topic": "Is water wet?",
            "history": [{"speaker": "Flaky Bot", "text": "Yes."}],
            "extraPrompt": "Keep it short."
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"speaker": "Good Bot", "text": "A fine point."}));
}

#[tokio::test]
async fn history_is_optional() {
    let base = spawn_server().await;
    let (status, body) = post_step(&base, json!({"engine": "good", "topic": "T"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["speaker"], "Good Bot");
}

#[tokio::test]
async fn missing_fields_are_a_bad_request() {
    let base = spawn_server().await;
    for body in [
        json!({"topic": "T"}),
        json!({"engine": "good"}),
        json!({"engine": "good", "topic": "   "}),
    ] {
        let (status, reply) = post_step(&base, body).await;
        assert_eq!(status, 400);
        assert_eq!(reply, json!({"error": "Missing engine or topic."}));
    }
}

#[tokio::test]
async fn unknown_engine_is_a_bad_request() {
    let base = spawn_server().await;
    let (status, reply) = post_step(&base, json!({"engine": "nope", "topic": "T"})).await;
    assert_eq!(status, 400);
    assert_eq!(reply, json!({"error": "Unknown provider: nope"}));
}

#[tokio::test]
async fn provider_failures_are_server_errors() {
    let base = spawn_server().await;

    let (status, reply) = post_step(&base, json!({"engine": "flaky", "topic": "T"})).await;
    assert_eq!(status, 500);
    assert_eq!(reply["error"], "flaky error: 502 bad gateway");

    let (status, reply) = post_step(&base, json!({"engine": "keyless", "topic": "T"})).await;
    assert_eq!(status, 500);
    assert!(reply["error"].as_str().unwrap().contains("keyless"));
}

async fn post_raw(base: &str, body: &str, content_type: Option<&str>) -> (u16, Value) {
    let mut request = reqwest::Client::new()
        .post(format!("{}/api/step", base))
        .body(body.to_string());
    if let Some(content_type) = content_type {
        request = request.header(reqwest::header::CONTENT_TYPE, content_type);
    }
    let response = request.send().await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn malformed_bodies_get_a_json_error() {
    let base = spawn_server().await;
    let cases = [
        (r#"{"engine": "good", "topic": "T"}"#, None),
        ("not json", Some("application/json")),
        (
            r#"{"engine": "good", "topic": "T", "history": [{"speaker": "A"}]}"#,
            Some("application/json"),
        ),
    ];

    for (body, content_type) in cases {
        let (status, reply) = post_raw(&base, body, content_type).await;
        assert_eq!(status, 400, "{}", body);
        let message = reply["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid request body"), "{}", message);
    }
}
