//! HTTP control surface (available on the `server` feature).
//!
//! - `POST /api/step` takes `{engine, topic, history, extraPrompt}` and answers
//!   `{speaker, text}`, or `{error}` with a 4xx/5xx status. A body that is not a JSON
//!   step request is answered with `400` and `{error}` as well.
//! - `GET /api/providers` answers `{providers: [{key, label}]}`.
//!
//! The server is stateless: the transcript travels with every request and the caller
//! appends the reply itself.

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde_json::json;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::duologue::error::DebateError;
use crate::duologue::orchestrator::{StepRequest, TurnOrchestrator};

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Build the router around a shared orchestrator.
pub fn router(orchestrator: Arc<TurnOrchestrator>) -> Router {
    Router::new()
        .route("/api/step", post(step_handler))
        .route("/api/providers", get(providers_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(orchestrator)
}

/// Bind `addr` and serve until the task is dropped or the listener fails.
pub async fn serve(
    orchestrator: Arc<TurnOrchestrator>,
    addr: SocketAddr,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Server at http://{}", listener.local_addr()?);
    axum::serve(listener, router(orchestrator)).await?;
    Ok(())
}

async fn step_handler(
    State(orchestrator): State<Arc<TurnOrchestrator>>,
    request: Result<Json<StepRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            return error_response(DebateError::InvalidInput(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    };
    match orchestrator.step(request).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn providers_handler(State(orchestrator): State<Arc<TurnOrchestrator>>) -> Response {
    Json(json!({ "providers": orchestrator.list_providers() })).into_response()
}

fn error_response(err: DebateError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!("duologue::server: {}", err);
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
