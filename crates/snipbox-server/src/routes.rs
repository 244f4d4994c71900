//! HTTP routes for the snipbox server.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use snipbox_core::Runner;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
pub struct AppState {
    pub runner: Runner,
}

/// Body of `POST /run`.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub source: String,
}

/// Answer of `POST /run`.
///
/// `reply` is `null` when there is nothing to tell the user: blank source
/// or an internal fault.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunResponse {
    pub reply: Option<String>,
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/run", post(run_handler))
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Compile and run one snippet.
async fn run_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunRequest>,
) -> Json<RunResponse> {
    let reply = state.runner.handle(&request.source).await;
    Json(RunResponse {
        reply: reply.text().map(str::to_string),
    })
}

/// Panics still answer `200`: the request was received.
fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    Json(RunResponse { reply: None }).into_response()
}
