//! Health check endpoint.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use bridge_common::StatusMessage;

use crate::state::AppState;

pub const HEALTH_MESSAGE: &str = "Ollama OpenAI-compatible API is running!";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health))
}

/// GET / - Health check endpoint. Never touches the engine.
pub async fn health() -> Json<StatusMessage> {
    Json(StatusMessage::new(HEALTH_MESSAGE))
}
