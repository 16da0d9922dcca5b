//! Chat completions endpoint (OpenAI-compatible).

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bridge_common::ChatCompletionRequest;

use super::{MODEL_SUBSTITUTED_HEADER, RESOLVED_MODEL_HEADER};
use crate::error::Result;
use crate::state::AppState;

/// Build the chat router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat/completions", post(chat_completions))
}

/// POST /v1/chat/completions - OpenAI-compatible chat completion.
///
/// The body carries the engine's reply; the resolved model is reported on
/// the response headers as well as in `model`.
async fn chat_completions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<Response> {
    tracing::debug!("Chat completion request for model: {}", request.model);

    let completion = state.service.chat_completion(&request).await?;
    let resolution = completion.resolution;

    let mut response = Json(completion.response).into_response();
    let headers = response.headers_mut();

    // Model names come from the engine and are not guaranteed header-safe.
    if let Ok(value) = HeaderValue::from_str(&resolution.model) {
        headers.insert(HeaderName::from_static(RESOLVED_MODEL_HEADER), value);
    }
    headers.insert(
        HeaderName::from_static(MODEL_SUBSTITUTED_HEADER),
        HeaderValue::from_static(if resolution.substituted() {
            "true"
        } else {
            "false"
        }),
    );

    Ok(response)
}
