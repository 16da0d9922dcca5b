//! OpenAI-compatible HTTP API.

pub mod chat;
pub mod health;
pub mod models;

use std::sync::Arc;

use axum::{middleware, Router};

use crate::auth::require_bearer;
use crate::state::AppState;

/// Response header naming the model a chat request actually ran on.
pub const RESOLVED_MODEL_HEADER: &str = "x-resolved-model";
/// Response header telling whether the requested model was replaced.
pub const MODEL_SUBSTITUTED_HEADER: &str = "x-model-substituted";

/// Build the API router.
///
/// Everything under `/v1` requires the bearer token; the health check at `/`
/// does not.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(chat::router())
        .merge(models::router())
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_bearer,
        ));

    Router::new()
        .merge(health::router())
        .nest("/v1", protected)
        .with_state(state)
}
