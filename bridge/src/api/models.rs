//! Model inventory endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use bridge_common::ModelInventoryResponse;

use crate::error::Result;
use crate::state::AppState;

/// Build the models router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/models/update", get(update_models))
}

/// GET /v1/models/update - Refresh the model cache and return it.
async fn update_models(State(state): State<Arc<AppState>>) -> Result<Json<ModelInventoryResponse>> {
    let models = state.service.model_inventory().await?;

    tracing::info!(count = models.len(), "Model cache updated on request");

    Ok(Json(ModelInventoryResponse {
        message: "Model cache updated".to_string(),
        models: models.to_vec(),
    }))
}
