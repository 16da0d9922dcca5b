//! Ollama bridge - OpenAI-compatible chat completions in front of a local
//! Ollama, with bearer-token auth and a cached, self-refreshing model list.

pub mod api;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod service;
pub mod state;
pub mod test_util;

pub use auth::BearerAuth;
pub use config::{Config, ConfigError};
pub use engine::{InferenceEngine, OllamaEngine};
pub use error::{Error, Result};
pub use inventory::ModelInventory;
pub use service::{Completion, GatewayService, Resolution};
pub use state::AppState;

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router with CORS, tracing and request logging.
pub fn app(state: Arc<AppState>) -> Router {
    api::router(state)
        .layer(middleware::from_fn(logging::request_logger))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
