//! Shared application state.

use std::sync::Arc;

use crate::auth::BearerAuth;
use crate::config::Config;
use crate::service::GatewayService;

/// Shared application state passed to all handlers.
pub struct AppState {
    pub service: Arc<GatewayService>,
    pub auth: BearerAuth,
}

impl AppState {
    pub fn new(config: &Config, service: Arc<GatewayService>) -> Self {
        Self {
            service,
            auth: BearerAuth::new(config.auth.bearer_token.as_str()),
        }
    }
}
