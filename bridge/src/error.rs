//! Error types for the bridge.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bridge_common::ErrorResponse;

pub const INVALID_TOKEN_DETAIL: &str = "Invalid Bearer Token";
pub const NOT_AUTHENTICATED_DETAIL: &str = "Not authenticated";
pub const NO_MODELS_DETAIL: &str = "No Ollama models available on the system.";
pub const ENGINE_FAILURE_DETAIL: &str = "Inference engine request failed";

/// Errors surfaced by the gateway service and its HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No `Authorization: Bearer ...` credential was presented.
    #[error("Missing bearer credential")]
    MissingCredential,

    #[error("Invalid bearer token")]
    InvalidToken,

    /// Inventory is empty even after a refresh.
    #[error("No models available")]
    NoModelsAvailable,

    #[error("Engine communication error: {0}")]
    Communication(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingCredential | Error::InvalidToken => StatusCode::FORBIDDEN,
            Error::NoModelsAvailable => StatusCode::NOT_FOUND,
            Error::Communication(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Client-facing detail. Engine failures stay generic.
    pub fn detail(&self) -> &'static str {
        match self {
            Error::MissingCredential => NOT_AUTHENTICATED_DETAIL,
            Error::InvalidToken => INVALID_TOKEN_DETAIL,
            Error::NoModelsAvailable => NO_MODELS_DETAIL,
            Error::Communication(_) => ENGINE_FAILURE_DETAIL,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::Communication(cause) = &self {
            tracing::error!(error = %cause, "Inference engine call failed");
        }

        let body = Json(ErrorResponse {
            detail: self.detail().to_string(),
        });

        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::MissingCredential.status(), StatusCode::FORBIDDEN);
        assert_eq!(Error::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(Error::NoModelsAvailable.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Communication("boom".to_string()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_engine_detail_does_not_leak_cause() {
        let err = Error::Communication("connection refused at 10.0.0.7:11434".to_string());
        assert_eq!(err.detail(), ENGINE_FAILURE_DETAIL);
    }
}
