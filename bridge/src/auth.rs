//! Bearer token authentication.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// The single static token protected routes are checked against.
#[derive(Clone)]
pub struct BearerAuth {
    token: Arc<str>,
}

impl BearerAuth {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Exact-match check, compared in constant time.
    pub fn verify(&self, candidate: &str) -> Result<()> {
        if bool::from(candidate.as_bytes().ct_eq(self.token.as_bytes())) {
            Ok(())
        } else {
            Err(Error::InvalidToken)
        }
    }

    /// Check the `Authorization` header of a request.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<()> {
        let credential = bearer_credential(headers).ok_or(Error::MissingCredential)?;
        self.verify(credential)
    }
}

/// Extract the credential from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. Everything after the first
/// space is the credential, untrimmed.
fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    (!credential.is_empty()).then_some(credential)
}

/// Middleware rejecting requests without the configured bearer token.
pub async fn require_bearer(
    State(auth): State<BearerAuth>,
    request: Request,
    next: Next,
) -> std::result::Result<Response, Error> {
    auth.authenticate(request.headers())?;
    Ok(next.run(request).await)
}
