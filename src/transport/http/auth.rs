//! Bearer-token extractors for protected routes.

use crate::app::ServiceError;
use crate::crypto::Claims;
use crate::transport::http::handlers::common::{bearer_token, token_preview};
use crate::transport::http::types::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;
use tracing::{debug, warn};

/// Claims of a valid token. Rejects with 401 when no token is sent and 403 when the
/// token is invalid or expired.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            warn!(path = %parts.uri.path(), "no bearer token on protected route");
            ServiceError::unauthorized("Access token required")
        })?;

        match state.tokens.verify(token) {
            Ok(claims) => {
                debug!(user_id = claims.user_id, "authenticated request");
                Ok(AuthUser(claims))
            }
            Err(e) => {
                warn!(error = %e, token = %token_preview(token), "rejected bearer token");
                Err(ServiceError::forbidden("Invalid or expired token"))
            }
        }
    }
}

/// Like [`AuthUser`] but never rejects; a missing or bad token yields `None`.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<Claims>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(&parts.headers).and_then(|token| match state.tokens.verify(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "optional auth: ignoring bad token");
                None
            }
        });
        Ok(OptionalAuthUser(claims))
    }
}
