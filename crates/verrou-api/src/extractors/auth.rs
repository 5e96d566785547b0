//! `AuthUser` extractor: pulls the JWT from the Authorization header, validates it and injects the context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use verrou_core::error::AppError;
use verrou_service::context::RequestContext;

use super::client::{bearer_token, client_ip, user_agent};
use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Missing or malformed bearer token"))?;

        let claims = state.jwt_decoder.decode(&token)?;

        let ctx = RequestContext::new(
            claims.user_id(),
            claims.role,
            claims.email,
            claims.pseudo,
            client_ip(&parts.headers, &parts.extensions),
            user_agent(&parts.headers),
        );

        Ok(AuthUser(ctx))
    }
}
