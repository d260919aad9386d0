use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use super::jwt::TokenService;
use crate::error::AppError;

/// Extracts and validates the bearer token, yielding the caller's user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::TokenInvalid)?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(AppError::TokenInvalid)?;

        let tokens = TokenService::from_ref(state);
        let user_id = tokens.verify(token.trim()).map_err(|_| AppError::TokenInvalid)?;
        Ok(AuthUser(user_id))
    }
}
