use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        extractors::AuthUser,
    },
    error::AppError,
    state::AppState,
    validation::{validate_login, validate_register, AppJson},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_me))
}

/// Runs a KDF-bound closure off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("blocking task failed: {}", e)))?
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    validate_register(&payload).map_err(|errors| {
        warn!(count = errors.len(), "register payload rejected");
        AppError::Validation(errors)
    })?;

    let auth = state.auth.clone();
    let user = blocking(move || {
        auth.register(&payload.email, &payload.password, &payload.full_name)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_login(&payload).map_err(AppError::Validation)?;

    let auth = state.auth.clone();
    let issued = blocking(move || auth.login(&payload.email, &payload.password)).await?;
    Ok(Json(issued.into()))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    // A valid token for an unknown user is treated as unauthenticated.
    let user = state.auth.user(user_id).ok_or_else(|| {
        warn!(%user_id, "token subject has no account");
        AppError::TokenInvalid
    })?;
    Ok(Json(user.into()))
}
