use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{GuestResponse, InviteGuestRequest, UpdateGuestStatusRequest};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    state::AppState,
    validation::{validate_invite, validate_status, AppJson},
};

pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events/:id/guests",
            get(list_guests).post(invite_guest),
        )
        .route(
            "/events/:id/guests/:guest_id",
            patch(update_guest_status).delete(remove_guest),
        )
}

#[instrument(skip(state, payload))]
pub async fn invite_guest(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<Uuid>,
    AppJson(payload): AppJson<InviteGuestRequest>,
) -> Result<(StatusCode, Json<GuestResponse>), AppError> {
    validate_invite(&payload).map_err(AppError::Validation)?;
    let guest = state
        .guests
        .invite(user_id, event_id, &payload.email, payload.name)?;
    Ok((StatusCode::CREATED, Json(guest.into())))
}

#[instrument(skip(state))]
pub async fn list_guests(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<GuestResponse>>, AppError> {
    let guests = state.guests.list_by_event(user_id, event_id)?;
    Ok(Json(guests.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn update_guest_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((event_id, guest_id)): Path<(Uuid, Uuid)>,
    AppJson(payload): AppJson<UpdateGuestStatusRequest>,
) -> Result<Json<GuestResponse>, AppError> {
    let status = validate_status(&payload).map_err(AppError::Validation)?;
    let guest = state
        .guests
        .update_status(user_id, event_id, guest_id, status)?;
    Ok(Json(guest.into()))
}

#[instrument(skip(state))]
pub async fn remove_guest(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((event_id, guest_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.guests.remove(user_id, event_id, guest_id)?;
    Ok(StatusCode::NO_CONTENT)
}
