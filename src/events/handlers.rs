use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{EventRequest, EventResponse};
use crate::{
    auth::extractors::AuthUser, error::AppError, state::AppState,
    validation::{validate_event, AppJson},
};

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/mine", get(list_my_events))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<EventRequest>,
) -> Result<(StatusCode, HeaderMap, Json<EventResponse>), AppError> {
    validate_event(&payload).map_err(AppError::Validation)?;
    let event = state.events.create(user_id, payload.into())?;

    let mut headers = HeaderMap::new();
    if let Ok(loc) = HeaderValue::from_str(&format!("/api/events/{}", event.id)) {
        headers.insert(header::LOCATION, loc);
    }
    Ok((StatusCode::CREATED, headers, Json(event.into())))
}

#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Json<Vec<EventResponse>> {
    Json(state.events.list_all().into_iter().map(Into::into).collect())
}

#[instrument(skip(state))]
pub async fn list_my_events(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<Vec<EventResponse>> {
    Json(
        state
            .events
            .list_mine(user_id)
            .into_iter()
            .map(Into::into)
            .collect(),
    )
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    Ok(Json(state.events.get(id)?.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<EventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    validate_event(&payload).map_err(AppError::Validation)?;
    Ok(Json(state.events.update(user_id, id, payload.into())?.into()))
}

#[instrument(skip(state))]
pub async fn delete_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.events.delete(user_id, id)?;
    Ok(StatusCode::NO_CONTENT)
}
