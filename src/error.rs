use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::FieldError;

/// Every failure the core can report. The boundary only decides the status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("email already registered")]
    EmailTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("event end must be after start")]
    InvalidTimeRange,

    #[error("caller does not own this resource")]
    NotOwner,

    #[error("resource not found")]
    NotFound,

    #[error("invalid or expired token")]
    TokenInvalid,

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Unreadable or mistyped request bodies are reported like any other invalid field.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AppError::InvalidTimeRange | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotOwner => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::EmailTaken => "email_taken",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidTimeRange => "invalid_time_range",
            AppError::NotOwner => "forbidden",
            AppError::NotFound => "not_found",
            AppError::TokenInvalid => "unauthorized",
            AppError::Validation(_) => "validation_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let (message, details) = match self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                ("An internal error occurred".to_string(), None)
            }
            AppError::Validation(fields) => ("validation failed".to_string(), Some(fields)),
            other => (other.to_string(), None),
        };

        (
            status,
            Json(ErrorBody {
                error: code,
                message,
                details,
            }),
        )
            .into_response()
    }
}
