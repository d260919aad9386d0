//! Request validation run at the boundary, before any service is called.
//!
//! Each `validate_*` function collects every failing field rather than
//! stopping at the first one.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    auth::dto::{LoginRequest, RegisterRequest},
    error::AppError,
    events::dto::EventRequest,
    guests::dto::{InviteGuestRequest, UpdateGuestStatusRequest},
    guests::repo_types::RsvpStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// `Json` whose rejection is an `AppError`, so malformed bodies get the usual error body.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_FULL_NAME_LEN: usize = 2;
pub const MIN_TITLE_LEN: usize = 3;
pub const MIN_TIMEZONE_LEN: usize = 2;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn finish(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_email(errors: &mut Vec<FieldError>, field: &str, email: &str) {
    if !is_valid_email(email.trim()) {
        errors.push(FieldError::new(field, "must be a valid email address"));
    }
}

fn check_min_len(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize) {
    if value.trim().chars().count() < min {
        errors.push(FieldError::new(
            field,
            format!("must be at least {} characters", min),
        ));
    }
}

pub fn validate_register(req: &RegisterRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_email(&mut errors, "email", &req.email);
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    check_min_len(&mut errors, "full_name", &req.full_name, MIN_FULL_NAME_LEN);
    finish(errors)
}

pub fn validate_login(req: &LoginRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_email(&mut errors, "email", &req.email);
    if req.password.is_empty() {
        errors.push(FieldError::new("password", "is required"));
    }
    finish(errors)
}

pub fn validate_event(req: &EventRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_min_len(&mut errors, "title", &req.title, MIN_TITLE_LEN);
    check_min_len(&mut errors, "timezone", &req.timezone, MIN_TIMEZONE_LEN);
    if req.capacity == Some(0) {
        errors.push(FieldError::new("capacity", "must be a positive integer"));
    }
    finish(errors)
}

pub fn validate_invite(req: &InviteGuestRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_email(&mut errors, "email", &req.email);
    finish(errors)
}

/// Parses the status string into one of the three canonical values.
pub fn validate_status(req: &UpdateGuestStatusRequest) -> Result<RsvpStatus, Vec<FieldError>> {
    req.status.parse::<RsvpStatus>().map_err(|_| {
        vec![FieldError::new(
            "status",
            "must be one of Pending, Accepted, Declined",
        )]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("alice example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn register_collects_every_field_error() {
        let req = RegisterRequest {
            email: "nope".into(),
            password: "123".into(),
            full_name: "A".into(),
        };
        let errs = validate_register(&req).unwrap_err();
        let fields: Vec<_> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password", "full_name"]);
    }

    #[test]
    fn register_accepts_valid_payload() {
        let req = RegisterRequest {
            email: "alice@example.com".into(),
            password: "secret1".into(),
            full_name: "Alice".into(),
        };
        assert!(validate_register(&req).is_ok());
    }

    #[test]
    fn login_requires_password() {
        let req = LoginRequest {
            email: "alice@example.com".into(),
            password: String::new(),
        };
        let errs = validate_login(&req).unwrap_err();
        assert_eq!(errs, vec![FieldError::new("password", "is required")]);
    }

    #[test]
    fn event_rules() {
        let mut req = EventRequest {
            title: "Standup".into(),
            description: None,
            start_utc: datetime!(2026-03-01 10:00 UTC),
            end_utc: datetime!(2026-03-01 11:00 UTC),
            timezone: "UTC".into(),
            location: None,
            capacity: Some(10),
        };
        assert!(validate_event(&req).is_ok());

        req.title = "ab".into();
        req.capacity = Some(0);
        let errs = validate_event(&req).unwrap_err();
        let fields: Vec<_> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "capacity"]);
    }

    #[test]
    fn status_must_be_canonical() {
        let ok = UpdateGuestStatusRequest {
            status: "Accepted".into(),
        };
        assert_eq!(validate_status(&ok).unwrap(), RsvpStatus::Accepted);

        let bad = UpdateGuestStatusRequest {
            status: "Maybe".into(),
        };
        assert_eq!(validate_status(&bad).unwrap_err()[0].field, "status");
    }

    #[test]
    fn invite_requires_email() {
        let req = InviteGuestRequest {
            email: "guest@x.com".into(),
            name: None,
        };
        assert!(validate_invite(&req).is_ok());
        let bad = InviteGuestRequest {
            email: "guest".into(),
            name: Some("G".into()),
        };
        assert!(validate_invite(&bad).is_err());
    }
}
