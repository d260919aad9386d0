use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::{IssuedToken, TokenService},
        password::PasswordRecord,
        repo::UserRepository,
        repo_types::{normalize_email, User},
    },
    clock::Clock,
    error::AppError,
};

/// Registration and login on top of the credential store and token service.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            clock,
        }
    }

    /// Creates an account. Does not log the user in.
    pub fn register(&self, email: &str, password: &str, full_name: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        // Cheap early exit before the KDF; the repository re-checks atomically.
        if self.users.get_by_email(&email).is_some() {
            warn!(email = %email, "email already registered");
            return Err(AppError::EmailTaken);
        }

        let record = PasswordRecord::create(password).map_err(anyhow::Error::from)?;
        let user = self.users.add(User {
            id: Uuid::new_v4(),
            email,
            full_name: full_name.trim().to_string(),
            password_hash: record.to_string(),
            created_at: self.clock.now(),
        })?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Unknown email, unreadable stored hash and wrong password are indistinguishable.
    pub fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.get_by_email(&email) else {
            warn!(email = %email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let record: PasswordRecord = match user.password_hash.parse() {
            Ok(r) => r,
            Err(_) => {
                warn!(user_id = %user.id, "stored password record is malformed");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !record.matches(password) {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let issued = self.tokens.issue(user.id).map_err(anyhow::Error::from)?;
        info!(user_id = %user.id, "user logged in");
        Ok(issued)
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.users.get_by_id(id)
    }
}
