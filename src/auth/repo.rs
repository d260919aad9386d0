use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    auth::repo_types::{normalize_email, User},
    error::AppError,
};

/// Credential store.
pub trait UserRepository: Send + Sync {
    /// Inserts `user` unless its normalized email is already registered.
    /// The check and the insert happen atomically.
    fn add(&self, user: User) -> Result<User, AppError>;
    fn get_by_id(&self, id: Uuid) -> Option<User>;
    fn get_by_email(&self, email: &str) -> Option<User>;
}

#[derive(Default)]
struct Users {
    by_id: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Users>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn add(&self, mut user: User) -> Result<User, AppError> {
        user.email = normalize_email(&user.email);
        let mut users = self.inner.write();
        if users.by_email.contains_key(&user.email) {
            return Err(AppError::EmailTaken);
        }
        users.by_email.insert(user.email.clone(), user.id);
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    fn get_by_id(&self, id: Uuid) -> Option<User> {
        self.inner.read().by_id.get(&id).cloned()
    }

    fn get_by_email(&self, email: &str) -> Option<User> {
        let users = self.inner.read();
        let id = users.by_email.get(&normalize_email(email))?;
        users.by_id.get(id).cloned()
    }
}
