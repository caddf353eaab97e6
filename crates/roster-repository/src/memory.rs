//! In-memory user repository.

use crate::traits::UserRepository;
use async_trait::async_trait;
use chrono::Utc;
use roster_core::{NewUser, RosterError, RosterResult, User, UserChanges, UserId};
use tokio::sync::RwLock;
use tracing::debug;

/// A `UserRepository` kept in process memory.
///
/// Users are stored in insertion order. Email uniqueness is checked under the
/// write lock, so it holds under concurrent inserts just like a unique index.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Returns true if no users are stored.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    fn duplicate_email(email: &str) -> RosterError {
        RosterError::conflict(format!("Duplicate entry '{email}' for key 'users_email_unique'"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> RosterResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RosterResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> RosterResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(Self::duplicate_email(&user.email));
        }
        if users.iter().any(|u| u.id == user.id) {
            return Err(RosterError::conflict(format!("Duplicate entry '{}' for key 'PRIMARY'", user.id)));
        }

        let user = user.into_user(Utc::now());
        debug!("Inserted user: {}", user.id);
        users.push(user.clone());
        Ok(user)
    }

    async fn update_fields(&self, id: UserId, changes: UserChanges) -> RosterResult<Option<User>> {
        let mut users = self.users.write().await;

        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(Self::duplicate_email(email));
            }
        }

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.apply_changes(changes);
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> RosterResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}
