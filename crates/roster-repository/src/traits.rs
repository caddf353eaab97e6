//! Repository trait definitions.

use async_trait::async_trait;
use roster_core::{Interface, NewUser, RosterResult, User, UserChanges, UserId};

/// User repository trait.
///
/// A unique-email violation surfaces as `RosterError::Conflict` from
/// [`insert`](Self::insert) and [`update_fields`](Self::update_fields).
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Returns every user in insertion order.
    async fn find_all(&self) -> RosterResult<Vec<User>>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>>;

    /// Finds a user by exact (case-sensitive) email.
    async fn find_by_email(&self, email: &str) -> RosterResult<Option<User>>;

    /// Inserts a new user and returns the stored record.
    async fn insert(&self, user: NewUser) -> RosterResult<User>;

    /// Applies a partial update. Returns `None` if the user does not exist.
    async fn update_fields(&self, id: UserId, changes: UserChanges) -> RosterResult<Option<User>>;

    /// Deletes a user by ID. Returns false if nothing was deleted.
    async fn delete(&self, id: UserId) -> RosterResult<bool>;
}
