//! User service trait definition.

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use roster_core::{Interface, RosterResult, UserId};
use async_trait::async_trait;

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Lists every user in store order.
    async fn list_users(&self) -> RosterResult<Vec<UserResponse>>;

    /// Creates a new user.
    async fn create_user(&self, request: CreateUserRequest) -> RosterResult<UserResponse>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> RosterResult<UserResponse>;

    /// Updates the supplied fields of a user.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> RosterResult<UserResponse>;

    /// Deletes a user.
    async fn delete_user(&self, id: UserId) -> RosterResult<()>;
}
