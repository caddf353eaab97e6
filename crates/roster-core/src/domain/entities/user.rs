//! User entity.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned once at creation.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Email address, unique across all users as stored.
    pub email: String,

    /// Phone number as a digit string.
    pub phone: String,

    /// Department the user belongs to.
    pub department: String,

    /// Whether the account is active.
    pub is_active: bool,

    /// Hashed password (never exposed via API).
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Activity flag used when a new user does not specify one.
    pub const DEFAULT_ACTIVE: bool = true;

    /// Applies the supplied changes, leaving every absent field untouched.
    ///
    /// Returns true if anything was applied; `updated_at` only moves in that case.
    pub fn apply_changes(&mut self, changes: UserChanges) -> bool {
        if changes.is_empty() {
            return false;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(department) = changes.department {
            self.department = department;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if let Some(password_hash) = changes.password_hash {
            self.password_hash = password_hash;
        }
        self.updated_at = Utc::now();
        true
    }
}

/// A user ready to be inserted. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    /// `None` lets the store apply its default.
    pub is_active: Option<bool>,
    pub password_hash: String,
}

impl NewUser {
    /// Creates a new user with a freshly assigned id.
    #[must_use]
    pub fn new(
        name: String,
        email: String,
        phone: String,
        department: String,
        is_active: Option<bool>,
        password_hash: String,
    ) -> Self {
        Self {
            id: UserId::new(),
            name,
            email,
            phone,
            department,
            is_active,
            password_hash,
        }
    }

    /// Materializes the record as a store would, stamping both timestamps with `now`.
    #[must_use]
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            department: self.department,
            is_active: self.is_active.unwrap_or(User::DEFAULT_ACTIVE),
            password_hash: self.password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update. Each `Some` field replaces the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    /// Returns true if no field is being changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.department.is_none()
            && self.is_active.is_none()
            && self.password_hash.is_none()
    }
}
