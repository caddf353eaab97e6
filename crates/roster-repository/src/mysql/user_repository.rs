//! MySQL user repository implementation.

use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_core::{NewUser, RosterError, RosterResult, User, UserChanges, UserId};
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const SELECT_USER: &str = r"
    SELECT id, name, email, phone, department, is_active, password_hash,
           created_at, updated_at
    FROM users
";

/// MySQL user repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct MySqlUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserRepository {
    /// Creates a new MySQL user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn fetch_one_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(User::try_from).transpose()
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository").finish_non_exhaustive()
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String, // MySQL stores UUID as CHAR(36)
    name: String,
    email: String,
    phone: String,
    department: String,
    is_active: bool,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RosterError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| RosterError::Internal(format!("Invalid UUID in database: {e}")))?;

        Ok(User {
            id: UserId::from_uuid(id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            department: row.department,
            is_active: row.is_active,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_all(&self) -> RosterResult<Vec<User>> {
        debug!("Finding all users");

        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY created_at, id"))
            .fetch_all(self.pool.inner())
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        debug!("Finding user by id: {}", id);
        self.fetch_one_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> RosterResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        // The email column uses a binary collation, so `=` is case-sensitive.
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE email = ?"))
            .bind(email)
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn insert(&self, user: NewUser) -> RosterResult<User> {
        debug!("Inserting user: {}", user.id);

        let id = user.id;
        let mut query = QueryBuilder::<MySql>::new(
            "INSERT INTO users (id, name, email, phone, department, password_hash",
        );
        if user.is_active.is_some() {
            query.push(", is_active");
        }
        query.push(") VALUES (");
        {
            let mut values = query.separated(", ");
            values.push_bind(id.to_string());
            values.push_bind(user.name);
            values.push_bind(user.email);
            values.push_bind(user.phone);
            values.push_bind(user.department);
            values.push_bind(user.password_hash);
            if let Some(is_active) = user.is_active {
                values.push_bind(is_active);
            }
        }
        query.push(")");

        query.build().execute(self.pool.inner()).await?;

        // MySQL has no RETURNING; read back the defaulted columns.
        self.fetch_one_by_id(id)
            .await?
            .ok_or_else(|| RosterError::internal(format!("User {id} missing after insert")))
    }

    async fn update_fields(&self, id: UserId, changes: UserChanges) -> RosterResult<Option<User>> {
        if changes.is_empty() {
            return self.fetch_one_by_id(id).await;
        }

        debug!("Updating user: {}", id);

        let UserChanges {
            name,
            email,
            phone,
            department,
            is_active,
            password_hash,
        } = changes;

        let mut query = QueryBuilder::<MySql>::new("UPDATE users SET ");
        {
            let mut sets = query.separated(", ");
            if let Some(name) = name {
                sets.push("name = ").push_bind_unseparated(name);
            }
            if let Some(email) = email {
                sets.push("email = ").push_bind_unseparated(email);
            }
            if let Some(phone) = phone {
                sets.push("phone = ").push_bind_unseparated(phone);
            }
            if let Some(department) = department {
                sets.push("department = ").push_bind_unseparated(department);
            }
            if let Some(is_active) = is_active {
                sets.push("is_active = ").push_bind_unseparated(is_active);
            }
            if let Some(password_hash) = password_hash {
                sets.push("password_hash = ").push_bind_unseparated(password_hash);
            }
            sets.push("updated_at = CURRENT_TIMESTAMP(6)");
        }
        query.push(" WHERE id = ").push_bind(id.to_string());

        query.build().execute(self.pool.inner()).await?;

        self.fetch_one_by_id(id).await
    }

    async fn delete(&self, id: UserId) -> RosterResult<bool> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
