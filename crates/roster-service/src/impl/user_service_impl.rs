//! User service implementation.

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::user_service::UserService;
use async_trait::async_trait;
use roster_core::{
    messages, FieldErrors, NewUser, RosterError, RosterResult, UserChanges, UserId,
};
use roster_repository::UserRepository;
use roster_security::PasswordHasherInterface;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// User service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceImpl {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    /// Adds the uniqueness error for `email` unless it is free or owned by `owner`.
    ///
    /// Skipped when the email already failed a format rule.
    async fn check_email_available(
        &self,
        email: &str,
        owner: Option<UserId>,
        errors: &mut FieldErrors,
    ) -> RosterResult<()> {
        if errors.contains("email") {
            return Ok(());
        }
        if let Some(existing) = self.user_repository.find_by_email(email).await? {
            if Some(existing.id) != owner {
                errors.add("email", messages::unique("email"));
            }
        }
        Ok(())
    }

    /// Hashes off the async runtime; argon2 is deliberately slow.
    async fn hash_password(&self, password: String) -> RosterResult<String> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| RosterError::internal(format!("Password hashing task failed: {e}")))?
    }
}

/// Maps a store-level duplicate email into the field error a pre-check would give.
fn email_taken(error: RosterError) -> RosterError {
    match error {
        RosterError::Conflict(detail) => {
            warn!("Email uniqueness enforced by store: {}", detail);
            RosterError::validation("email", messages::unique("email"))
        }
        other => other,
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn list_users(&self) -> RosterResult<Vec<UserResponse>> {
        debug!("Listing users");

        let users = self.user_repository.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn create_user(&self, request: CreateUserRequest) -> RosterResult<UserResponse> {
        debug!("Creating user: {:?}", request.email.as_str());

        let email = request.email.as_str().map(str::to_owned);
        let validated = request.into_validated();
        let mut errors = validated.as_ref().err().cloned().unwrap_or_default();
        if let Some(email) = email.as_deref() {
            self.check_email_available(email, None, &mut errors).await?;
        }
        if !errors.is_empty() {
            return Err(RosterError::Validation(errors));
        }
        let validated = validated.map_err(RosterError::Validation)?;

        let password_hash = self.hash_password(validated.password).await?;
        let user = NewUser::new(
            validated.name,
            validated.email,
            validated.phone,
            validated.department,
            validated.is_active,
            password_hash,
        );

        let saved_user = self.user_repository.insert(user).await.map_err(email_taken)?;

        info!("User created: {}", saved_user.id);
        Ok(UserResponse::from(saved_user))
    }

    async fn get_user(&self, id: UserId) -> RosterResult<UserResponse> {
        debug!("Getting user: {}", id);

        let user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::not_found("User", id))?;

        Ok(UserResponse::from(user))
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> RosterResult<UserResponse> {
        debug!("Updating user: {}", id);

        if self.user_repository.find_by_id(id).await?.is_none() {
            return Err(RosterError::not_found("User", id));
        }

        let email = request.email.as_str().map(str::to_owned);
        let validated = request.into_validated();
        let mut errors = validated.as_ref().err().cloned().unwrap_or_default();
        if let Some(email) = email.as_deref() {
            self.check_email_available(email, Some(id), &mut errors).await?;
        }
        if !errors.is_empty() {
            return Err(RosterError::Validation(errors));
        }
        let validated = validated.map_err(RosterError::Validation)?;

        let password_hash = match validated.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };
        let changes = UserChanges {
            name: validated.name,
            email: validated.email,
            phone: validated.phone,
            department: validated.department,
            is_active: validated.is_active,
            password_hash,
        };

        let updated_user = self
            .user_repository
            .update_fields(id, changes)
            .await
            .map_err(email_taken)?
            .ok_or_else(|| RosterError::not_found("User", id))?;

        info!("User updated: {}", id);
        Ok(UserResponse::from(updated_user))
    }

    async fn delete_user(&self, id: UserId) -> RosterResult<()> {
        debug!("Deleting user: {}", id);

        let deleted = self.user_repository.delete(id).await?;

        if !deleted {
            return Err(RosterError::not_found("User", id));
        }

        info!("User deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::Field;
    use mockall::mock;
    use roster_core::{User, UserChanges};
    use roster_repository::InMemoryUserRepository;
    use roster_security::PasswordHasher;

    mock! {
        pub Repo {}

        #[async_trait]
        impl UserRepository for Repo {
            async fn find_all(&self) -> RosterResult<Vec<User>>;
            async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>>;
            async fn find_by_email(&self, email: &str) -> RosterResult<Option<User>>;
            async fn insert(&self, user: NewUser) -> RosterResult<User>;
            async fn update_fields(&self, id: UserId, changes: UserChanges) -> RosterResult<Option<User>>;
            async fn delete(&self, id: UserId) -> RosterResult<bool>;
        }
    }

    fn hasher() -> Arc<PasswordHasher> {
        Arc::new(PasswordHasher::with_cost(1))
    }

    fn service() -> (UserServiceImpl, Arc<InMemoryUserRepository>) {
        let repo = Arc::new(InMemoryUserRepository::new());
        (UserServiceImpl::new(repo.clone(), hasher()), repo)
    }

    fn create_request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "John Doe".into(),
            email: email.into(),
            phone: "081234567890".into(),
            department: "IT".into(),
            is_active: Field::Absent,
            password: "password123".into(),
            password_confirmation: "password123".into(),
        }
    }

    fn field_errors(err: RosterError) -> FieldErrors {
        match err {
            RosterError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_user_stores_hashed_password() {
        let (service, repo) = service();

        let created = service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap();
        assert_eq!(created.name, "John Doe");
        assert!(created.is_active);

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "password123");
        assert!(hasher().verify("password123", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_user_respects_explicit_inactive() {
        let (service, _) = service();
        let request = CreateUserRequest {
            is_active: false.into(),
            ..create_request("inactive@example.com")
        };

        let created = service.create_user(request).await.unwrap();
        assert!(!created.is_active);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let (service, repo) = service();
        service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap();

        let err = service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap_err();
        let errors = field_errors(err);
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email has already been taken."]
        );
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_user_email_uniqueness_is_case_sensitive() {
        let (service, _) = service();
        service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap();

        assert!(service
            .create_user(create_request("John@example.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_create_user_reports_every_failing_field() {
        let (service, repo) = service();
        service
            .create_user(create_request("taken@example.com"))
            .await
            .unwrap();

        let request = CreateUserRequest {
            name: Field::Absent,
            phone: "123".into(),
            ..create_request("taken@example.com")
        };
        let errors = field_errors(service.create_user(request).await.unwrap_err());

        assert!(errors.contains("name"));
        assert!(errors.contains("phone"));
        assert!(errors.contains("email"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let (service, _) = service();
        let err = service.get_user(UserId::new()).await.unwrap_err();
        assert!(matches!(err, RosterError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_users_in_creation_order() {
        let (service, _) = service();
        assert!(service.list_users().await.unwrap().is_empty());

        for email in ["b@example.com", "a@example.com"] {
            service.create_user(create_request(email)).await.unwrap();
        }

        let emails: Vec<String> = service
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, ["b@example.com", "a@example.com"]);
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let (service, _) = service();
        let created = service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap();

        let request = UpdateUserRequest {
            name: "X".into(),
            ..UpdateUserRequest::default()
        };
        let updated = service.update_user(created.id, request).await.unwrap();

        assert_eq!(updated.name, "X");
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.phone, created.phone);
        assert_eq!(updated.department, created.department);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_user_null_fields_are_rejected() {
        let (service, repo) = service();
        let created = service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap();

        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"name":null,"email":null}"#).unwrap();
        let errors = field_errors(service.update_user(created.id, request).await.unwrap_err());
        assert_eq!(errors.get("name").unwrap(), ["The name field is required."]);
        assert_eq!(errors.get("email").unwrap(), ["The email field is required."]);

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "John Doe");
        assert_eq!(stored.email, "john@example.com");
    }

    #[tokio::test]
    async fn test_update_user_keeps_own_email() {
        let (service, _) = service();
        let created = service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap();

        let request = UpdateUserRequest {
            email: "john@example.com".into(),
            ..UpdateUserRequest::default()
        };
        assert!(service.update_user(created.id, request).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_user_email_taken_by_another() {
        let (service, _) = service();
        service
            .create_user(create_request("first@example.com"))
            .await
            .unwrap();
        let second = service
            .create_user(create_request("second@example.com"))
            .await
            .unwrap();

        let request = UpdateUserRequest {
            email: "first@example.com".into(),
            ..UpdateUserRequest::default()
        };
        let errors = field_errors(service.update_user(second.id, request).await.unwrap_err());
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email has already been taken."]
        );
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() {
        let (service, repo) = service();
        let created = service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap();

        let request = UpdateUserRequest {
            password: "newpassword".into(),
            password_confirmation: "newpassword".into(),
            ..UpdateUserRequest::default()
        };
        service.update_user(created.id, request).await.unwrap();

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert!(hasher().verify("newpassword", &stored.password_hash).unwrap());
        assert!(!hasher().verify("password123", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let (service, _) = service();
        let request = UpdateUserRequest {
            name: "".into(),
            ..UpdateUserRequest::default()
        };

        let err = service.update_user(UserId::new(), request).await.unwrap_err();
        assert!(matches!(err, RosterError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (service, _) = service();
        let created = service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap();

        service.delete_user(created.id).await.unwrap();
        assert!(matches!(
            service.get_user(created.id).await.unwrap_err(),
            RosterError::NotFound { .. }
        ));
        assert!(matches!(
            service.delete_user(created.id).await.unwrap_err(),
            RosterError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut repo = MockRepo::new();
        repo.expect_find_all()
            .returning(|| Err(RosterError::Database("connection refused".to_string())));
        let service = UserServiceImpl::new(Arc::new(repo), hasher());

        let err = service.list_users().await.unwrap_err();
        assert!(matches!(err, RosterError::Database(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_store_unique_violation_becomes_email_error() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert().returning(|_| {
            Err(RosterError::conflict(
                "Duplicate entry 'john@example.com' for key 'users_email_unique'",
            ))
        });
        let service = UserServiceImpl::new(Arc::new(repo), hasher());

        let err = service
            .create_user(create_request("john@example.com"))
            .await
            .unwrap_err();
        let errors = field_errors(err);
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email has already been taken."]
        );
    }
}
