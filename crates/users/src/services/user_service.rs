//! User service for registration, credentials, and profile updates.

use courier_auth::{hash_password, verify_password};
use courier_database::{
    CreateUserRequest, NewUser, UpdateUserRequest, User, UserError, UserRepository, UserResult,
};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::mock_repositories::MockUserRepository;

/// Service for managing user operations
pub struct UserService<R> {
    user_repository: R,
}

impl UserService<UserRepository> {
    /// Create a new user service instance with the real database repository
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_repository: UserRepository::new(pool),
        }
    }
}

impl UserService<MockUserRepository> {
    /// Create a new user service instance for testing
    pub fn new_for_testing() -> Self {
        Self {
            user_repository: MockUserRepository::new(),
        }
    }
}

impl<R> UserService<R>
where
    R: UserRepo,
{
    /// Get a user by ID
    pub async fn get_user(&self, user_id: i64) -> UserResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    /// Register a new user
    pub async fn register(&self, request: CreateUserRequest) -> UserResult<User> {
        request.validate().map_err(UserError::InvalidUserData)?;

        if self
            .user_repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(UserError::UsernameTaken);
        }

        if self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailTaken);
        }

        let password_hash =
            hash_password(&request.password).map_err(|_| UserError::PasswordHashingFailed)?;

        let user = self
            .user_repository
            .create(&NewUser {
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "registered new user");

        Ok(user)
    }

    /// Check credentials and return the account they belong to.
    ///
    /// Unknown username, wrong password, and deactivated account all collapse
    /// into `InvalidCredentials` so a caller cannot probe account state.
    pub async fn authenticate(&self, username: &str, password: &str) -> UserResult<User> {
        let Some(user) = self.user_repository.find_by_username(username).await? else {
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            debug!(user_id = user.id, "password verification failed");
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_active {
            debug!(user_id = user.id, "login rejected for inactive account");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Update a user
    pub async fn update_user(&self, user_id: i64, request: UpdateUserRequest) -> UserResult<User> {
        request.validate().map_err(UserError::InvalidUserData)?;

        let existing = self.get_user(user_id).await?;

        if let Some(ref username) = request.username {
            if *username != existing.username
                && self
                    .user_repository
                    .find_by_username(username)
                    .await?
                    .is_some()
            {
                return Err(UserError::UsernameTaken);
            }
        }

        if let Some(ref email) = request.email {
            if *email != existing.email
                && self.user_repository.find_by_email(email).await?.is_some()
            {
                return Err(UserError::EmailTaken);
            }
        }

        let updated = self.user_repository.update(user_id, &request).await?;

        info!(user_id, "updated user");

        Ok(updated)
    }
}

/// Trait for user repositories to allow generic usage
pub trait UserRepo {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;
    async fn create(&self, new_user: &NewUser) -> UserResult<User>;
    async fn update(&self, user_id: i64, request: &UpdateUserRequest) -> UserResult<User>;
}

impl UserRepo for UserRepository {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        self.find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        self.find_by_username(username).await
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.find_by_email(email).await
    }

    async fn create(&self, new_user: &NewUser) -> UserResult<User> {
        self.create(new_user).await
    }

    async fn update(&self, user_id: i64, request: &UpdateUserRequest) -> UserResult<User> {
        self.update(user_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(username: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter42".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let service = UserService::new_for_testing();

        let user = service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();
        assert!(user.id > 0);
        assert!(user.is_active);

        let authenticated = service.authenticate("alice", "hunter42").await.unwrap();
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let service = UserService::new_for_testing();
        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = service.authenticate("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_username_is_invalid_credentials() {
        let service = UserService::new_for_testing();

        let err = service.authenticate("ghost", "hunter42").await.unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn inactive_account_cannot_log_in() {
        let service = UserService::new_for_testing();
        let user = service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        service
            .update_user(
                user.id,
                UpdateUserRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = service.authenticate("alice", "hunter42").await.unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let service = UserService::new_for_testing();
        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = service
            .register(register_request("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UsernameTaken));
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let service = UserService::new_for_testing();
        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = service
            .register(register_request("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailTaken));
    }

    #[tokio::test]
    async fn invalid_registration_data_rejected() {
        let service = UserService::new_for_testing();

        let err = service
            .register(CreateUserRequest {
                username: "al".to_string(),
                email: "alice@example.com".to_string(),
                password: "hunter42".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidUserData(_)));
    }

    #[tokio::test]
    async fn update_changes_email_and_rejects_collisions() {
        let service = UserService::new_for_testing();
        let alice = service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();
        service
            .register(register_request("bob", "bob@example.com"))
            .await
            .unwrap();

        let updated = service
            .update_user(
                alice.id,
                UpdateUserRequest {
                    email: Some("alice@new.example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "alice@new.example.com");

        let err = service
            .update_user(
                alice.id,
                UpdateUserRequest {
                    email: Some("bob@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailTaken));
    }

    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let service = UserService::new_for_testing();

        let err = service.get_user(404).await.unwrap_err();
        assert!(matches!(err, UserError::UserNotFound));
    }
}
