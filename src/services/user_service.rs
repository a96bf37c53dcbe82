use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use validator::Validate;

use crate::{
    auth::{hash_password, verify_password},
    errors::{AppError, AppResult},
    models::{
        domain::{Role, User},
        dto::request::{LoginRequest, RegisterRequest},
    },
    repositories::UserRepository,
};

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]{3,50}$").expect("username pattern is a valid regex")
});

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        let username = request.username.trim();
        if !USERNAME_REGEX.is_match(username) {
            return Err(AppError::ValidationError(
                "Username may only contain letters, digits and underscores".to_string(),
            ));
        }

        if self.repository.find_by_username(username).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                username
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repository
            .create(User::new(username, password_hash, request.role))
            .await?;

        log::info!("Registered {} '{}'", user.role, user.username);
        Ok(user)
    }

    /// Verifies credentials for a login scoped to `role`. Every failure looks
    /// the same to the caller.
    pub async fn authenticate(&self, request: LoginRequest, role: Role) -> AppResult<User> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

        let user = self
            .repository
            .find_by_username(request.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if user.role != role {
            log::debug!("{} login attempted with a {} account", role, user.role);
            return Err(invalid());
        }

        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        if !verify_password(&request.password, hash) {
            return Err(invalid());
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
    }

    pub async fn list_students(&self) -> AppResult<Vec<User>> {
        self.repository.find_by_role(Role::Student).await
    }

    /// Creates the configured teacher account unless the name is taken.
    /// Returns whether an account was created.
    pub async fn seed_teacher(&self, username: &str, password: &SecretString) -> AppResult<bool> {
        if self.repository.find_by_username(username).await?.is_some() {
            log::debug!("Seed teacher '{}' already exists", username);
            return Ok(false);
        }

        let password_hash = hash_password(password.expose_secret())?;
        self.repository
            .create(User::new(username, password_hash, Role::Teacher))
            .await?;

        log::info!("Seeded teacher account '{}'", username);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{user_repository::MockUserRepository, InMemoryUserRepository};

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn register_request(username: &str, role: Role) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "correct-horse".to_string(),
            role,
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let service = service();
        let user = service
            .register(register_request("ms_frizzle", Role::Teacher))
            .await
            .unwrap();

        assert_eq!(user.role, Role::Teacher);
        assert_ne!(user.password_hash.as_deref(), Some("correct-horse"));

        let authed = service
            .authenticate(login("ms_frizzle", "correct-horse"), Role::Teacher)
            .await
            .unwrap();
        assert_eq!(authed.id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_role_and_password() {
        let service = service();
        service
            .register(register_request("arnold", Role::Student))
            .await
            .unwrap();

        let wrong_role = service
            .authenticate(login("arnold", "correct-horse"), Role::Teacher)
            .await;
        assert!(matches!(wrong_role, Err(AppError::Unauthorized(_))));

        let wrong_password = service
            .authenticate(login("arnold", "incorrect"), Role::Student)
            .await;
        assert!(matches!(wrong_password, Err(AppError::Unauthorized(_))));

        let unknown = service
            .authenticate(login("nobody", "correct-horse"), Role::Student)
            .await;
        assert!(matches!(unknown, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = service();
        service
            .register(register_request("wanda", Role::Student))
            .await
            .unwrap();

        let result = service.register(register_request("wanda", Role::Teacher)).await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_username() {
        let result = service()
            .register(register_request("not allowed!", Role::Student))
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_anonymous_player_cannot_log_in() {
        let repository = Arc::new(InMemoryUserRepository::new());
        repository
            .create(User::anonymous_player("guest_1", 3))
            .await
            .unwrap();
        let service = UserService::new(repository);

        let result = service
            .authenticate(login("guest_1", "anything"), Role::Student)
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_seed_teacher_is_idempotent() {
        let service = service();
        let password = SecretString::from("seed-password".to_string());

        assert!(service.seed_teacher("head_teacher", &password).await.unwrap());
        assert!(!service.seed_teacher("head_teacher", &password).await.unwrap());

        let user = service
            .authenticate(login("head_teacher", "seed-password"), Role::Teacher)
            .await
            .unwrap();
        assert!(user.is_teacher());
    }

    #[tokio::test]
    async fn test_register_existing_username_never_writes() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(|name| Ok(Some(User::test_student(name))));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));
        let result = service.register(register_request("taken", Role::Student)).await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }
}
