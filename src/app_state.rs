use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::{Config, StorageBackend},
    db::Database,
    errors::AppResult,
    repositories::Repositories,
    services::{LeaderboardService, ModuleService, QuizService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub module_service: Arc<ModuleService>,
    pub quiz_service: Arc<QuizService>,
    pub leaderboard_service: Arc<LeaderboardService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
    /// Present only on the Mongo backend; used by the readiness probe.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        match config.storage_backend {
            StorageBackend::Mongo => {
                let db = Database::connect(&config).await?;
                let repositories = Repositories::mongo(&db);
                repositories.ensure_indexes().await?;
                Ok(Self::from_repositories(config, repositories, Some(db)))
            }
            StorageBackend::Memory => {
                log::warn!("Using the in-memory store; data is lost on restart");
                Ok(Self::from_repositories(
                    config,
                    Repositories::in_memory(),
                    None,
                ))
            }
        }
    }

    pub fn from_repositories(
        config: Config,
        repositories: Repositories,
        db: Option<Database>,
    ) -> Self {
        let Repositories {
            users,
            modules,
            quizzes,
            results,
        } = repositories;

        let user_service = Arc::new(UserService::new(users.clone()));
        let module_service = Arc::new(ModuleService::new(
            users.clone(),
            modules.clone(),
            quizzes.clone(),
            results.clone(),
            config.default_time_limit_secs,
        ));
        let quiz_service = Arc::new(QuizService::new(
            users.clone(),
            modules.clone(),
            quizzes.clone(),
            results.clone(),
        ));
        let leaderboard_service = Arc::new(LeaderboardService::new(
            users,
            modules,
            quizzes,
            results,
            config.result_policy,
            config.leaderboard_limit,
        ));
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            user_service,
            module_service,
            quiz_service,
            leaderboard_service,
            jwt_service,
            config: Arc::new(config),
            db,
        }
    }

    /// Creates the configured seed teacher, if any.
    pub async fn seed(&self) -> AppResult<()> {
        if let (Some(username), Some(password)) = (
            self.config.seed_teacher_username.as_deref(),
            self.config.seed_teacher_password.as_ref(),
        ) {
            self.user_service.seed_teacher(username, password).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{domain::Role, dto::request::LoginRequest};
    use secrecy::SecretString;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_memory_backend_needs_no_database() {
        let state = AppState::new(Config::test_config()).await.unwrap();
        assert!(state.db.is_none());
    }

    #[tokio::test]
    async fn test_seed_creates_teacher() {
        let mut config = Config::test_config();
        config.seed_teacher_username = Some("principal".to_string());
        config.seed_teacher_password = Some(SecretString::from("seed-pass-123".to_string()));

        let state = AppState::from_repositories(config, Repositories::in_memory(), None);
        state.seed().await.unwrap();
        state.seed().await.unwrap();

        let user = state
            .user_service
            .authenticate(
                LoginRequest {
                    username: "principal".to_string(),
                    password: "seed-pass-123".to_string(),
                },
                Role::Teacher,
            )
            .await
            .unwrap();
        assert_eq!(user.username, "principal");
    }
}
