pub mod memory;
pub mod module_repository;
pub mod quiz_repository;
pub mod quiz_result_repository;
pub mod user_repository;

use std::sync::Arc;

pub use memory::{
    InMemoryModuleRepository, InMemoryQuizRepository, InMemoryQuizResultRepository,
    InMemoryUserRepository,
};
pub use module_repository::{ModuleRepository, MongoModuleRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use quiz_result_repository::{MongoQuizResultRepository, QuizResultRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

use crate::{db::Database, errors::AppResult};

/// The store handed to services. Built once at startup and shared.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub modules: Arc<dyn ModuleRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub results: Arc<dyn QuizResultRepository>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Self {
            users: Arc::new(MongoUserRepository::new(db)),
            modules: Arc::new(MongoModuleRepository::new(db)),
            quizzes: Arc::new(MongoQuizRepository::new(db)),
            results: Arc::new(MongoQuizResultRepository::new(db)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            modules: Arc::new(InMemoryModuleRepository::new()),
            quizzes: Arc::new(InMemoryQuizRepository::new()),
            results: Arc::new(InMemoryQuizResultRepository::new()),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.users.ensure_indexes().await?;
        self.modules.ensure_indexes().await?;
        self.quizzes.ensure_indexes().await?;
        self.results.ensure_indexes().await?;
        Ok(())
    }
}
