//! In-memory store implementing every repository trait.
//!
//! Backs `STORAGE_BACKEND=memory` for local runs and gives tests an isolated
//! store without a database. Records are kept in insertion order, which
//! stands in for `created_at` ordering.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Module, Question, Quiz, QuizResult, Role, User},
    repositories::{ModuleRepository, QuizRepository, QuizResultRepository, UserRepository},
    services::scoring::improved_best_score,
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                user.username
            )));
        }
        if users.iter().any(|u| u.id == user.id) {
            return Err(AppError::AlreadyExists(format!(
                "User with id '{}' already exists",
                user.id
            )));
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut items: Vec<User> = users
            .iter()
            .filter(|u| u.role == role && u.is_registered())
            .cloned()
            .collect();
        items.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(items)
    }

    async fn set_best_score_if_higher(&self, username: &str, score: i32) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.username == username) else {
            return Ok(false);
        };

        match improved_best_score(user.best_score, score) {
            Some(best) => {
                user.best_score = Some(best);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn top_best_scores(&self, limit: i64) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut items: Vec<User> = users
            .iter()
            .filter(|u| u.best_score.is_some())
            .cloned()
            .collect();
        items.sort_by(|a, b| b.best_score.cmp(&a.best_score));
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryModuleRepository {
    modules: Arc<RwLock<Vec<Module>>>,
}

impl InMemoryModuleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn module_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Module with id '{}' not found", id))
}

#[async_trait]
impl ModuleRepository for InMemoryModuleRepository {
    async fn create(&self, module: Module) -> AppResult<Module> {
        let mut modules = self.modules.write().await;
        if modules.iter().any(|m| m.id == module.id) {
            return Err(AppError::AlreadyExists(format!(
                "Module with id '{}' already exists",
                module.id
            )));
        }
        modules.push(module.clone());
        Ok(module)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Module>> {
        let modules = self.modules.read().await;
        Ok(modules.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<Module>> {
        let modules = self.modules.read().await;
        Ok(modules
            .iter()
            .filter(|m| m.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<Module>> {
        let modules = self.modules.read().await;
        Ok(modules
            .iter()
            .filter(|m| m.has_student(student_id))
            .cloned()
            .collect())
    }

    async fn update_details(&self, id: &str, title: &str, terms: &str) -> AppResult<Module> {
        let mut modules = self.modules.write().await;
        let module = modules
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| module_not_found(id))?;

        module.title = title.to_string();
        module.terms = terms.to_string();
        module.modified_at = Some(Utc::now());
        Ok(module.clone())
    }

    async fn add_students(&self, id: &str, student_ids: &[String]) -> AppResult<Module> {
        let mut modules = self.modules.write().await;
        let module = modules
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| module_not_found(id))?;

        for student_id in student_ids {
            if !module.has_student(student_id) {
                module.student_ids.push(student_id.clone());
            }
        }
        Ok(module.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut modules = self.modules.write().await;
        let before = modules.len();
        modules.retain(|m| m.id != id);

        if modules.len() == before {
            return Err(module_not_found(id));
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<Vec<Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn quiz_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Quiz with id '{}' not found", id))
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.iter().any(|q| q.id == quiz.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }
        quizzes.push(quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn find_first(&self) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.first().cloned())
    }

    async fn find_by_module(&self, module_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes
            .iter()
            .filter(|q| q.module_id == module_id)
            .cloned()
            .collect())
    }

    async fn add_question(&self, quiz_id: &str, question: Question) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        let quiz = quizzes
            .iter_mut()
            .find(|q| q.id == quiz_id)
            .ok_or_else(|| quiz_not_found(quiz_id))?;

        quiz.questions.push(question);
        quiz.modified_at = Some(Utc::now());
        Ok(quiz.clone())
    }

    async fn set_time_limit(&self, quiz_id: &str, time_limit: i32) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        let quiz = quizzes
            .iter_mut()
            .find(|q| q.id == quiz_id)
            .ok_or_else(|| quiz_not_found(quiz_id))?;

        quiz.time_limit = time_limit;
        quiz.modified_at = Some(Utc::now());
        Ok(quiz.clone())
    }

    async fn delete_by_module(&self, module_id: &str) -> AppResult<u64> {
        let mut quizzes = self.quizzes.write().await;
        let before = quizzes.len();
        quizzes.retain(|q| q.module_id != module_id);
        Ok((before - quizzes.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizResultRepository {
    results: Arc<RwLock<Vec<QuizResult>>>,
}

impl InMemoryQuizResultRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryQuizResultRepository {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult> {
        let mut results = self.results.write().await;
        if results.iter().any(|r| r.id == result.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz result with id '{}' already exists",
                result.id
            )));
        }
        results.push(result.clone());
        Ok(result)
    }

    async fn find_by_quizzes(&self, quiz_ids: &[String]) -> AppResult<Vec<QuizResult>> {
        let results = self.results.read().await;
        Ok(results
            .iter()
            .filter(|r| quiz_ids.contains(&r.quiz_id))
            .cloned()
            .collect())
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<QuizResult>> {
        let results = self.results.read().await;
        let mut items: Vec<QuizResult> = results
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(items)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}
