//! Quiz taking and submission for both scoring modes.

use std::collections::HashMap;
use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{require_module_member, require_student, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, User},
        dto::{
            request::BestScoreSubmissionRequest,
            response::{BestScoreSubmissionResponse, QuizForTaking, SubmissionResponse},
        },
    },
    repositories::{ModuleRepository, QuizRepository, QuizResultRepository, UserRepository},
    services::grading_service::GradingService,
};

pub struct QuizService {
    users: Arc<dyn UserRepository>,
    modules: Arc<dyn ModuleRepository>,
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn QuizResultRepository>,
}

impl QuizService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        modules: Arc<dyn ModuleRepository>,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn QuizResultRepository>,
    ) -> Self {
        Self {
            users,
            modules,
            quizzes,
            results,
        }
    }

    async fn find_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    /// The quiz used in best-score mode: the one named, or the first quiz.
    async fn global_quiz(&self, quiz_id: Option<&str>) -> AppResult<Quiz> {
        match quiz_id {
            Some(id) => self.find_quiz(id).await,
            None => self
                .quizzes
                .find_first()
                .await?
                .ok_or_else(|| AppError::NotFound("No quiz is available yet".to_string())),
        }
    }

    /// A quiz anyone may view, answers omitted.
    pub async fn quiz_for_taking(&self, quiz_id: Option<&str>) -> AppResult<QuizForTaking> {
        let quiz = self.global_quiz(quiz_id).await?;
        Ok(QuizForTaking::from_quiz(&quiz))
    }

    /// Grades an open submission and raises the username's best score when
    /// it improves. Unknown usernames get a fresh player record.
    pub async fn submit_best_score(
        &self,
        quiz_id: Option<&str>,
        request: BestScoreSubmissionRequest,
    ) -> AppResult<BestScoreSubmissionResponse> {
        request.validate()?;

        let username = request.username.trim();
        if username.is_empty() {
            return Err(AppError::ValidationError("Username is required".to_string()));
        }

        let quiz = self.global_quiz(quiz_id).await?;
        let grade = GradingService::grade(&quiz.questions, &request.answers);
        let score = grade.score;

        let (best_score, created, improved) = match self.users.find_by_username(username).await? {
            Some(user) => self.raise_best_score(&user, score).await?,
            None => match self
                .users
                .create(User::anonymous_player(username, score))
                .await
            {
                Ok(_) => (score, true, true),
                // lost a race with a concurrent first submission
                Err(AppError::AlreadyExists(_)) => {
                    let user = self.users.find_by_username(username).await?.ok_or_else(|| {
                        AppError::InternalError(format!("User '{}' vanished", username))
                    })?;
                    self.raise_best_score(&user, score).await?
                }
                Err(err) => return Err(err),
            },
        };

        if improved {
            log::info!("Best score for '{}' is now {}", username, best_score);
        }

        Ok(BestScoreSubmissionResponse {
            username: username.to_string(),
            quiz_id: quiz.id,
            grade: grade.into(),
            best_score,
            created,
            improved,
        })
    }

    async fn raise_best_score(&self, user: &User, score: i32) -> AppResult<(i32, bool, bool)> {
        let improved = self
            .users
            .set_best_score_if_higher(&user.username, score)
            .await?;

        if improved {
            return Ok((score, false, true));
        }

        // a concurrent submission may have raised it since `user` was read
        let stored = self
            .users
            .find_by_username(&user.username)
            .await?
            .and_then(|current| current.best_score)
            .or(user.best_score);
        Ok((stored.map_or(score, |best| best.max(score)), false, false))
    }

    /// A quiz of a module the calling student is assigned to.
    pub async fn student_quiz(&self, claims: &Claims, quiz_id: &str) -> AppResult<Quiz> {
        require_student(claims)?;

        let quiz = self.find_quiz(quiz_id).await?;
        let module = self
            .modules
            .find_by_id(&quiz.module_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Module with id '{}' not found", quiz.module_id)))?;
        require_module_member(claims, &module)?;

        Ok(quiz)
    }

    pub async fn student_quiz_for_taking(
        &self,
        claims: &Claims,
        quiz_id: &str,
    ) -> AppResult<QuizForTaking> {
        let quiz = self.student_quiz(claims, quiz_id).await?;
        Ok(QuizForTaking::from_quiz(&quiz))
    }

    /// Grades a student's attempt and appends the result.
    pub async fn submit_student_quiz(
        &self,
        claims: &Claims,
        quiz_id: &str,
        answers: &HashMap<String, String>,
    ) -> AppResult<SubmissionResponse> {
        let quiz = self.student_quiz(claims, quiz_id).await?;

        let grade = GradingService::grade(&quiz.questions, answers);
        let result = self
            .results
            .create(GradingService::create_result(&claims.sub, &quiz.id, &grade))
            .await?;

        log::info!(
            "Student '{}' scored {}/{} on quiz {}",
            claims.username,
            grade.score,
            grade.total,
            quiz.id
        );

        Ok(SubmissionResponse {
            quiz_id: quiz.id,
            result_id: result.id,
            grade,
        })
    }
}
