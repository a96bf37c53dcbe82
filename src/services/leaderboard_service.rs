use std::sync::Arc;

use crate::{
    auth::{require_module_owner, require_teacher, Claims},
    errors::{AppError, AppResult},
    models::dto::response::{BestScoreEntry, ModuleLeaderboard},
    repositories::{ModuleRepository, QuizRepository, QuizResultRepository, UserRepository},
    services::scoring::{aggregate_module_scores, rank_best_scores, ResultPolicy},
};

const MAX_LEADERBOARD_LIMIT: i64 = 100;

pub struct LeaderboardService {
    users: Arc<dyn UserRepository>,
    modules: Arc<dyn ModuleRepository>,
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn QuizResultRepository>,
    policy: ResultPolicy,
    default_limit: i64,
}

impl LeaderboardService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        modules: Arc<dyn ModuleRepository>,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn QuizResultRepository>,
        policy: ResultPolicy,
        default_limit: i64,
    ) -> Self {
        Self {
            users,
            modules,
            quizzes,
            results,
            policy,
            default_limit,
        }
    }

    /// Best-score leaderboard, highest first.
    pub async fn best_scores(&self, limit: Option<i64>) -> AppResult<Vec<BestScoreEntry>> {
        let limit = limit
            .unwrap_or(self.default_limit)
            .clamp(1, MAX_LEADERBOARD_LIMIT);

        let users = self.users.top_best_scores(limit).await?;
        Ok(rank_best_scores(users, limit as usize))
    }

    /// Sum-mode leaderboard of a module, visible to its owner only.
    pub async fn module_leaderboard(
        &self,
        claims: &Claims,
        module_id: &str,
    ) -> AppResult<ModuleLeaderboard> {
        require_teacher(claims)?;
        let module = self
            .modules
            .find_by_id(module_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Module with id '{}' not found", module_id)))?;
        require_module_owner(claims, &module)?;

        let quiz_ids: Vec<String> = self
            .quizzes
            .find_by_module(&module.id)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();
        let results = self.results.find_by_quizzes(&quiz_ids).await?;

        let found = self.users.find_by_ids(&module.student_ids).await?;
        let students: Vec<_> = module
            .student_ids
            .iter()
            .filter_map(|id| found.iter().find(|u| &u.id == id).cloned())
            .collect();

        Ok(ModuleLeaderboard {
            entries: aggregate_module_scores(&students, &quiz_ids, &results, self.policy),
            module_id: module.id,
            module_title: module.title,
            policy: self.policy,
        })
    }
}
