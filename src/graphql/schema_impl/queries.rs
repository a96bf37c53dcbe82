use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    models::dto::response::{BestScoreEntry, ModuleLeaderboard, ModuleSummary, QuizForTaking},
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// A quiz with its questions, answers omitted. Without an id, the first quiz.
    async fn quiz_for_taking(&self, ctx: &Context<'_>, id: Option<ID>) -> Result<QuizForTaking> {
        let state = ctx.data::<AppState>()?;

        state
            .quiz_service
            .quiz_for_taking(id.as_ref().map(|id| id.as_str()))
            .await
            .map_err(|e| e.extend())
    }

    async fn best_score_leaderboard(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
    ) -> Result<Vec<BestScoreEntry>> {
        let state = ctx.data::<AppState>()?;

        state
            .leaderboard_service
            .best_scores(limit)
            .await
            .map_err(|e| e.extend())
    }

    async fn module_leaderboard(
        &self,
        ctx: &Context<'_>,
        module_id: ID,
    ) -> Result<ModuleLeaderboard> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .leaderboard_service
            .module_leaderboard(&claims, &module_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Owned modules for a teacher, assigned modules for a student.
    async fn my_modules(&self, ctx: &Context<'_>) -> Result<Vec<ModuleSummary>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .module_service
            .my_modules(&claims)
            .await
            .map_err(|e| e.extend())
    }
}
