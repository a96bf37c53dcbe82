use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    models::dto::{
        request::{answers_to_map, AnswerInput},
        response::SubmissionResponse,
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Grades a student's attempt at a quiz of one of their modules and
    /// records the result.
    async fn submit_quiz(
        &self,
        ctx: &Context<'_>,
        quiz_id: ID,
        answers: Vec<AnswerInput>,
    ) -> Result<SubmissionResponse> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .quiz_service
            .submit_student_quiz(&claims, &quiz_id, &answers_to_map(answers))
            .await
            .map_err(|e| e.extend())
    }
}
