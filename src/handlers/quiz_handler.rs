//! Open quiz routes: best-score mode and the public quiz API.

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{BestScoreSubmissionRequest, LeaderboardQuery},
};

#[get("/quiz")]
pub async fn get_quiz(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.quiz_for_taking(None).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[get("/quiz/{id}")]
pub async fn get_quiz_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.quiz_for_taking(Some(id.as_str())).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/quiz")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    request: web::Json<BestScoreSubmissionRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .submit_best_score(None, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/quiz/{id}")]
pub async fn submit_quiz_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<BestScoreSubmissionRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .submit_best_score(Some(id.as_str()), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/quiz/{id}")]
pub async fn api_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.quiz_for_taking(Some(id.as_str())).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "title": quiz.title,
        "time_limit": quiz.time_limit,
        "questions": quiz.questions,
    })))
}

#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;

    let entries = state.leaderboard_service.best_scores(query.limit).await?;
    Ok(HttpResponse::Ok().json(entries))
}
