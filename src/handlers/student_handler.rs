use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{AcceptTermsRequest, SubmitAnswersRequest},
};

#[get("/student_dashboard")]
pub async fn student_dashboard(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let modules = state.module_service.student_dashboard(&auth.0).await?;
    Ok(HttpResponse::Ok().json(modules))
}

#[get("/student/module/{id}")]
pub async fn view_module(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = state.module_service.student_module(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/student/module/{id}")]
pub async fn accept_terms(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
    request: web::Json<AcceptTermsRequest>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .module_service
        .accept_terms(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[get("/student/quiz/{id}")]
pub async fn take_quiz(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .student_quiz_for_taking(&auth.0, &id)
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/student/quiz/{id}")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
    request: web::Json<SubmitAnswersRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .submit_student_quiz(&auth.0, &id, &request.answers)
        .await?;
    Ok(HttpResponse::Created().json(response))
}
