use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{
            AddQuestionRequest, AssignStudentsRequest, CreateQuizRequest, ModuleDetailsRequest,
            SetTimerRequest,
        },
        response::ApiResponse,
    },
};

#[get("/teacher_dashboard")]
pub async fn teacher_dashboard(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let dashboard = state.module_service.teacher_dashboard(&auth.0).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

#[post("/teacher/add-module")]
pub async fn add_module(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    request: web::Json<ModuleDetailsRequest>,
) -> Result<HttpResponse, AppError> {
    let module = state
        .module_service
        .create_module(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(module, "Module created")))
}

#[get("/teacher/module/{id}")]
pub async fn manage_module(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let detail = state.module_service.module_detail(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[post("/teacher/module/{id}")]
pub async fn update_module(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
    request: web::Json<ModuleDetailsRequest>,
) -> Result<HttpResponse, AppError> {
    let module = state
        .module_service
        .update_module(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(module, "Module updated")))
}

#[delete("/teacher/module/{id}")]
pub async fn delete_module(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.module_service.delete_module(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/teacher/module/{id}/add-quiz")]
pub async fn add_quiz(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .module_service
        .add_quiz(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(quiz, "Quiz created")))
}

#[post("/teacher/module/{id}/assign-students")]
pub async fn assign_students(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
    request: web::Json<AssignStudentsRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .module_service
        .assign_students(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/teacher/module/{id}/add-question")]
pub async fn add_question(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
    request: web::Json<AddQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .module_service
        .add_question(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(quiz, "Question added")))
}

#[post("/teacher/module/{id}/set-timer")]
pub async fn set_timer(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
    request: web::Json<SetTimerRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .module_service
        .set_timer(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(quiz, "Timer updated")))
}

#[get("/teacher/module/{id}/leaderboard")]
pub async fn module_leaderboard(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let board = state
        .leaderboard_service
        .module_leaderboard(&auth.0, &id)
        .await?;
    Ok(HttpResponse::Ok().json(board))
}
