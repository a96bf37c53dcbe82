use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::{
        domain::Role,
        dto::{
            request::{LoginRequest, RegisterRequest},
            response::{ApiResponse, AuthResponse, UserDto},
        },
    },
};

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(
        UserDto::from(user),
        "Registration successful",
    )))
}

async fn login(
    state: &AppState,
    request: LoginRequest,
    role: Role,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.authenticate(request, role).await?;
    let token = state.jwt_service.create_token(&user)?;

    log::info!("{} '{}' logged in", user.role, user.username);
    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[post("/student_login")]
pub async fn student_login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    login(&state, request.into_inner(), Role::Student).await
}

#[post("/teacher_login")]
pub async fn teacher_login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    login(&state, request.into_inner(), Role::Teacher).await
}

/// Sessions are stateless tokens; the client discards its copy.
#[get("/logout")]
pub async fn logout(auth: AuthenticatedUser) -> HttpResponse {
    log::info!("'{}' logged out", auth.0.username);
    HttpResponse::Ok().json(serde_json::json!({
        "message": "You have been logged out"
    }))
}
