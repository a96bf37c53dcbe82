pub mod auth_handler;
pub mod graphql_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod student_handler;
pub mod teacher_handler;

use actix_web::web;

use crate::errors::AppError;

/// Registers every route. Malformed JSON bodies and query strings are
/// reported as validation errors.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .service(health_handler::index)
    .service(health_handler::health_check)
    .service(health_handler::health_check_live)
    .service(health_handler::health_check_ready)
    .service(auth_handler::register)
    .service(auth_handler::student_login)
    .service(auth_handler::teacher_login)
    .service(auth_handler::logout)
    .service(quiz_handler::get_quiz)
    .service(quiz_handler::get_quiz_by_id)
    .service(quiz_handler::submit_quiz)
    .service(quiz_handler::submit_quiz_by_id)
    .service(quiz_handler::api_quiz)
    .service(quiz_handler::leaderboard)
    .service(teacher_handler::teacher_dashboard)
    .service(teacher_handler::add_module)
    .service(teacher_handler::manage_module)
    .service(teacher_handler::update_module)
    .service(teacher_handler::delete_module)
    .service(teacher_handler::add_quiz)
    .service(teacher_handler::assign_students)
    .service(teacher_handler::add_question)
    .service(teacher_handler::set_timer)
    .service(teacher_handler::module_leaderboard)
    .service(student_handler::student_dashboard)
    .service(student_handler::view_module)
    .service(student_handler::accept_terms)
    .service(student_handler::take_quiz)
    .service(student_handler::submit_quiz)
    .service(graphql_handler::graphql)
    .service(graphql_handler::graphiql);
}
