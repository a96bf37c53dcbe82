/// Full application (routes, session middleware, GraphQL schema) over `state`.
macro_rules! init_test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .app_data(actix_web::web::Data::from($state.jwt_service.clone()))
                .app_data(actix_web::web::Data::new(
                    $crate::graphql::create_schema($state.clone()),
                ))
                .wrap($crate::auth::AuthMiddleware)
                .configure($crate::handlers::configure),
        )
        .await
    };
}

pub(crate) use init_test_app;

pub mod fixtures {
    use crate::models::domain::{Module, Question, Quiz, User};

    pub fn teacher() -> User {
        User::test_teacher("ms_frizzle")
    }

    pub fn student(username: &str) -> User {
        User::test_student(username)
    }

    pub fn module_for(teacher: &User, student_ids: &[&str]) -> Module {
        let mut module = Module::new("Science", "Take chances, make mistakes", &teacher.id);
        module.student_ids = student_ids.iter().map(|s| s.to_string()).collect();
        module
    }

    /// Two questions answered "A" then "B".
    pub fn quiz_in(module: &Module) -> Quiz {
        let choices = || vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let mut quiz = Quiz::new(&module.id, "Warm-up", 300);
        quiz.questions = vec![
            Question::new("First?", choices(), "A").unwrap(),
            Question::new("Second?", choices(), "B").unwrap(),
        ];
        quiz
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    use crate::{
        app_state::AppState, config::Config, models::domain::User, repositories::Repositories,
    };

    pub fn test_state() -> AppState {
        test_state_with_repos().0
    }

    /// State plus a handle on the same in-memory store, for seeding.
    pub fn test_state_with_repos() -> (AppState, Repositories) {
        let repos = Repositories::in_memory();
        let state = AppState::from_repositories(Config::test_config(), repos.clone(), None);
        (state, repos)
    }

    /// Stores `user` and returns a bearer token for it.
    pub async fn signed_in(state: &AppState, repos: &Repositories, user: User) -> (User, String) {
        let user = repos.users.create(user).await.unwrap();
        let token = state.jwt_service.create_token(&user).unwrap();
        (user, token)
    }

    pub fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_quiz_belongs_to_module() {
        let teacher = teacher();
        let module = module_for(&teacher, &["s-1"]);
        let quiz = quiz_in(&module);

        assert_eq!(quiz.module_id, module.id);
        assert_eq!(quiz.question_count(), 2);
        assert!(module.has_student("s-1"));
    }
}
