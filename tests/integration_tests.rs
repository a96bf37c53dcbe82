use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use classquiz_server::{
    app_state::AppState,
    auth::AuthMiddleware,
    config::{Config, StorageBackend},
    graphql::create_schema,
    handlers,
    middleware::RequestIdMiddleware,
    repositories::Repositories,
};

fn memory_state() -> AppState {
    let mut config = Config::from_env();
    config.storage_backend = StorageBackend::Memory;
    AppState::from_repositories(config, Repositories::in_memory(), None)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::from($state.jwt_service.clone()))
                .app_data(web::Data::new(create_schema($state.clone())))
                .wrap(AuthMiddleware)
                .wrap(RequestIdMiddleware)
                .configure(handlers::configure),
        )
        .await
    };
}

fn auth(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn classroom_flow_end_to_end() {
    let state = memory_state();
    let app = app!(state);

    for (username, role) in [("teach", "teacher"), ("amy", "student"), ("bob", "student")] {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": username, "password": "password123", "role": role}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let login = |path: &'static str, username: &'static str| {
        test::TestRequest::post()
            .uri(path)
            .set_json(json!({"username": username, "password": "password123"}))
            .to_request()
    };
    let body: Value = test::call_and_read_body_json(&app, login("/teacher_login", "teach")).await;
    let teacher = body["token"].as_str().unwrap().to_string();
    let body: Value = test::call_and_read_body_json(&app, login("/student_login", "amy")).await;
    let amy = body["token"].as_str().unwrap().to_string();
    let amy_id = body["user"]["id"].as_str().unwrap().to_string();
    let body: Value = test::call_and_read_body_json(&app, login("/student_login", "bob")).await;
    let bob = body["token"].as_str().unwrap().to_string();
    let bob_id = body["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/teacher/add-module")
        .insert_header(auth(&teacher))
        .set_json(json!({"title": "Chemistry", "terms": "No eating in the lab"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let module_id = body["data"]["id"].as_str().unwrap().to_string();

    for (text, correct) in [("H2O is?", "Water"), ("NaCl is?", "Salt")] {
        let req = test::TestRequest::post()
            .uri(&format!("/teacher/module/{}/add-question", module_id))
            .insert_header(auth(&teacher))
            .set_json(json!({
                "question_text": text,
                "choices": ["Water", "Salt", "Sugar"],
                "correct_answer": correct
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri(&format!("/teacher/module/{}/assign-students", module_id))
        .insert_header(auth(&teacher))
        .set_json(json!({"student_ids": [amy_id, bob_id]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["assigned"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri(&format!("/teacher/module/{}", module_id))
        .insert_header(auth(&teacher))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let quiz_id = body["quizzes"][0]["id"].as_str().unwrap().to_string();

    let submit = |token: &str, answers: Value| {
        test::TestRequest::post()
            .uri(&format!("/student/quiz/{}", quiz_id))
            .insert_header(auth(token))
            .set_json(json!({ "answers": answers }))
            .to_request()
    };
    let body: Value = test::call_and_read_body_json(
        &app,
        submit(&bob, json!({"question-0": "Water", "question-1": "Sugar"})),
    )
    .await;
    assert_eq!(body["grade"]["score"], 1);

    let body: Value = test::call_and_read_body_json(
        &app,
        submit(&amy, json!({"question-0": "Water", "question-1": "Salt"})),
    )
    .await;
    assert_eq!(body["grade"]["score"], 2);

    let req = test::TestRequest::get()
        .uri(&format!("/teacher/module/{}/leaderboard", module_id))
        .insert_header(auth(&teacher))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["entries"][0]["username"], "amy");
    assert_eq!(body["entries"][0]["rank"], 1);
    assert_eq!(body["entries"][1]["username"], "bob");
    assert_eq!(body["entries"][1]["total_score"], 1);

    // students may not read the teacher leaderboard
    let req = test::TestRequest::get()
        .uri(&format!("/teacher/module/{}/leaderboard", module_id))
        .insert_header(auth(&amy))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn invalid_token_is_rejected_and_request_id_echoed() {
    let state = memory_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/teacher_dashboard")
        .insert_header(auth("garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 401);
}

#[actix_web::test]
async fn malformed_json_is_a_validation_error() {
    let state = memory_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
