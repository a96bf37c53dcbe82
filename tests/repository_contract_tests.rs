use classquiz_server::{
    errors::AppError,
    models::domain::{Module, Question, Quiz, QuizResult, Role, User},
    repositories::Repositories,
};

use chrono::{Duration, Utc};

fn user(username: &str, role: Role) -> User {
    User::new(username, "hash".to_string(), role)
}

fn result(student_id: &str, quiz_id: &str, score: i32, minutes_ago: i64) -> QuizResult {
    QuizResult {
        id: uuid::Uuid::new_v4().to_string(),
        student_id: student_id.to_string(),
        quiz_id: quiz_id.to_string(),
        score,
        total: 3,
        submitted_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

#[tokio::test]
async fn usernames_are_unique() {
    let repos = Repositories::in_memory();
    repos.users.create(user("ada", Role::Student)).await.unwrap();

    let duplicate = repos.users.create(user("ada", Role::Teacher)).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn best_score_is_conditional() {
    let repos = Repositories::in_memory();
    repos
        .users
        .create(User::anonymous_player("grace", 4))
        .await
        .unwrap();

    assert!(!repos.users.set_best_score_if_higher("grace", 3).await.unwrap());
    assert!(!repos.users.set_best_score_if_higher("grace", 4).await.unwrap());
    assert!(repos.users.set_best_score_if_higher("grace", 6).await.unwrap());
    assert!(!repos.users.set_best_score_if_higher("nobody", 9).await.unwrap());

    let stored = repos.users.find_by_username("grace").await.unwrap().unwrap();
    assert_eq!(stored.best_score, Some(6));
}

#[tokio::test]
async fn registered_students_listed_by_username() {
    let repos = Repositories::in_memory();
    repos.users.create(user("zed", Role::Student)).await.unwrap();
    repos.users.create(user("amy", Role::Student)).await.unwrap();
    repos.users.create(user("tom", Role::Teacher)).await.unwrap();
    repos
        .users
        .create(User::anonymous_player("bea", 2))
        .await
        .unwrap();

    let students = repos.users.find_by_role(Role::Student).await.unwrap();
    let names: Vec<&str> = students.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["amy", "zed"]);
}

#[tokio::test]
async fn add_students_is_a_set_add() {
    let repos = Repositories::in_memory();
    let module = repos
        .modules
        .create(Module::new("History", "Quiet please", "t-1"))
        .await
        .unwrap();

    repos
        .modules
        .add_students(&module.id, &["s-1".to_string(), "s-2".to_string()])
        .await
        .unwrap();
    let module = repos
        .modules
        .add_students(&module.id, &["s-2".to_string(), "s-3".to_string()])
        .await
        .unwrap();

    assert_eq!(module.student_ids, vec!["s-1", "s-2", "s-3"]);
    assert_eq!(repos.modules.find_by_student("s-3").await.unwrap().len(), 1);

    let missing = repos.modules.add_students("nope", &["s-1".to_string()]).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn module_delete_reports_missing() {
    let repos = Repositories::in_memory();
    let module = repos
        .modules
        .create(Module::new("History", "Quiet please", "t-1"))
        .await
        .unwrap();

    repos.modules.delete(&module.id).await.unwrap();
    let again = repos.modules.delete(&module.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn quiz_questions_and_timer() {
    let repos = Repositories::in_memory();
    let quiz = repos
        .quizzes
        .create(Quiz::new("m-1", "Dates", 300))
        .await
        .unwrap();

    let question = Question::new(
        "Battle of Hastings?",
        vec!["1066".to_string(), "1215".to_string()],
        "1066",
    )
    .unwrap();
    let quiz = repos.quizzes.add_question(&quiz.id, question).await.unwrap();
    assert_eq!(quiz.question_count(), 1);

    let quiz = repos.quizzes.set_time_limit(&quiz.id, 90).await.unwrap();
    assert_eq!(quiz.time_limit, 90);

    let missing = repos.quizzes.set_time_limit("nope", 90).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn quizzes_cascade_by_module() {
    let repos = Repositories::in_memory();
    repos.quizzes.create(Quiz::new("m-1", "One", 60)).await.unwrap();
    repos.quizzes.create(Quiz::new("m-1", "Two", 60)).await.unwrap();
    let kept = repos.quizzes.create(Quiz::new("m-2", "Three", 60)).await.unwrap();

    let first = repos.quizzes.find_first().await.unwrap().unwrap();
    assert_eq!(first.title, "One");

    assert_eq!(repos.quizzes.delete_by_module("m-1").await.unwrap(), 2);
    assert!(repos.quizzes.find_by_module("m-1").await.unwrap().is_empty());
    assert!(repos.quizzes.find_by_id(&kept.id).await.unwrap().is_some());
}

#[tokio::test]
async fn results_are_append_only_rows() {
    let repos = Repositories::in_memory();
    repos.results.create(result("s-1", "q-1", 1, 10)).await.unwrap();
    repos.results.create(result("s-1", "q-1", 3, 5)).await.unwrap();
    repos.results.create(result("s-2", "q-2", 2, 1)).await.unwrap();

    let for_quiz = repos
        .results
        .find_by_quizzes(&["q-1".to_string()])
        .await
        .unwrap();
    assert_eq!(for_quiz.len(), 2);

    let for_student = repos.results.find_by_student("s-1").await.unwrap();
    let scores: Vec<i32> = for_student.iter().map(|r| r.score).collect();
    // newest first
    assert_eq!(scores, vec![3, 1]);
}
