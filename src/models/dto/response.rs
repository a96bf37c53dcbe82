use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Module, Quiz, Role, User};
use crate::services::scoring::ResultPolicy;

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score: Option<i32>,
    #[graphql(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            username: user.username,
            role: user.role,
            best_score: user.best_score,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct QuestionOutcome {
    pub index: i32,
    pub question_id: String,
    pub submitted: Option<String>,
    pub correct_answer: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct GradeReport {
    pub score: i32,
    pub total: i32,
    pub breakdown: Vec<QuestionOutcome>,
}

/// Per-question outcome of an open submission: no answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenQuestionOutcome {
    pub index: i32,
    pub question_id: String,
    pub submitted: Option<String>,
    pub correct: bool,
}

/// Grade returned to unauthenticated players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGradeReport {
    pub score: i32,
    pub total: i32,
    pub breakdown: Vec<OpenQuestionOutcome>,
}

impl From<GradeReport> for OpenGradeReport {
    fn from(report: GradeReport) -> Self {
        OpenGradeReport {
            score: report.score,
            total: report.total,
            breakdown: report
                .breakdown
                .into_iter()
                .map(|outcome| OpenQuestionOutcome {
                    index: outcome.index,
                    question_id: outcome.question_id,
                    submitted: outcome.submitted,
                    correct: outcome.correct,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionForTaking {
    pub id: String,
    pub index: i32,
    /// Form key the answer must be submitted under.
    pub key: String,
    pub text: String,
    pub choices: Vec<String>,
}

/// A quiz as shown to whoever takes it: correct answers are never included.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizForTaking {
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub time_limit: i32,
    pub questions: Vec<QuestionForTaking>,
}

impl QuizForTaking {
    pub fn from_quiz(quiz: &Quiz) -> Self {
        let questions = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionForTaking {
                id: question.id.clone(),
                index: index as i32,
                key: crate::services::grading_service::answer_key(index),
                text: question.text.clone(),
                choices: question.choices.clone(),
            })
            .collect();

        QuizForTaking {
            id: quiz.id.clone(),
            module_id: quiz.module_id.clone(),
            title: quiz.title.clone(),
            time_limit: quiz.time_limit,
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmissionResponse {
    pub quiz_id: String,
    pub result_id: String,
    pub grade: GradeReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestScoreSubmissionResponse {
    pub username: String,
    pub quiz_id: String,
    pub grade: OpenGradeReport,
    pub best_score: i32,
    pub created: bool,
    pub improved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct BestScoreEntry {
    pub rank: i32,
    pub username: String,
    pub best_score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct LeaderboardEntry {
    pub rank: i32,
    pub student_id: String,
    pub username: String,
    pub total_score: i32,
    pub quizzes_completed: i32,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ModuleLeaderboard {
    pub module_id: String,
    pub module_title: String,
    pub policy: ResultPolicy,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub time_limit: i32,
    pub question_count: i32,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        QuizSummary {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            time_limit: quiz.time_limit,
            question_count: quiz.question_count() as i32,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ModuleSummary {
    pub id: String,
    pub title: String,
    pub student_count: i32,
    pub quiz_count: i32,
}

impl ModuleSummary {
    pub fn new(module: &Module, quiz_count: usize) -> Self {
        ModuleSummary {
            id: module.id.clone(),
            title: module.title.clone(),
            student_count: module.student_ids.len() as i32,
            quiz_count: quiz_count as i32,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeacherDashboard {
    pub modules: Vec<ModuleSummary>,
    pub students: Vec<UserDto>,
}

/// Everything the owning teacher sees when managing a module, answers included.
#[derive(Debug, Serialize)]
pub struct ModuleDetail {
    pub module: Module,
    pub quizzes: Vec<Quiz>,
    pub students: Vec<UserDto>,
}

/// A quiz as listed to an assigned student, with their own attempt history.
#[derive(Debug, Clone, Serialize)]
pub struct StudentQuizSummary {
    #[serde(flatten)]
    pub quiz: QuizSummary,
    pub attempts: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentModuleView {
    pub id: String,
    pub title: String,
    pub terms: String,
    pub terms_accepted: bool,
    pub quizzes: Vec<StudentQuizSummary>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignStudentsResponse {
    pub assigned: Vec<String>,
    pub already_assigned: Vec<String>,
    pub notices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteModuleResponse {
    pub message: String,
    pub quizzes_deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Question;

    #[test]
    fn test_user_dto_hides_password_hash() {
        let user = User::new("alice", "secret-hash".to_string(), Role::Student);

        let dto: UserDto = user.into();
        let json = serde_json::to_string(&dto).unwrap();
        assert_eq!(dto.username, "alice");
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_quiz_for_taking_omits_answers() {
        let mut quiz = Quiz::new("m-1", "Capitals", 120);
        quiz.questions.push(
            Question::new(
                "Capital of France?",
                vec!["Paris".to_string(), "Lyon".to_string()],
                "Paris",
            )
            .unwrap(),
        );

        let view = QuizForTaking::from_quiz(&quiz);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(view.questions.len(), 1);
        assert_eq!(view.questions[0].key, "question-0");
        assert!(json["questions"][0].get("correct_answer").is_none());
        assert_eq!(json["time_limit"], 120);
    }
}
