use std::collections::HashMap;

use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::Role;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Title and terms of a module, used for both creation and updates.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModuleDetailsRequest {
    #[validate(length(max = 100))]
    #[serde(default)]
    pub title: String,

    #[validate(length(max = 10000))]
    #[serde(default)]
    pub terms: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(max = 100))]
    #[serde(default)]
    pub title: String,

    #[validate(range(min = 1))]
    pub time_limit: Option<i32>,
}

/// Choices arrive either as a list or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChoicesInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for ChoicesInput {
    fn default() -> Self {
        ChoicesInput::List(Vec::new())
    }
}

impl ChoicesInput {
    /// Trimmed, non-blank choice labels in submission order.
    pub fn into_choices(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            ChoicesInput::List(items) => items,
            ChoicesInput::Csv(joined) => joined.split(',').map(str::to_string).collect(),
        };

        raw.into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddQuestionRequest {
    pub quiz_id: Option<String>,

    #[validate(length(max = 1000))]
    #[serde(default)]
    pub question_text: String,

    #[serde(default)]
    pub choices: ChoicesInput,

    #[serde(default)]
    pub correct_answer: String,
}

/// Timer input as typed into a form; may be a number or arbitrary text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimerInput {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetTimerRequest {
    pub quiz_id: Option<String>,
    pub time_limit: TimerInput,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignStudentsRequest {
    #[validate(length(min = 1, max = 500))]
    pub student_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AcceptTermsRequest {
    #[serde(default)]
    pub accept_terms: bool,
}

/// Answers keyed by `question-<index>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitAnswersRequest {
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BestScoreSubmissionRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[serde(default)]
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LeaderboardQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, InputObject)]
pub struct AnswerInput {
    pub key: String,
    pub value: String,
}

pub fn answers_to_map(answers: Vec<AnswerInput>) -> HashMap<String, String> {
    answers.into_iter().map(|a| (a.key, a.value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_valid_register_request() {
        let request = RegisterRequest {
            username: "mr_jones".to_string(),
            password: "correct horse".to_string(),
            role: Role::Teacher,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let request = RegisterRequest {
            username: "mr_jones".to_string(),
            password: "short".to_string(),
            role: Role::Teacher,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_choices_accept_list_or_csv() {
        let list: AddQuestionRequest = serde_json::from_str(
            r#"{ "question_text": "Q", "choices": [" A ", "", "B"], "correct_answer": "A" }"#,
        )
        .unwrap();
        assert_eq!(list.choices.into_choices(), vec!["A", "B"]);

        let csv: AddQuestionRequest = serde_json::from_str(
            r#"{ "question_text": "Q", "choices": "A, B,,C", "correct_answer": "A" }"#,
        )
        .unwrap();
        assert_eq!(csv.choices.into_choices(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_timer_input_accepts_number_or_text() {
        let number: SetTimerRequest = serde_json::from_str(r#"{ "time_limit": 90 }"#).unwrap();
        assert!(matches!(number.time_limit, TimerInput::Number(90)));

        let text: SetTimerRequest = serde_json::from_str(r#"{ "time_limit": "abc" }"#).unwrap();
        assert!(matches!(text.time_limit, TimerInput::Text(ref t) if t == "abc"));
    }

    #[test]
    fn test_leaderboard_limit_bounds() {
        assert!(LeaderboardQuery { limit: Some(0) }.validate().is_err());
        assert!(LeaderboardQuery { limit: Some(101) }.validate().is_err());
        assert!(LeaderboardQuery { limit: None }.validate().is_ok());
    }

    #[test]
    fn test_answers_to_map() {
        let map = answers_to_map(vec![AnswerInput {
            key: "question-0".to_string(),
            value: "A".to_string(),
        }]);
        assert_eq!(map.get("question-0").map(String::as_str), Some("A"));
    }
}
