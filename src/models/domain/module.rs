use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub terms: String,
    pub teacher_id: String,
    // Assignment order is the leaderboard tie-break order
    #[serde(default)]
    pub student_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Module {
    pub fn new(title: &str, terms: &str, teacher_id: &str) -> Self {
        Module {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            terms: terms.to_string(),
            teacher_id: teacher_id.to_string(),
            student_ids: Vec::new(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.teacher_id == user_id
    }

    pub fn has_student(&self, student_id: &str) -> bool {
        self.student_ids.iter().any(|id| id == student_id)
    }
}
