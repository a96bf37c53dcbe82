use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::Question;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub time_limit: i32, // seconds, advisory only
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(module_id: &str, title: &str, time_limit: i32) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            module_id: module_id.to_string(),
            title: title.to_string(),
            time_limit,
            questions: Vec::new(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
