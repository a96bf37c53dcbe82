use std::fmt;

use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    #[default]
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    // PHC string; anonymous best-score players have none and cannot log in
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub best_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: &str, password_hash: String, role: Role) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: Some(password_hash),
            role,
            best_score: None,
            created_at: Some(Utc::now()),
        }
    }

    /// Record created by the first best-score submission under a new username.
    pub fn anonymous_player(username: &str, best_score: i32) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: None,
            role: Role::Student,
            best_score: Some(best_score),
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    /// Registered accounts have a password; best-score players do not.
    pub fn is_registered(&self) -> bool {
        self.password_hash.is_some()
    }
}

#[cfg(test)]
impl User {
    pub fn test_teacher(username: &str) -> Self {
        User::new(username, "not-a-real-hash".to_string(), Role::Teacher)
    }

    pub fn test_student(username: &str) -> Self {
        User::new(username, "not-a-real-hash".to_string(), Role::Student)
    }
}
