use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One graded submission. Rows are only ever appended; a student may hold
/// several for the same quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizResult {
    pub id: String,
    pub student_id: String,
    pub quiz_id: String,
    pub score: i32,
    pub total: i32,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_result_round_trip_preserves_score() {
        let result = QuizResult {
            id: "r-1".to_string(),
            student_id: "s-1".to_string(),
            quiz_id: "q-1".to_string(),
            score: 3,
            total: 5,
            submitted_at: Utc::now(),
        };

        let json = serde_json::to_string(&result).expect("result should serialize");
        let parsed: QuizResult = serde_json::from_str(&json).expect("result should deserialize");

        assert_eq!(parsed, result);
    }
}
