use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::models::domain::{Question, QuizResult};
use crate::models::dto::response::{GradeReport, QuestionOutcome};

pub const ANSWER_KEY_PREFIX: &str = "question-";

/// Form key under which the answer to the question at `index` is submitted.
pub fn answer_key(index: usize) -> String {
    format!("{}{}", ANSWER_KEY_PREFIX, index)
}

pub struct GradingService;

impl GradingService {
    /// Grade submitted answers against a quiz's ordered questions.
    ///
    /// A missing answer counts as a miss. Keys that match no question are
    /// ignored. Comparison is exact.
    pub fn grade(questions: &[Question], answers: &HashMap<String, String>) -> GradeReport {
        let breakdown: Vec<QuestionOutcome> = questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let submitted = answers.get(&answer_key(index)).cloned();
                let correct = submitted
                    .as_deref()
                    .map(|answer| question.is_correct(answer))
                    .unwrap_or(false);

                QuestionOutcome {
                    index: index as i32,
                    question_id: question.id.clone(),
                    submitted,
                    correct_answer: question.correct_answer.clone(),
                    correct,
                }
            })
            .collect();

        let score = breakdown.iter().filter(|outcome| outcome.correct).count() as i32;

        GradeReport {
            score,
            total: breakdown.len() as i32,
            breakdown,
        }
    }

    /// Build the result row to append for a graded submission.
    pub fn create_result(student_id: &str, quiz_id: &str, report: &GradeReport) -> QuizResult {
        QuizResult {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            quiz_id: quiz_id.to_string(),
            score: report.score,
            total: report.total,
            submitted_at: Utc::now(),
        }
    }
}
