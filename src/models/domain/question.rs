use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub choices: Vec<String>,
    pub correct_answer: String, // always one of `choices`
}

impl Question {
    /// Returns `None` when the correct answer is not among the choices.
    pub fn new(text: &str, choices: Vec<String>, correct_answer: &str) -> Option<Self> {
        if !choices.iter().any(|c| c == correct_answer) {
            return None;
        }

        Some(Question {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            choices,
            correct_answer: correct_answer.to_string(),
        })
    }

    pub fn is_correct(&self, submitted: &str) -> bool {
        self.correct_answer == submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_question_requires_correct_answer_among_choices() {
        assert!(Question::new("2+2?", choices(&["3", "4"]), "4").is_some());
        assert!(Question::new("2+2?", choices(&["3", "4"]), "5").is_none());
    }

    #[test]
    fn test_is_correct_is_exact_and_case_sensitive() {
        let question = Question::new("Pick", choices(&["A", "B"]), "A").unwrap();
        assert!(question.is_correct("A"));
        assert!(!question.is_correct("a"));
        assert!(!question.is_correct(" A"));
    }
}
