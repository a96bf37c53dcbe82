//! Score aggregation for the two leaderboard modes.
//!
//! Best-score mode keeps one number per username and only ever raises it.
//! Sum mode derives a per-module ranking from the append-only result rows at
//! read time; [`ResultPolicy`] decides how repeated attempts at the same quiz
//! are counted.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use async_graphql::Enum;
use serde::{Deserialize, Serialize};

use crate::models::domain::{QuizResult, User};
use crate::models::dto::response::{BestScoreEntry, LeaderboardEntry};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "snake_case")]
pub enum ResultPolicy {
    /// Every result row counts, retakes included.
    #[default]
    SumAll,
    /// Highest score per quiz.
    BestPerQuiz,
    /// Most recently submitted score per quiz.
    LatestPerQuiz,
}

impl FromStr for ResultPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "sum_all" | "sum" | "all" => Ok(ResultPolicy::SumAll),
            "best_per_quiz" | "best" => Ok(ResultPolicy::BestPerQuiz),
            "latest_per_quiz" | "latest" => Ok(ResultPolicy::LatestPerQuiz),
            other => Err(format!("unknown result policy '{}'", other)),
        }
    }
}

impl ResultPolicy {
    /// Reduce one student's results for a single quiz. `results` is never empty.
    fn reduce(&self, results: &[&QuizResult]) -> i32 {
        match self {
            ResultPolicy::SumAll => results.iter().map(|r| r.score).sum(),
            ResultPolicy::BestPerQuiz => results.iter().map(|r| r.score).max().unwrap_or(0),
            ResultPolicy::LatestPerQuiz => results
                .iter()
                .max_by_key(|r| r.submitted_at)
                .map(|r| r.score)
                .unwrap_or(0),
        }
    }
}

/// Value to write for a best-score submission, or `None` to leave the
/// stored score alone. Only a strictly greater score replaces an existing one.
pub fn improved_best_score(current: Option<i32>, submitted: i32) -> Option<i32> {
    match current {
        Some(best) if submitted <= best => None,
        _ => Some(submitted),
    }
}

/// Users with a best score, highest first, at most `limit`. Equal scores
/// keep their input order.
pub fn rank_best_scores(users: Vec<User>, limit: usize) -> Vec<BestScoreEntry> {
    let mut scored: Vec<(String, i32)> = users
        .into_iter()
        .filter_map(|u| u.best_score.map(|score| (u.username, score)))
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));

    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (username, best_score))| BestScoreEntry {
            rank: i as i32 + 1,
            username,
            best_score,
        })
        .collect()
}

/// Per-module leaderboard.
///
/// `students` must be in assignment order; results for quizzes outside
/// `quiz_ids` or for other students are ignored.
pub fn aggregate_module_scores(
    students: &[User],
    quiz_ids: &[String],
    results: &[QuizResult],
    policy: ResultPolicy,
) -> Vec<LeaderboardEntry> {
    let in_module: HashSet<&str> = quiz_ids.iter().map(String::as_str).collect();

    let mut by_student: HashMap<&str, HashMap<&str, Vec<&QuizResult>>> = HashMap::new();
    for result in results
        .iter()
        .filter(|r| in_module.contains(r.quiz_id.as_str()))
    {
        by_student
            .entry(result.student_id.as_str())
            .or_default()
            .entry(result.quiz_id.as_str())
            .or_default()
            .push(result);
    }

    let mut entries: Vec<LeaderboardEntry> = students
        .iter()
        .map(|student| {
            let (total_score, quizzes_completed) = by_student
                .get(student.id.as_str())
                .map(|per_quiz| {
                    let total = per_quiz.values().map(|rs| policy.reduce(rs)).sum();
                    (total, per_quiz.len() as i32)
                })
                .unwrap_or((0, 0));

            LeaderboardEntry {
                rank: 0,
                student_id: student.id.clone(),
                username: student.username.clone(),
                total_score,
                quizzes_completed,
            }
        })
        .collect();

    // stable: ties stay in assignment order
    entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as i32 + 1;
    }

    entries
}
