//! Quiz score tallying.
//!
//! A quiz counts toward the score only once it has been graded (its
//! correctness flag is non-null). An empty set scores 0 rather than erroring;
//! a user who answered nothing simply fails the round.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::models::{LeveledQuiz, QuizCategory, PASS_THRESHOLD};

/// Per-category tally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub correct: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Result of scoring one quiz round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score_percentage: f64,
    pub passed: bool,
    pub categories: HashMap<QuizCategory, CategoryStats>,
}

fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    }
}

/// Tally a quiz round: overall score, pass flag, and per-category breakdown.
pub fn tally(quizzes: &[LeveledQuiz]) -> ScoreReport {
    let graded: Vec<&LeveledQuiz> = quizzes.iter().filter(|q| q.is_correct.is_some()).collect();

    let total_questions = graded.len();
    let correct_answers = graded.iter().filter(|q| q.is_correct == Some(true)).count();
    let score_percentage = percentage(correct_answers, total_questions);

    let mut categories = HashMap::new();
    for category in QuizCategory::ALL {
        let in_category: Vec<&&LeveledQuiz> =
            graded.iter().filter(|q| q.category == category).collect();
        let correct = in_category
            .iter()
            .filter(|q| q.is_correct == Some(true))
            .count();
        let total = in_category.len();
        categories.insert(
            category,
            CategoryStats {
                correct,
                total,
                percentage: percentage(correct, total),
            },
        );
    }

    ScoreReport {
        total_questions,
        correct_answers,
        score_percentage,
        passed: passes(score_percentage),
        categories,
    }
}

/// Whether a score percentage clears the pass threshold.
pub fn passes(score_percentage: f64) -> bool {
    score_percentage >= PASS_THRESHOLD
}
