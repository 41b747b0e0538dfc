//! Leveled quiz models.
//!
//! Leveled quizzes are the graded multiple-choice questions bound to a
//! placement session at one ladder level. They are replaced wholesale each
//! time a new level is generated for the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Skill category of a leveled quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizCategory {
    Grammar,
    Vocabulary,
    Reading,
}

impl QuizCategory {
    pub const ALL: [QuizCategory; 3] = [
        QuizCategory::Grammar,
        QuizCategory::Vocabulary,
        QuizCategory::Reading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizCategory::Grammar => "grammar",
            QuizCategory::Vocabulary => "vocabulary",
            QuizCategory::Reading => "reading",
        }
    }
}

impl fmt::Display for QuizCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grammar" => Ok(QuizCategory::Grammar),
            "vocabulary" => Ok(QuizCategory::Vocabulary),
            "reading" => Ok(QuizCategory::Reading),
            other => Err(DomainError::ValidationFailed(format!(
                "unknown quiz category: {other}"
            ))),
        }
    }
}

/// One graded question bound to a placement session.
///
/// The question payload is kept opaque (`serde_json::Value`); its shape comes
/// from the question bank. Grammar and vocabulary payloads carry a top-level
/// `correct_answer`; reading payloads nest it under `question` next to the
/// shared passage `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeveledQuiz {
    pub id: Uuid,
    pub session_id: Uuid,
    pub category: QuizCategory,
    pub question: serde_json::Value,
    pub user_answer: Option<String>,
    pub is_correct: Option<bool>,
    /// Dense, session-unique ordering index assigned at generation time.
    pub order_index: u32,
    pub answered_at: Option<DateTime<Utc>>,
}

impl LeveledQuiz {
    pub fn new(
        session_id: Uuid,
        category: QuizCategory,
        question: serde_json::Value,
        order_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            category,
            question,
            user_answer: None,
            is_correct: None,
            order_index,
            answered_at: None,
        }
    }

    /// Expected answer for this question, per the category's payload shape.
    pub fn correct_answer(&self) -> Option<&str> {
        match self.category {
            QuizCategory::Grammar | QuizCategory::Vocabulary => {
                self.question.get("correct_answer").and_then(|v| v.as_str())
            }
            QuizCategory::Reading => self
                .question
                .get("question")
                .and_then(|q| q.get("correct_answer"))
                .and_then(|v| v.as_str()),
        }
    }
}

/// Result of submitting an answer to a leveled quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub correct_answer: Option<String>,
    /// True when the submission overwrote a previous answer.
    pub was_updated: bool,
}
