use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{LadderLevel, QuizCategory};

/// Source of leveled quiz questions.
///
/// Returns raw question payloads for a (level, category) pair; the caller
/// caps how many it takes. An empty list is a valid answer (the bank simply
/// has no questions there), not an error.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn load_questions(
        &self,
        level: LadderLevel,
        category: QuizCategory,
    ) -> DomainResult<Vec<serde_json::Value>>;
}
