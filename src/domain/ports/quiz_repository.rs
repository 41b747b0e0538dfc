use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::LeveledQuiz;

/// Repository port for leveled quiz persistence.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Delete any quizzes bound to the session and insert the given set.
    /// Used when a new ladder level is generated for the session.
    async fn replace_for_session(
        &self,
        session_id: Uuid,
        quizzes: &[LeveledQuiz],
    ) -> DomainResult<()>;

    /// Get a quiz question by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<LeveledQuiz>>;

    /// List all quizzes for a session ordered by `order_index`.
    async fn list_for_session(&self, session_id: Uuid) -> DomainResult<Vec<LeveledQuiz>>;

    /// Record (or overwrite) the user's answer and its correctness.
    async fn record_answer(
        &self,
        id: Uuid,
        answer: &str,
        is_correct: bool,
        answered_at: DateTime<Utc>,
    ) -> DomainResult<()>;
}
