//! Domain errors for the levelset placement engine.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the placement engine.
///
/// Input errors (`UnknownLevel`, `SessionNotFound`, `QuestionNotFound`,
/// `NotSessionOwner`, `InvalidStatus`) are rejected immediately and never
/// retried. Soft per-section generation failures are *not* errors; they are
/// captured as data in `SectionOutcome::Failed`.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown level: {0}")]
    UnknownLevel(String),

    #[error("Placement session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Question not found: {0}")]
    QuestionNotFound(Uuid),

    #[error("Session {session_id} does not belong to user {user_id}")]
    NotSessionOwner { session_id: Uuid, user_id: Uuid },

    #[error("Cannot {operation} session in status {status}")]
    InvalidStatus { operation: String, status: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
