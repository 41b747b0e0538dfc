use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{GeneratedQuestion, SectionKind};

/// Repository port for durable generated test question records.
#[async_trait]
pub trait GeneratedQuestionRepository: Send + Sync {
    /// Bulk-insert question records for one section.
    async fn insert_many(&self, questions: &[GeneratedQuestion]) -> DomainResult<()>;

    /// List questions for a session, optionally narrowed to one section,
    /// ordered by section and number.
    async fn list_for_session(
        &self,
        session_id: Uuid,
        kind: Option<SectionKind>,
    ) -> DomainResult<Vec<GeneratedQuestion>>;

    /// Record the user's answer and its evaluation for one question.
    async fn record_score(
        &self,
        id: Uuid,
        user_answer: &str,
        score: f64,
        feedback: Option<&str>,
    ) -> DomainResult<()>;
}
