//! SQLite implementation of the GeneratedQuestionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GeneratedQuestion, SectionKind};
use crate::domain::ports::GeneratedQuestionRepository;

#[derive(Clone)]
pub struct SqliteGeneratedQuestionRepository {
    pool: SqlitePool,
}

impl SqliteGeneratedQuestionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: String,
    session_id: String,
    kind: String,
    number: i64,
    content: String,
    options: Option<String>,
    correct_answer: Option<String>,
    user_answer: Option<String>,
    score: Option<f64>,
    feedback: Option<String>,
    audio_path: Option<String>,
    created_at: String,
}

impl TryFrom<QuestionRow> for GeneratedQuestion {
    type Error = DomainError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(GeneratedQuestion {
            id: parse_uuid(&row.id)?,
            session_id: parse_uuid(&row.session_id)?,
            kind: row.kind.parse()?,
            number: u32::try_from(row.number)
                .map_err(|_| DomainError::DatabaseError("negative question number".to_string()))?,
            content: serde_json::from_str(&row.content)?,
            options: row
                .options
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            correct_answer: row.correct_answer,
            user_answer: row.user_answer,
            score: row.score,
            feedback: row.feedback,
            audio_path: row.audio_path,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

fn parse_uuid(raw: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| DomainError::DatabaseError(format!("invalid uuid {raw}: {e}")))
}

fn parse_timestamp(raw: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DomainError::DatabaseError(format!("invalid timestamp {raw}: {e}")))
}

#[async_trait]
impl GeneratedQuestionRepository for SqliteGeneratedQuestionRepository {
    async fn insert_many(&self, questions: &[GeneratedQuestion]) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        for question in questions {
            sqlx::query(
                r#"INSERT INTO generated_questions
                   (id, session_id, kind, number, content, options, correct_answer,
                    user_answer, score, feedback, audio_path, created_at)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(question.id.to_string())
            .bind(question.session_id.to_string())
            .bind(question.kind.as_str())
            .bind(i64::from(question.number))
            .bind(serde_json::to_string(&question.content)?)
            .bind(
                question
                    .options
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
            )
            .bind(&question.correct_answer)
            .bind(&question.user_answer)
            .bind(question.score)
            .bind(&question.feedback)
            .bind(&question.audio_path)
            .bind(question.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_for_session(
        &self,
        session_id: Uuid,
        kind: Option<SectionKind>,
    ) -> DomainResult<Vec<GeneratedQuestion>> {
        let rows: Vec<QuestionRow> = match kind {
            Some(kind) => {
                sqlx::query_as(
                    "SELECT * FROM generated_questions
                     WHERE session_id = ? AND kind = ? ORDER BY number",
                )
                .bind(session_id.to_string())
                .bind(kind.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT * FROM generated_questions
                     WHERE session_id = ? ORDER BY kind, number",
                )
                .bind(session_id.to_string())
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(GeneratedQuestion::try_from).collect()
    }

    async fn record_score(
        &self,
        id: Uuid,
        user_answer: &str,
        score: f64,
        feedback: Option<&str>,
    ) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE generated_questions SET user_answer = ?, score = ?, feedback = ? WHERE id = ?",
        )
        .bind(user_answer)
        .bind(score)
        .bind(feedback)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::QuestionNotFound(id));
        }
        Ok(())
    }
}
