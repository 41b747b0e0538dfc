//! SQLite implementation of the QuizRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::LeveledQuiz;
use crate::domain::ports::QuizRepository;

#[derive(Clone)]
pub struct SqliteQuizRepository {
    pool: SqlitePool,
}

impl SqliteQuizRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct QuizRow {
    id: String,
    session_id: String,
    category: String,
    question: String,
    user_answer: Option<String>,
    is_correct: Option<bool>,
    order_index: i64,
    answered_at: Option<String>,
}

impl TryFrom<QuizRow> for LeveledQuiz {
    type Error = DomainError;

    fn try_from(row: QuizRow) -> Result<Self, Self::Error> {
        Ok(LeveledQuiz {
            id: parse_uuid(&row.id)?,
            session_id: parse_uuid(&row.session_id)?,
            category: row.category.parse()?,
            question: serde_json::from_str(&row.question)?,
            user_answer: row.user_answer,
            is_correct: row.is_correct,
            order_index: u32::try_from(row.order_index)
                .map_err(|_| DomainError::DatabaseError("negative order index".to_string()))?,
            answered_at: row
                .answered_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
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
impl QuizRepository for SqliteQuizRepository {
    async fn replace_for_session(
        &self,
        session_id: Uuid,
        quizzes: &[LeveledQuiz],
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM leveled_quizzes WHERE session_id = ?")
            .bind(session_id.to_string())
            .execute(&mut *tx)
            .await?;

        for quiz in quizzes {
            sqlx::query(
                r#"INSERT INTO leveled_quizzes
                   (id, session_id, category, question, user_answer, is_correct,
                    order_index, answered_at)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(quiz.id.to_string())
            .bind(quiz.session_id.to_string())
            .bind(quiz.category.as_str())
            .bind(serde_json::to_string(&quiz.question)?)
            .bind(&quiz.user_answer)
            .bind(quiz.is_correct)
            .bind(i64::from(quiz.order_index))
            .bind(quiz.answered_at.map(|t| t.to_rfc3339()))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<LeveledQuiz>> {
        let row: Option<QuizRow> = sqlx::query_as("SELECT * FROM leveled_quizzes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(LeveledQuiz::try_from).transpose()
    }

    async fn list_for_session(&self, session_id: Uuid) -> DomainResult<Vec<LeveledQuiz>> {
        let rows: Vec<QuizRow> = sqlx::query_as(
            "SELECT * FROM leveled_quizzes WHERE session_id = ? ORDER BY order_index",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LeveledQuiz::try_from).collect()
    }

    async fn record_answer(
        &self,
        id: Uuid,
        answer: &str,
        is_correct: bool,
        answered_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE leveled_quizzes SET user_answer = ?, is_correct = ?, answered_at = ? WHERE id = ?",
        )
        .bind(answer)
        .bind(is_correct)
        .bind(answered_at.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::QuestionNotFound(id));
        }
        Ok(())
    }
}
