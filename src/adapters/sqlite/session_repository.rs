//! SQLite implementation of the SessionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NextAction, PlacementSession};
use crate::domain::ports::SessionRepository;

#[derive(Clone)]
pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: String,
    user_id: String,
    status: String,
    current_level: String,
    score_percentage: Option<f64>,
    next_action: Option<String>,
    determined_level: Option<String>,
    created_at: String,
    completed_at: Option<String>,
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

impl TryFrom<SessionRow> for PlacementSession {
    type Error = DomainError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let next_action: Option<NextAction> = row
            .next_action
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(PlacementSession {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            status: row.status.parse()?,
            current_level: row.current_level.parse()?,
            score_percentage: row.score_percentage,
            next_action,
            determined_level: row.determined_level.as_deref().map(str::parse).transpose()?,
            created_at: parse_timestamp(&row.created_at)?,
            completed_at: row
                .completed_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: &PlacementSession) -> DomainResult<()> {
        let next_action_json = session
            .next_action
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"INSERT INTO placement_sessions
               (id, user_id, status, current_level, score_percentage,
                next_action, determined_level, created_at, completed_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(session.status.as_str())
        .bind(session.current_level.as_str())
        .bind(session.score_percentage)
        .bind(next_action_json)
        .bind(session.determined_level.map(|l| l.as_str().to_string()))
        .bind(session.created_at.to_rfc3339())
        .bind(session.completed_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<PlacementSession>> {
        let row: Option<SessionRow> =
            sqlx::query_as("SELECT * FROM placement_sessions WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(PlacementSession::try_from).transpose()
    }

    async fn update(&self, session: &PlacementSession) -> DomainResult<()> {
        let next_action_json = session
            .next_action
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"UPDATE placement_sessions SET
               user_id = ?, status = ?, current_level = ?, score_percentage = ?,
               next_action = ?, determined_level = ?, completed_at = ?
               WHERE id = ?"#,
        )
        .bind(session.user_id.to_string())
        .bind(session.status.as_str())
        .bind(session.current_level.as_str())
        .bind(session.score_percentage)
        .bind(next_action_json)
        .bind(session.determined_level.map(|l| l.as_str().to_string()))
        .bind(session.completed_at.map(|t| t.to_rfc3339()))
        .bind(session.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SessionNotFound(session.id));
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<PlacementSession>> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            "SELECT * FROM placement_sessions WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PlacementSession::try_from).collect()
    }
}
