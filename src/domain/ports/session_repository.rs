use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::PlacementSession;

/// Repository port for placement session persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session.
    async fn create(&self, session: &PlacementSession) -> DomainResult<()>;

    /// Get a session by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<PlacementSession>>;

    /// Update an existing session. Errors with `SessionNotFound` if absent.
    async fn update(&self, session: &PlacementSession) -> DomainResult<()>;

    /// List all sessions belonging to a user, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<PlacementSession>>;
}
