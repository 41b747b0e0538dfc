use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{GenerationJob, JobHandle};

/// Background job queue port.
///
/// Used only for the deadline-fallback path of full-test generation; job
/// execution re-enters the same generation logic on a worker.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a generation job and return its handle.
    async fn enqueue(&self, job: GenerationJob) -> DomainResult<JobHandle>;
}
