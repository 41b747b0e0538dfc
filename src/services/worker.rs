//! Background generation worker.
//!
//! Consumes queued generation jobs and re-enters the coordinator's
//! generation logic. Each worker owns one dedicated current-thread tokio
//! runtime, built once at worker startup and torn down at shutdown; jobs
//! never create runtimes of their own.

use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::domain::models::GenerationJob;
use crate::services::generation::GenerationService;

/// Handle to a running generation worker thread.
///
/// The worker drains its queue and exits once all queue senders are dropped;
/// `join` waits for that.
pub struct GenerationWorker {
    handle: JoinHandle<()>,
}

impl GenerationWorker {
    /// Spawn a worker thread processing jobs from `receiver`.
    pub fn spawn(
        service: Arc<GenerationService>,
        mut receiver: mpsc::UnboundedReceiver<GenerationJob>,
    ) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let handle = std::thread::Builder::new()
            .name("generation-worker".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    info!("generation worker started");
                    while let Some(job) = receiver.recv().await {
                        info!(session_id = %job.session_id, level = %job.level,
                              "processing background generation job");
                        if let Err(err) = service.run_background(job).await {
                            error!(session_id = %job.session_id, error = %err,
                                   "background generation failed");
                        }
                    }
                    info!("generation worker stopped");
                });
            })?;

        Ok(Self { handle })
    }

    /// Wait for the worker to drain its queue and stop.
    pub fn join(self) {
        if self.handle.join().is_err() {
            error!("generation worker thread panicked");
        }
    }
}
