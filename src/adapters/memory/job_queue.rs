//! Channel-backed job queue adapter.
//!
//! The sender half implements the `JobQueue` port; the receiver half is
//! handed to a `GenerationWorker`. Queue and worker may live in different
//! threads, matching the web-process / background-worker split. `close`
//! stops intake so a worker can drain the queue and shut down.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GenerationJob, JobHandle};
use crate::domain::ports::JobQueue;

/// `JobQueue` implementation over an unbounded tokio channel.
pub struct ChannelJobQueue {
    sender: Mutex<Option<mpsc::UnboundedSender<GenerationJob>>>,
    enqueued: AtomicUsize,
}

impl ChannelJobQueue {
    /// Create the queue and the receiver to hand to a worker.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GenerationJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Mutex::new(Some(sender)),
                enqueued: AtomicUsize::new(0),
            },
            receiver,
        )
    }

    /// Number of jobs enqueued so far.
    pub fn enqueued_count(&self) -> usize {
        self.enqueued.load(Ordering::SeqCst)
    }

    /// Stop intake. Enqueues fail afterwards; the worker drains what is
    /// already queued and then exits.
    pub fn close(&self) {
        let mut sender = self.sender.lock().expect("job queue lock poisoned");
        sender.take();
    }
}

#[async_trait]
impl JobQueue for ChannelJobQueue {
    async fn enqueue(&self, job: GenerationJob) -> DomainResult<JobHandle> {
        let sent = {
            let sender = self.sender.lock().expect("job queue lock poisoned");
            match sender.as_ref() {
                Some(sender) => sender.send(job).is_ok(),
                None => false,
            }
        };
        if !sent {
            return Err(DomainError::GenerationFailed(
                "background job queue is closed".to_string(),
            ));
        }
        self.enqueued.fetch_add(1, Ordering::SeqCst);
        Ok(JobHandle { id: Uuid::new_v4() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::LadderLevel;

    #[tokio::test]
    async fn test_enqueue_delivers_job() {
        let (queue, mut receiver) = ChannelJobQueue::new();
        let job = GenerationJob {
            session_id: Uuid::new_v4(),
            level: LadderLevel::Advanced,
        };

        queue.enqueue(job).await.unwrap();
        assert_eq!(queue.enqueued_count(), 1);
        assert_eq!(receiver.recv().await, Some(job));
    }

    #[tokio::test]
    async fn test_enqueue_after_close_errors() {
        let (queue, mut receiver) = ChannelJobQueue::new();
        queue.close();

        let err = queue
            .enqueue(GenerationJob {
                session_id: Uuid::new_v4(),
                level: LadderLevel::Intermediate,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::GenerationFailed(_)));
        // The receiver observes the closed channel.
        assert_eq!(receiver.recv().await, None);
    }

    #[tokio::test]
    async fn test_enqueue_after_receiver_dropped_errors() {
        let (queue, receiver) = ChannelJobQueue::new();
        drop(receiver);

        let err = queue
            .enqueue(GenerationJob {
                session_id: Uuid::new_v4(),
                level: LadderLevel::Intermediate,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::GenerationFailed(_)));
    }
}
