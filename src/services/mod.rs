//! Business logic services.

pub mod advisory_lock;
pub mod generation;
pub mod ladder;
pub mod placement;
pub mod scoring;
pub mod worker;

pub use advisory_lock::AdvisoryLock;
pub use generation::GenerationService;
pub use placement::{CompletionReport, PlacementService, QuizBundle, QuizEntry, QuizPlan};
pub use scoring::{CategoryStats, ScoreReport};
pub use worker::GenerationWorker;
