//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - SessionRepository / QuizRepository / GeneratedQuestionRepository:
//!   durable store operations
//! - QuestionSource: leveled quiz question bank
//! - TestProvider / SpeechSynthesizer: AI generation backend
//! - Cache: TTL key/value store (results + advisory lock backing)
//! - JobQueue: background generation fallback
//!
//! These traits keep the placement domain independent of specific
//! infrastructure implementations.

pub mod cache;
pub mod job_queue;
pub mod question_repository;
pub mod question_source;
pub mod quiz_repository;
pub mod session_repository;
pub mod test_provider;

pub use cache::{Cache, CacheError};
pub use job_queue::JobQueue;
pub use question_repository::GeneratedQuestionRepository;
pub use question_source::QuestionSource;
pub use quiz_repository::QuizRepository;
pub use session_repository::SessionRepository;
pub use test_provider::{ProviderError, SpeechSynthesizer, TestProvider};
