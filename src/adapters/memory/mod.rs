//! In-memory adapters for tests and local development.

pub mod cache;
pub mod job_queue;
pub mod provider;
pub mod question_source;
pub mod repositories;

pub use cache::MemoryCache;
pub use job_queue::ChannelJobQueue;
pub use provider::{default_payload, MockProvider, MockSection, MockSpeech};
pub use question_source::MemoryQuestionSource;
pub use repositories::{
    MemoryGeneratedQuestionRepository, MemoryQuizRepository, MemorySessionRepository,
};
