//! Domain models for the placement engine.

pub mod config;
pub mod level;
pub mod placement;
pub mod quiz;
pub mod test;

pub use config::{
    Config, DatabaseConfig, GenerationConfig, LoggingConfig, ProviderConfig, QuestionBankConfig,
    PASS_THRESHOLD,
};
pub use level::{CefrLevel, LadderLevel};
pub use placement::{AiOutcomes, NextAction, PlacementSession, SessionStatus};
pub use quiz::{AnswerOutcome, LeveledQuiz, QuizCategory};
pub use test::{
    GeneratedQuestion, GeneratedTest, GenerationJob, GenerationStatus, JobHandle, SectionData,
    SectionItem, SectionKind, SectionOutcome, TestScore,
};
