//! Levelset - Adaptive English Placement Engine
//!
//! Levelset determines a user's CEFR level through a multi-stage adaptive
//! placement flow: leveled quizzes climb a difficulty ladder, a state
//! machine decides after each round whether to conclude, continue, or
//! escalate to an AI-generated full test, and a generation coordinator
//! produces that four-section test with caching, in-flight deduplication,
//! and a bounded-wait-then-background fallback.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors, and port traits
//! - **Service Layer** (`services`): Placement lifecycle, ladder state
//!   machine, scoring, and the generation coordinator
//! - **Adapters** (`adapters`): In-memory, SQLite, and filesystem port
//!   implementations
//! - **Infrastructure Layer** (`infrastructure`): Configuration, logging,
//!   and the HTTP generation provider
//! - **CLI Layer** (`cli`): Command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AnswerOutcome, CefrLevel, Config, GeneratedQuestion, GeneratedTest, GenerationJob,
    GenerationStatus, JobHandle, LadderLevel, LeveledQuiz, NextAction, PlacementSession,
    QuizCategory, SectionKind, SectionOutcome, SessionStatus, PASS_THRESHOLD,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    AdvisoryLock, CompletionReport, GenerationService, GenerationWorker, PlacementService,
};
