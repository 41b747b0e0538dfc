//! Generation provider port.
//!
//! Abstracts the AI backend that writes test content. Implementations:
//!
//! - **GenerationApiClient**: HTTP API client (rate limited, retried)
//! - **MockProvider**: canned responses for tests and local development
//!
//! Provider latency is unbounded from the engine's perspective; the
//! generation coordinator imposes its own deadline.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::{LadderLevel, SectionKind};

/// Error types for provider operations.
///
/// All of these are soft from the coordinator's point of view: a failing
/// section becomes an error marker, never an aborted test.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Provider request timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Generation failed: {0}")]
    Failed(String),
}

/// Port trait for test content generation backends.
///
/// Implementations must be `Send + Sync`; the coordinator issues the four
/// section calls concurrently.
#[async_trait]
pub trait TestProvider: Send + Sync {
    /// Generate the raw payload for one section at the given level.
    ///
    /// The payload shape is section-specific and validated downstream by the
    /// section processors; malformed payloads surface there as soft
    /// failures, not here.
    async fn generate_section(
        &self,
        kind: SectionKind,
        level: LadderLevel,
    ) -> Result<serde_json::Value, ProviderError>;
}

/// Port trait for speech synthesis side effects.
///
/// Listening and speaking items attach audio produced from a script. A
/// synthesis failure must not fail the section; callers fall back to a null
/// audio reference.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `script` and store it under a name derived from
    /// `file_stem`. Returns the stored audio path.
    async fn synthesize(&self, script: &str, file_stem: &str) -> Result<String, ProviderError>;
}
