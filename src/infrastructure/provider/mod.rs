//! Generation API integration: HTTP client, rate limiting, retries, speech.

pub mod client;
pub mod error;
pub mod rate_limiter;
pub mod retry;
pub mod speech;

pub use client::GenerationApiClient;
pub use error::GenerationApiError;
pub use rate_limiter::TokenBucketRateLimiter;
pub use retry::RetryPolicy;
pub use speech::FileSpeechSynthesizer;
