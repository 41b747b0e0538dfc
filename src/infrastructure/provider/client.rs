//! HTTP client for the test generation API.
//!
//! Features:
//! - connection pooling and reuse (via `reqwest::Client`)
//! - token bucket rate limiting (configurable requests/second)
//! - exponential backoff retries for transient errors
//! - transient vs permanent error classification

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, instrument};

use super::error::GenerationApiError;
use super::rate_limiter::TokenBucketRateLimiter;
use super::retry::RetryPolicy;
use crate::domain::models::{LadderLevel, ProviderConfig, SectionKind};
use crate::domain::ports::{ProviderError, TestProvider};

/// HTTP client implementing the `TestProvider` port.
pub struct GenerationApiClient {
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
    model: String,
    timeout_secs: u64,
    rate_limiter: TokenBucketRateLimiter,
    retry_policy: RetryPolicy,
}

impl GenerationApiClient {
    /// Build a client from provider configuration.
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            rate_limiter: TokenBucketRateLimiter::new(config.rate_limit_rps),
            retry_policy: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        })
    }

    #[instrument(skip(self), err)]
    async fn request_section(
        &self,
        kind: SectionKind,
        level: LadderLevel,
    ) -> Result<serde_json::Value, GenerationApiError> {
        self.rate_limiter.acquire().await;

        let response = self
            .http_client
            .post(format!("{}/v1/test-sections", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "section": kind.as_str(),
                "level": level.as_str(),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationApiError::from_status(status, body));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationApiError::InvalidResponse(e.to_string()))?;

        debug!(%kind, %level, "section payload received");
        Ok(payload)
    }

    /// Synthesize speech for a script, returning raw audio bytes.
    #[instrument(skip(self, script), fields(script_len = script.len()), err)]
    pub async fn request_speech(&self, script: &str) -> Result<Vec<u8>, GenerationApiError> {
        self.rate_limiter.acquire().await;

        let response = self
            .http_client
            .post(format!("{}/v1/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": script,
                "voice": "alloy",
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationApiError::from_status(status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationApiError::InvalidResponse(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn to_provider_error(&self, err: GenerationApiError) -> ProviderError {
        match err {
            GenerationApiError::RateLimitExceeded => {
                ProviderError::RateLimitExceeded("generation API rate limit".to_string())
            }
            GenerationApiError::Timeout => ProviderError::Timeout(self.timeout_secs),
            GenerationApiError::InvalidResponse(msg) => ProviderError::InvalidResponse(msg),
            GenerationApiError::NetworkError(msg) => ProviderError::Unavailable(msg),
            GenerationApiError::ServerError(status, body) => {
                ProviderError::Unavailable(format!("{status}: {body}"))
            }
            other => ProviderError::Failed(other.to_string()),
        }
    }
}

#[async_trait]
impl TestProvider for GenerationApiClient {
    async fn generate_section(
        &self,
        kind: SectionKind,
        level: LadderLevel,
    ) -> Result<serde_json::Value, ProviderError> {
        self.retry_policy
            .execute(|| self.request_section(kind, level))
            .await
            .map_err(|err| self.to_provider_error(err))
    }
}
