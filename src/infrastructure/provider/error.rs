//! Error types for the generation API client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the HTTP generation API.
///
/// # Retry Decision
/// - Retry on: 429 (rate limit), 5xx server errors, timeouts, network errors
/// - Do NOT retry: 400, 401, 403, 404 (client errors)
#[derive(Debug, Clone, Error)]
pub enum GenerationApiError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Server error {0}: {1}")]
    ServerError(StatusCode, String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),
}

impl GenerationApiError {
    /// Whether the error is transient and worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationApiError::RateLimitExceeded
            | GenerationApiError::Timeout
            | GenerationApiError::NetworkError(_) => true,
            GenerationApiError::ServerError(status, _) => status.is_server_error(),
            GenerationApiError::InvalidApiKey
            | GenerationApiError::InvalidRequest(_)
            | GenerationApiError::NotFound
            | GenerationApiError::InvalidResponse(_) => false,
        }
    }

    /// Classify an HTTP status into an API error.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationApiError::InvalidApiKey,
            StatusCode::NOT_FOUND => GenerationApiError::NotFound,
            StatusCode::TOO_MANY_REQUESTS => GenerationApiError::RateLimitExceeded,
            StatusCode::BAD_REQUEST => GenerationApiError::InvalidRequest(body),
            status => GenerationApiError::ServerError(status, body),
        }
    }
}

impl From<reqwest::Error> for GenerationApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationApiError::Timeout
        } else {
            GenerationApiError::NetworkError(err.to_string())
        }
    }
}
