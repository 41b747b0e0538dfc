//! Engine configuration model.
//!
//! Loaded by `infrastructure::config::ConfigLoader` with hierarchical merging
//! (defaults → YAML → environment).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Score (percent) required to pass a quiz round or a generated test.
pub const PASS_THRESHOLD: f64 = 70.0;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub generation: GenerationConfig,
    pub provider: ProviderConfig,
    pub questions: QuestionBankConfig,
}

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: ".levelset/levelset.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error.
    pub level: String,
    /// One of: json, pretty.
    pub format: String,
    /// Optional log file path; stderr when unset.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Full-test generation coordination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Bounded wait for the interactive generation path, seconds.
    pub deadline_secs: u64,
    /// TTL of the per-session advisory generation lock, seconds.
    /// Must exceed `deadline_secs` so the lock cannot expire while the
    /// interactive path is still waiting on the provider.
    pub lock_ttl_secs: u64,
    /// TTL of cached complete test results, seconds.
    pub cache_ttl_secs: u64,
    /// Human-readable completion estimate returned with `Generating`.
    pub estimated_wait: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            deadline_secs: 120,
            lock_ttl_secs: 300,
            cache_ttl_secs: 1800,
            estimated_wait: "2-5 minutes".to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Generation provider (HTTP API) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// API key; when empty the engine falls back to the built-in mock
    /// provider (useful for local development).
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub rate_limit_rps: f64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Directory where synthesized audio files are stored.
    pub audio_dir: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 150,
            rate_limit_rps: 5.0,
            max_retries: 3,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 30_000,
            audio_dir: ".levelset/audio".to_string(),
        }
    }
}

/// Leveled quiz question bank settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionBankConfig {
    /// Root directory: `<path>/<category>/<level>/questions.json`.
    pub path: String,
    /// Questions selected per category when generating a leveled quiz.
    pub per_category: usize,
}

impl Default for QuestionBankConfig {
    fn default() -> Self {
        Self {
            path: "questions_data".to_string(),
            per_category: 10,
        }
    }
}
