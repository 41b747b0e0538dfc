//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid generation deadline: {0}. Must be positive")]
    InvalidDeadline(u64),

    #[error(
        "Invalid lock TTL: {lock_ttl_secs}s must exceed the generation deadline ({deadline_secs}s)"
    )]
    LockTtlTooShort {
        lock_ttl_secs: u64,
        deadline_secs: u64,
    },

    #[error("Invalid cache TTL: {0}. Must be positive")]
    InvalidCacheTtl(u64),

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid questions per_category: {0}. Must be at least 1")]
    InvalidPerCategory(usize),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .levelset/config.yaml (project config)
    /// 3. .levelset/local.yaml (local overrides, optional)
    /// 4. Environment variables (LEVELSET_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".levelset/config.yaml"))
            .merge(Yaml::file(".levelset/local.yaml"))
            .merge(Env::prefixed("LEVELSET_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.generation.deadline_secs == 0 {
            return Err(ConfigError::InvalidDeadline(config.generation.deadline_secs));
        }
        // The advisory lock must outlive the interactive wait; otherwise it
        // could expire mid-generation and admit a concurrent attempt.
        if config.generation.lock_ttl_secs <= config.generation.deadline_secs {
            return Err(ConfigError::LockTtlTooShort {
                lock_ttl_secs: config.generation.lock_ttl_secs,
                deadline_secs: config.generation.deadline_secs,
            });
        }
        if config.generation.cache_ttl_secs == 0 {
            return Err(ConfigError::InvalidCacheTtl(config.generation.cache_ttl_secs));
        }

        if config.provider.rate_limit_rps <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(config.provider.rate_limit_rps));
        }
        if config.provider.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.provider.max_retries));
        }
        if config.provider.initial_backoff_ms > config.provider.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.provider.initial_backoff_ms,
                config.provider.max_backoff_ms,
            ));
        }

        if config.questions.per_category == 0 {
            return Err(ConfigError::InvalidPerCategory(config.questions.per_category));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        ConfigLoader::validate(&config).unwrap();
        assert_eq!(config.generation.deadline_secs, 120);
        assert_eq!(config.generation.lock_ttl_secs, 300);
        assert_eq!(config.generation.cache_ttl_secs, 1800);
        assert_eq!(config.questions.per_category, 10);
    }

    #[test]
    fn test_lock_ttl_must_exceed_deadline() {
        let config = Config {
            generation: crate::domain::models::GenerationConfig {
                deadline_secs: 120,
                lock_ttl_secs: 120,
                ..Default::default()
            },
            ..Default::default()
        };

        let err = ConfigLoader::validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::LockTtlTooShort { .. }));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "generation:\n  deadline_secs: 30\n  lock_ttl_secs: 90\nquestions:\n  per_category: 5"
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.generation.deadline_secs, 30);
        assert_eq!(config.generation.lock_ttl_secs, 90);
        assert_eq!(config.questions.per_category, 5);
        // Untouched sections keep their defaults.
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_env_overrides_take_priority() {
        temp_env::with_vars(
            [
                ("LEVELSET_DATABASE__PATH", Some("/tmp/test.db")),
                ("LEVELSET_GENERATION__DEADLINE_SECS", Some("10")),
            ],
            || {
                let config = ConfigLoader::load().unwrap();
                assert_eq!(config.database.path, "/tmp/test.db");
                assert_eq!(config.generation.deadline_secs, 10);
            },
        );
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = Config {
            logging: crate::domain::models::LoggingConfig {
                level: "verbose".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogLevel(_)
        ));
    }
}
