//! # configs
//!
//! Layered application configuration:
//! built-in defaults, then `.env` (if present), then `RUSTY_BLOG__*`
//! environment variables.

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "RUSTY_BLOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to read .env: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listen address for the HTTP server.
    pub bind_addr: String,
    /// `sqlite://path.db` or `sqlite::memory:`. Ignored by memory-only builds.
    pub database_url: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Loads `.env` into the process environment, then resolves the layers.
    /// A missing `.env` is fine; one that cannot be read or parsed is an error.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv_outcome(dotenvy::dotenv().map(|_| ()))?;
        Self::from_env(Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    /// Resolves defaults overlaid by the given environment source.
    pub fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .set_default("bind_addr", "127.0.0.1:8080")?
            .set_default("database_url", "sqlite://rusty_blog.db")?
            .set_default("log_format", "text")?
            .add_source(env)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_addr cannot be empty".into()));
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid("database_url cannot be empty".into()));
        }
        Ok(())
    }
}

fn dotenv_outcome(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Err(err) if !err.not_found() => Err(err.into()),
        _ => Ok(()),
    }
}
