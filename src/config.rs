//! Configuration management for camel_roleplay.
//!
//! Configuration can be set via environment variables:
//! - `OPENAI_BASE_URL` - Optional. Chat-completions API root. Defaults to `https://api.openai.com/v1`.
//! - `CAMEL_MODEL` - Optional. Model for every agent. Defaults to `gpt-3.5-turbo`.
//! - `CAMEL_TURN_LIMIT` - Optional. Maximum rounds per simulation. Defaults to `5`.
//! - `CAMEL_WORD_LIMIT` - Optional. Word bound for the specified task. Defaults to `25`.
//! - `CAMEL_REQUEST_TIMEOUT_SECS` - Optional. Per-request timeout. Defaults to `120`.
//!
//! The API key is not part of `Config`; it is one of the simulation inputs
//! (`OPENAI_API_KEY` or `--api-key` on the command line).

use std::time::Duration;

use thiserror::Error;

use crate::agents::DEFAULT_WORD_LIMIT;
use crate::llm::DEFAULT_BASE_URL;
use crate::simulation::DEFAULT_TURN_LIMIT;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Simulation configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API root of an OpenAI-compatible endpoint
    pub base_url: String,

    /// Model identifier used by the specifier and both role agents
    pub model: String,

    /// Maximum number of rounds
    pub turn_limit: usize,

    /// Word bound given to the task specifier
    pub word_limit: usize,

    /// Timeout for each model request
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            turn_limit: DEFAULT_TURN_LIMIT,
            word_limit: DEFAULT_WORD_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable does not
    /// parse or a limit is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = lookup("CAMEL_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let turn_limit = parse_positive(&lookup, "CAMEL_TURN_LIMIT", DEFAULT_TURN_LIMIT)?;
        let word_limit = parse_positive(&lookup, "CAMEL_WORD_LIMIT", DEFAULT_WORD_LIMIT)?;
        let timeout_secs = parse_positive(
            &lookup,
            "CAMEL_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS as usize,
        )?;

        Ok(Self {
            base_url,
            model,
            turn_limit,
            word_limit,
            request_timeout: Duration::from_secs(timeout_secs as u64),
        })
    }

    /// Override the turn limit, rejecting zero.
    pub fn with_turn_limit(mut self, turn_limit: usize) -> Result<Self, ConfigError> {
        if turn_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "turn limit".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        self.turn_limit = turn_limit;
        Ok(self)
    }
}

fn parse_positive<F>(lookup: &F, name: &str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e)))?;
    if value == 0 {
        return Err(ConfigError::InvalidValue(
            name.to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(value)
}
