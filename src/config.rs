//! Runtime configuration resolved from environment variables.

use std::path::PathBuf;

use thiserror::Error;

/// Default Gemini REST endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Candidate models in preference order.
pub const DEFAULT_MODELS: [&str; 3] =
    ["gemini-2.5-flash", "models/gemini-2.5-flash", "gemini-2.0-flash-exp"];

/// Environment variable names read by [`Config::from_env`].
pub mod env_vars {
    /// API credential for the Gemini API.
    pub const API_KEY: &str = "GEMINI_API_KEY";
    /// Credential name used by the web build; accepted as a fallback.
    pub const LEGACY_API_KEY: &str = "VITE_GEMINI_API_KEY";
    /// Override for the API base URL.
    pub const BASE_URL: &str = "GEMINI_BASE_URL";
    /// Comma-separated candidate model list.
    pub const MODELS: &str = "TASKSPARK_MODELS";
    /// Directory to record cassettes into.
    pub const RECORD: &str = "TASKSPARK_RECORD";
}

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that cannot be used.
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Resolved configuration for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Gemini API key, if one is configured.
    pub api_key: Option<String>,
    /// Base URL of the generation API.
    pub base_url: String,
    /// Candidate models tried in order.
    pub models: Vec<String>,
    /// When set, port interactions are recorded under this directory.
    pub record_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GEMINI_API_BASE.to_string(),
            models: DEFAULT_MODELS.iter().map(ToString::to_string).collect(),
            record_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `GEMINI_BASE_URL` is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `GEMINI_BASE_URL` is not an http(s) URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty =
            |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty(env_vars::API_KEY).or_else(|| non_empty(env_vars::LEGACY_API_KEY));

        let base_url = match non_empty(env_vars::BASE_URL) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_string()
            }
            Some(url) => {
                return Err(ConfigError::InvalidValue(
                    env_vars::BASE_URL.to_string(),
                    format!("expected an http(s) URL, got {url:?}"),
                ))
            }
            None => GEMINI_API_BASE.to_string(),
        };

        let models = non_empty(env_vars::MODELS)
            .map(|raw| parse_models(&raw))
            .filter(|models| !models.is_empty())
            .unwrap_or_else(|| DEFAULT_MODELS.iter().map(ToString::to_string).collect());

        let record_dir = non_empty(env_vars::RECORD).map(PathBuf::from);

        Ok(Self { api_key, base_url, models, record_dir })
    }
}

fn parse_models(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|m| !m.is_empty()).map(String::from).collect()
}
