//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `COFOUND_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_CONTEXT_SIZE, DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_RESULTS};

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `COFOUND_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for persisted per-user state. Default: `./.data`.
    pub storage_path: PathBuf,

    /// Base URL of an OpenAI-compatible embedding service.
    ///
    /// When unset the hashed stub provider is used.
    pub embedding_url: Option<String>,

    /// Model name sent to the embedding service. Default: `all-MiniLM-L6-v2`.
    pub embedding_model: String,

    /// Embedding dimension D. Default: `384`.
    pub embedding_dim: usize,

    /// Per-request timeout for the embedding service. Default: 30 seconds.
    pub embedding_timeout: Duration,

    /// Max entries in the embedding memo cache. Default: `10_000`.
    pub embedding_cache_capacity: u64,

    /// Number of most recent swipes the learner considers. Default: `50`.
    pub context_size: usize,

    /// Hard cap on recommendations per request. Default: `3`.
    pub max_results: usize,

    /// Max profiles vectorized concurrently. Default: `8`.
    pub embed_concurrency: usize,

    /// Drop candidates that carry no id. Default: `true`.
    pub strict_candidate_ids: bool,
}

/// Default embedding model name used when `COFOUND_EMBEDDING_MODEL` is not set.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./.data"),
            embedding_url: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            embedding_timeout: Duration::from_secs(30),
            embedding_cache_capacity: 10_000,
            context_size: DEFAULT_CONTEXT_SIZE,
            max_results: DEFAULT_MAX_RESULTS,
            embed_concurrency: 8,
            strict_candidate_ids: true,
        }
    }
}

impl Config {
    const ENV_STORAGE_PATH: &'static str = "COFOUND_STORAGE_PATH";
    const ENV_EMBEDDING_URL: &'static str = "COFOUND_EMBEDDING_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "COFOUND_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIM: &'static str = "COFOUND_EMBEDDING_DIM";
    const ENV_EMBEDDING_TIMEOUT_SECS: &'static str = "COFOUND_EMBEDDING_TIMEOUT_SECS";
    const ENV_EMBEDDING_CACHE_CAPACITY: &'static str = "COFOUND_EMBEDDING_CACHE_CAPACITY";
    const ENV_CONTEXT_SIZE: &'static str = "COFOUND_CONTEXT_SIZE";
    const ENV_MAX_RESULTS: &'static str = "COFOUND_MAX_RESULTS";
    const ENV_EMBED_CONCURRENCY: &'static str = "COFOUND_EMBED_CONCURRENCY";
    const ENV_STRICT_CANDIDATE_IDS: &'static str = "COFOUND_STRICT_CANDIDATE_IDS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let embedding_url = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_URL);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_dim =
            Self::parse_positive_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let timeout_secs = Self::parse_positive_from_env(
            Self::ENV_EMBEDDING_TIMEOUT_SECS,
            defaults.embedding_timeout.as_secs(),
        )?;
        let embedding_cache_capacity = Self::parse_number_from_env(
            Self::ENV_EMBEDDING_CACHE_CAPACITY,
            defaults.embedding_cache_capacity,
        )?;
        let context_size =
            Self::parse_positive_from_env(Self::ENV_CONTEXT_SIZE, defaults.context_size)?;
        let max_results =
            Self::parse_positive_from_env(Self::ENV_MAX_RESULTS, defaults.max_results)?;
        let embed_concurrency =
            Self::parse_positive_from_env(Self::ENV_EMBED_CONCURRENCY, defaults.embed_concurrency)?;
        let strict_candidate_ids =
            Self::parse_bool_from_env(Self::ENV_STRICT_CANDIDATE_IDS, defaults.strict_candidate_ids)?;

        Ok(Self {
            storage_path,
            embedding_url,
            embedding_model,
            embedding_dim,
            embedding_timeout: Duration::from_secs(timeout_secs),
            embedding_cache_capacity,
            context_size,
            max_results,
            embed_concurrency,
            strict_candidate_ids,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        let positive = [
            (Self::ENV_EMBEDDING_DIM, self.embedding_dim as u64),
            (
                Self::ENV_EMBEDDING_TIMEOUT_SECS,
                self.embedding_timeout.as_secs(),
            ),
            (Self::ENV_CONTEXT_SIZE, self.context_size as u64),
            (Self::ENV_MAX_RESULTS, self.max_results as u64),
            (Self::ENV_EMBED_CONCURRENCY, self.embed_concurrency as u64),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::MustBePositive { name });
        }

        if let Some(ref url) = self.embedding_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_URL,
                value: url.clone(),
                reason: "expected an http:// or https:// URL".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `true` when the hashed stub provider should be used.
    pub fn uses_stub_embedder(&self) -> bool {
        self.embedding_url.is_none()
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name: var_name,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_positive_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr + PartialEq + Default,
        T::Err: std::fmt::Display,
    {
        let value = Self::parse_number_from_env(var_name, default)?;
        if value == T::default() {
            return Err(ConfigError::MustBePositive { name: var_name });
        }
        Ok(value)
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: "expected a boolean".to_string(),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}
