//! Configuration loading, validation, and management for Gigmate.
//!
//! Loads configuration from `~/.gigmate/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to `~/.gigmate/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Marketplace backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Generative-model connection
    #[serde(default)]
    pub model: ModelConfig,

    /// Session store settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// User-context refresh settings
    #[serde(default)]
    pub context: ContextConfig,

    /// Capability retry settings
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend", &self.backend)
            .field("model", &self.model)
            .field("session", &self.session)
            .field("cache", &self.cache)
            .field("context", &self.context)
            .field("retry", &self.retry)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the marketplace REST backend
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Bearer token for authenticated endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// When true, capabilities return canned fixture data (no network)
    #[serde(default)]
    pub mock: bool,
}

fn default_backend_url() -> String {
    "http://localhost:5000".into()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            api_token: None,
            mock: false,
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &redact(&self.api_token))
            .field("mock", &self.mock)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible completions endpoint
    #[serde(default = "default_model_url")]
    pub base_url: String,

    /// API key for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_model_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.2
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_model_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum turns retained per session (oldest dropped first)
    #[serde(default = "default_max_history")]
    pub max_history_length: usize,
}

fn default_max_history() -> usize {
    20
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history_length: default_max_history(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,

    /// Maximum cached entries before eviction
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

fn default_cache_ttl() -> u64 {
    300
}
fn default_cache_capacity() -> usize {
    100
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum age of cached user context before mandatory refresh
    #[serde(default = "default_staleness")]
    pub staleness_secs: u64,
}

fn default_staleness() -> u64 {
    3600
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            staleness_secs: default_staleness(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total capability attempts (initial + retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay between attempts; scales linearly with attempt index
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_base_delay_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.gigmate/config.toml).
    ///
    /// Environment variable overrides (highest priority):
    /// - `GIGMATE_BACKEND_URL`
    /// - `GIGMATE_API_TOKEN`
    /// - `GIGMATE_MODEL_API_KEY` (falls back to `OPENAI_API_KEY`)
    /// - `GIGMATE_MOCK` ("1"/"true" enables mock mode)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(url) = std::env::var("GIGMATE_BACKEND_URL") {
            config.backend.base_url = url;
        }

        if config.backend.api_token.is_none() {
            config.backend.api_token = std::env::var("GIGMATE_API_TOKEN").ok();
        }

        if config.model.api_key.is_none() {
            config.model.api_key = std::env::var("GIGMATE_MODEL_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(mock) = std::env::var("GIGMATE_MOCK") {
            config.backend.mock = matches!(mock.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".gigmate")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.temperature < 0.0 || self.model.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "model.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.session.max_history_length == 0 {
            return Err(ConfigError::ValidationError(
                "session.max_history_length must be at least 1".into(),
            ));
        }

        if self.cache.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "cache.capacity must be at least 1".into(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.max_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            model: ModelConfig::default(),
            session: SessionConfig::default(),
            cache: CacheConfig::default(),
            context: ContextConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

fn dirs_home() -> PathBuf {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
