//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/chatlens/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/chatlens/` (~/.config/chatlens/)
//! - State/Logs: `$XDG_STATE_HOME/chatlens/` (~/.local/state/chatlens/)
//!
//! API keys may live in the config file or in the environment
//! (`YOUTUBE_API_KEY`, `ANTHROPIC_API_KEY`, `OPENAI_API_KEY`). The config file
//! wins when both are set.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the YouTube Data API key
pub const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Returns the value of an env var, treating empty strings as unset.
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// YouTube Data API configuration
    #[serde(default)]
    pub youtube: YoutubeConfig,

    /// Completion service configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// YouTube Data API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct YoutubeConfig {
    /// API key (can also use `YOUTUBE_API_KEY`)
    pub api_key: Option<String>,

    /// Base URL of the Data API
    #[serde(default = "default_youtube_endpoint")]
    pub endpoint: String,

    /// Fixed pause between page requests, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// HTTP request timeout in seconds (transport default when unset)
    pub timeout_secs: Option<u64>,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_youtube_endpoint(),
            page_delay_ms: default_page_delay_ms(),
            timeout_secs: None,
        }
    }
}

impl YoutubeConfig {
    /// Resolve the chat API key from config, then the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| non_empty_env(YOUTUBE_API_KEY_ENV))
    }

    /// Like [`resolve_api_key`](Self::resolve_api_key) but fails with
    /// [`Error::MissingCredential`].
    pub fn require_api_key(&self) -> Result<String> {
        self.resolve_api_key().ok_or_else(|| {
            Error::MissingCredential(format!(
                "YouTube API key required; set youtube.api_key or {}",
                YOUTUBE_API_KEY_ENV
            ))
        })
    }
}

fn default_youtube_endpoint() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_page_delay_ms() -> u64 {
    1000
}

/// Completion service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Provider type
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model to use
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// API endpoint (optional, uses default for provider)
    pub endpoint: Option<String>,
    /// API key (can also use the provider's env var)
    pub api_key: Option<String>,
    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// HTTP request timeout in seconds (transport default when unset)
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_llm_model(),
            endpoint: None,
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    /// Resolve the completion API key from config, then the provider env var.
    ///
    /// Always `None` for providers that do not take a key.
    pub fn resolve_api_key(&self) -> Option<String> {
        let env_var = self.provider.api_key_env()?;
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| non_empty_env(env_var))
    }

    /// Check that the provider's API key is available.
    ///
    /// Returns the key (or `None` for keyless providers), or
    /// [`Error::MissingCredential`] when a required key is absent.
    pub fn require_api_key(&self) -> Result<Option<String>> {
        match self.provider.api_key_env() {
            None => Ok(None),
            Some(env_var) => self.resolve_api_key().map(Some).ok_or_else(|| {
                Error::MissingCredential(format!(
                    "{} API key not found; set llm.api_key or {}",
                    self.provider.as_str(),
                    env_var
                ))
            }),
        }
    }

    /// The endpoint to call: the configured one or the provider default.
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.provider.default_endpoint().to_string())
    }
}

fn default_llm_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.3
}

/// Supported LLM providers
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Ollama,
    #[default]
    Claude,
    OpenAI,
}

impl LlmProvider {
    /// Returns the default endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "http://localhost:11434",
            LlmProvider::Claude => "https://api.anthropic.com",
            LlmProvider::OpenAI => "https://api.openai.com",
        }
    }

    /// Environment variable holding this provider's key, if it needs one
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            LlmProvider::Ollama => None,
            LlmProvider::Claude => Some("ANTHROPIC_API_KEY"),
            LlmProvider::OpenAI => Some("OPENAI_API_KEY"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "ollama",
            LlmProvider::Claude => "claude",
            LlmProvider::OpenAI => "openai",
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/chatlens/config.toml` (~/.config/chatlens/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("chatlens").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/chatlens/` (~/.local/state/chatlens/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("chatlens")
    }
}
