//! Configuration loading for council
//!
//! Resolution precedence, highest to lowest:
//!
//! 1. CLI flag overrides (`--models`, `--chairman`)
//! 2. Environment (`OPENROUTER_API_KEY`)
//! 3. Config file (`~/.council.yaml`, or an explicit `--config` path)
//! 4. Built-in defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default council lineup, reviewed as new model generations ship.
pub const DEFAULT_COUNCIL_MODELS: &[&str] = &[
    "openai/gpt-5.2-codex",
    "openai/gpt-5.2-pro",
    "google/gemini-3-pro-preview",
    "anthropic/claude-opus-4.6",
];

/// Default chairman model
pub const DEFAULT_CHAIRMAN_MODEL: &str = "anthropic/claude-opus-4.6";

/// Default OpenRouter API endpoint
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default per-call timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 120.0;

/// Environment variable holding the OpenRouter API key
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Config file name looked up in the home directory
const CONFIG_FILE_NAME: &str = ".council.yaml";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    InvalidYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error(
        "API key required. Set the {API_KEY_ENV} environment variable \
         or add api_key to ~/{CONFIG_FILE_NAME}"
    )]
    MissingApiKey,

    #[error("at least one council model is required")]
    EmptyCouncil,

    #[error("chairman model is required")]
    MissingChairman,

    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone, PartialEq)]
pub struct CouncilConfig {
    pub api_key: String,
    pub council_models: Vec<String>,
    pub chairman_model: String,
    pub api_url: String,
    pub timeout: Duration,
}

/// Values that outrank the config file, typically from CLI flags
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file path (skips home-directory discovery)
    pub config_path: Option<PathBuf>,
    /// Council model list override
    pub council_models: Option<Vec<String>>,
    /// Chairman model override
    pub chairman_model: Option<String>,
}

/// On-disk YAML shape; every key optional, unknown keys ignored
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_key: Option<String>,
    council_models: Option<Vec<String>>,
    chairman_model: Option<String>,
    api_url: Option<String>,
    timeout: Option<f64>,
}

/// Load configuration, applying the documented precedence.
///
/// # Errors
///
/// Returns `ConfigError` if the config file exists but cannot be read or
/// parsed, or if the resolved configuration fails validation (missing API
/// key, empty council, missing chairman, non-positive timeout).
pub fn load_config(overrides: &ConfigOverrides) -> Result<CouncilConfig, ConfigError> {
    let path = overrides
        .config_path
        .clone()
        .or_else(|| dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME)));

    let file = match path.as_deref() {
        Some(path) if path.exists() => read_config_file(path)?,
        _ => ConfigFile::default(),
    };

    // Defaults, then file values
    let mut api_key = file.api_key;
    let mut council_models = file
        .council_models
        .unwrap_or_else(|| DEFAULT_COUNCIL_MODELS.iter().map(ToString::to_string).collect());
    let mut chairman_model = file
        .chairman_model
        .unwrap_or_else(|| DEFAULT_CHAIRMAN_MODEL.to_string());
    let api_url = file.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let timeout_secs = file.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);

    // Environment outranks the file
    if let Ok(env_key) = std::env::var(API_KEY_ENV)
        && !env_key.is_empty()
    {
        api_key = Some(env_key);
    }

    // CLI outranks everything
    if let Some(models) = overrides.council_models.clone() {
        council_models = models;
    }
    if let Some(chairman) = overrides.chairman_model.clone() {
        chairman_model = chairman;
    }

    let api_key = api_key.filter(|k| !k.is_empty()).ok_or(ConfigError::MissingApiKey)?;
    if council_models.is_empty() {
        return Err(ConfigError::EmptyCouncil);
    }
    if chairman_model.is_empty() {
        return Err(ConfigError::MissingChairman);
    }
    if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
        return Err(ConfigError::InvalidTimeout(timeout_secs));
    }

    Ok(CouncilConfig {
        api_key,
        council_models,
        chairman_model,
        api_url,
        timeout: Duration::from_secs_f64(timeout_secs),
    })
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::InvalidYaml {
        path: path.to_path_buf(),
        source,
    })
}
