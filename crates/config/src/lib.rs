//! Configuration loading, validation, and management for talker.
//!
//! Loads configuration from `~/.talker/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use talker_core::event::DEFAULT_FALLBACK_ACTION;
use talker_core::generator::GenerationParams;
use talker_core::token::TokenId;

/// The root configuration structure.
///
/// Maps directly to `~/.talker/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model and tokenizer selection
    #[serde(default)]
    pub model: ModelConfig,

    /// Context window settings
    #[serde(default)]
    pub context: ContextConfig,

    /// Options forwarded to the model's search
    #[serde(default)]
    pub generation: GenerationParams,

    /// Fallback action settings
    #[serde(default)]
    pub fallback: FallbackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Preset alias (`smollm:135m`, `tinyllama`, …) or a path to a `.gguf` file
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Explicit `tokenizer.json`; otherwise taken from the preset or the GGUF's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer_path: Option<PathBuf>,

    /// Compute device; only `cpu` is supported
    #[serde(default = "default_device")]
    pub device: String,
}

fn default_model_name() -> String {
    "smollm:135m".into()
}
fn default_device() -> String {
    "cpu".into()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            tokenizer_path: None,
            device: default_device(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum tokens handed to the model
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,

    /// Text placed between utterances
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Id of the separator token; resolved from the tokenizer when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_marker: Option<TokenId>,
}

fn default_max_context_length() -> usize {
    128
}
fn default_separator() -> String {
    "    ".into()
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_context_length: default_max_context_length(),
            separator: default_separator(),
            boundary_marker: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Action name that marks a fallback in the event log
    #[serde(default = "default_action_name")]
    pub action_name: String,

    /// Opening user utterance for the interactive shell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

fn default_action_name() -> String {
    DEFAULT_FALLBACK_ACTION.into()
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            action_name: default_action_name(),
            greeting: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.talker/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `TALKER_MODEL`
    /// - `TALKER_MAX_CONTEXT_LENGTH`
    /// - `TALKER_FALLBACK_ACTION`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
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

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("TALKER_MODEL") {
            self.model.name = model;
        }

        if let Some(raw) = lookup("TALKER_MAX_CONTEXT_LENGTH") {
            self.context.max_context_length = raw.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "TALKER_MAX_CONTEXT_LENGTH must be a positive integer, got '{raw}'"
                ))
            })?;
        }

        if let Some(action) = lookup("TALKER_FALLBACK_ACTION") {
            self.fallback.action_name = action;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".talker")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.context.max_context_length == 0 {
            return Err(ConfigError::ValidationError(
                "context.max_context_length must be at least 1".into(),
            ));
        }

        if self.context.separator.is_empty() {
            return Err(ConfigError::ValidationError(
                "context.separator must not be empty".into(),
            ));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.generation.num_beams == 0 {
            return Err(ConfigError::ValidationError(
                "generation.num_beams must be at least 1".into(),
            ));
        }

        if self.fallback.action_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "fallback.action_name must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `config` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
