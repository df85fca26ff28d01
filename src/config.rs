//! Configuration for Socratis
//!
//! Provides configuration parsing and validation for the model client,
//! highlight resolution, and theme adherence.
//!
//! # Configuration File Format
//!
//! TOML format, usually `socratis.toml`:
//!
//! ```toml
//! [llm]
//! provider = "openai"
//! model = "gpt-4o"
//! max_tokens = 4000
//! temperature = 0.7
//! timeout = 120
//!
//! [highlights]
//! limit = 25
//!
//! [theme]
//! deviation_threshold = 30.0
//! min_keyword_chars = 4
//! ```
//!
//! API keys never live in the file: they are read from `ANTHROPIC_API_KEY`
//! or `OPENAI_API_KEY` depending on the provider.

use crate::services::llm::{LlmConfig, LlmProvider};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

/// Complete Socratis configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocratisConfig {
    /// Model client settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Highlight resolution settings
    #[serde(default)]
    pub highlights: HighlightConfig,

    /// Theme adherence settings
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Highlight resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Maximum number of highlight spans in a report
    #[serde(default = "default_highlight_limit")]
    pub limit: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            limit: default_highlight_limit(),
        }
    }
}

fn default_highlight_limit() -> usize {
    25
}

/// Theme adherence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Adherence (0-100) below which the essay is flagged as off-theme
    #[serde(default = "default_deviation_threshold")]
    pub deviation_threshold: f64,

    /// Minimum length, in characters, for a theme word to count as a keyword
    #[serde(default = "default_min_keyword_chars")]
    pub min_keyword_chars: usize,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            deviation_threshold: default_deviation_threshold(),
            min_keyword_chars: default_min_keyword_chars(),
        }
    }
}

fn default_deviation_threshold() -> f64 {
    30.0
}

fn default_min_keyword_chars() -> usize {
    4
}

impl SocratisConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: SocratisConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SOCRATIS_*` environment overrides and pick up the provider API key
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(provider) = env::var("SOCRATIS_LLM_PROVIDER") {
            self.llm.provider = provider.parse()?;
            debug!("LLM provider overridden from environment: {}", self.llm.provider);
        }
        if let Ok(model) = env::var("SOCRATIS_LLM_MODEL") {
            if !model.is_empty() {
                self.llm.model = model;
            }
        }
        match env::var(self.llm.provider.api_key_var()) {
            Ok(key) if !key.is_empty() => self.llm.api_key = key,
            _ => debug!(
                "{} not set, keeping configured API key",
                self.llm.provider.api_key_var()
            ),
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.highlights.limit == 0 {
            return Err(ConfigError::ValidationError(
                "highlights.limit must be at least 1".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.theme.deviation_threshold) {
            return Err(ConfigError::ValidationError(
                "theme.deviation_threshold must be between 0 and 100".to_string(),
            ));
        }

        if self.theme.min_keyword_chars == 0 {
            return Err(ConfigError::ValidationError(
                "theme.min_keyword_chars must be at least 1".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.max_tokens must be positive".to_string(),
            ));
        }

        if self.llm.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "llm.timeout must be at least 1 second".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" => Ok(LlmProvider::Anthropic),
            "openai" => Ok(LlmProvider::OpenAi),
            other => Err(ConfigError::ValidationError(format!(
                "unknown LLM provider '{}' (expected 'anthropic' or 'openai')",
                other
            ))),
        }
    }
}
