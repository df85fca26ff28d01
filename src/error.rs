//! Error types for the Socratis grading system
//!
//! This module provides error handling using thiserror for structured
//! error definitions and anyhow for error propagation at the binary edge.
//!
//! Data-quality problems in model output (an excerpt that cannot be found,
//! a finding without an excerpt) are not errors: the highlight engine
//! reports them as skipped items instead.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for Socratis operations
#[derive(Error, Debug)]
pub enum SocratisError {
    /// LLM API request failed
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM call did not finish within the configured timeout
    #[error("LLM call for agent '{agent}' timed out after {seconds}s")]
    LlmTimeout { agent: String, seconds: u64 },

    /// Model reply could not be parsed or failed structural validation
    #[error("Invalid response from agent '{agent}': {reason}")]
    InvalidResponse { agent: String, reason: String },

    /// Essay submission rejected before analysis
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// Caller violated an API contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Socratis operations
pub type Result<T> = std::result::Result<T, SocratisError>;

/// Convert anyhow::Error to SocratisError
impl From<anyhow::Error> for SocratisError {
    fn from(err: anyhow::Error) -> Self {
        SocratisError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SocratisError::LlmTimeout {
            agent: "gramatico".to_string(),
            seconds: 120,
        };
        assert_eq!(
            err.to_string(),
            "LLM call for agent 'gramatico' timed out after 120s"
        );
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid");
        assert!(json_err.is_err());

        let err: SocratisError = json_err.unwrap_err().into();
        assert!(matches!(err, SocratisError::Serialization(_)));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: SocratisError = ConfigError::ValidationError("bad".to_string()).into();
        assert!(err.to_string().contains("Invalid configuration: bad"));
    }
}
