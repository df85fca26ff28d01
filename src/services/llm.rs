//! LLM service for essay analysis agents
//!
//! Provides a `ModelClient` seam used by every agent, and `LlmService`,
//! an HTTP implementation for:
//! - Anthropic Messages API
//! - OpenAI Chat Completions API
//!
//! The client returns the raw reply text; agents are responsible for
//! extracting and validating the JSON payload.

use crate::config::ConfigError;
use crate::error::{Result, SocratisError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::debug;

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Suffix appended to prompts when the provider has no native JSON mode
const JSON_ONLY_SUFFIX: &str = "\n\nResponda APENAS com um JSON válido.";

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
}

impl LlmProvider {
    /// Environment variable holding the API key for this provider
    pub fn api_key_var(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
            LlmProvider::OpenAi => "OPENAI_API_KEY",
        }
    }

    fn default_url(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => ANTHROPIC_URL,
            LlmProvider::OpenAi => OPENAI_URL,
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Configuration for LLM service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model provider
    #[serde(default = "default_provider")]
    pub provider: LlmProvider,

    /// Model to use (default: gpt-4o)
    #[serde(default = "default_model")]
    pub model: String,

    /// Max tokens for responses
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature used when an agent does not set its own
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound for a single model call (in seconds)
    #[serde(default = "default_timeout", with = "serde_duration")]
    pub timeout: Duration,

    /// Override for the provider endpoint (proxies, tests)
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key, read from the environment and never serialized
    #[serde(skip)]
    pub api_key: String,
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAi
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

impl Default for LlmConfig {
    fn default() -> Self {
        let provider = default_provider();
        Self {
            provider,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout: default_timeout(),
            base_url: None,
            api_key: env::var(provider.api_key_var()).unwrap_or_default(),
        }
    }
}

// Serialize/deserialize Duration as whole seconds
mod serde_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// A single prompt sent to a model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the provider for a JSON object reply
    pub json_mode: bool,
}

/// Raw model reply with usage metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub text: String,
    pub tokens_used: Option<u64>,
    pub model: String,
}

/// Anything that can turn a prompt into a model reply
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelResponse>;
}

/// LLM service backed by a provider HTTP API
pub struct LlmService {
    config: LlmConfig,
    client: reqwest::Client,
}

/// Anthropic API message format
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Anthropic API response format
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}

/// OpenAI chat completion request format
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// OpenAI chat completion response format
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    total_tokens: u64,
}

impl LlmService {
    /// Create a new LLM service with custom config
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(SocratisError::Config(ConfigError::MissingCredential(
                format!("{} not set", config.provider.api_key_var()),
            )));
        }

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Create with default config
    pub fn with_default() -> Result<Self> {
        Self::new(LlmConfig::default())
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn endpoint(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.config.provider.default_url())
    }

    /// Make an API call to Anthropic
    async fn call_anthropic(&self, request: &GenerationRequest) -> Result<ModelResponse> {
        debug!("Calling Anthropic API");

        let user_prompt = if request.json_mode {
            format!("{}{}", request.user_prompt, JSON_ONLY_SUFFIX)
        } else {
            request.user_prompt.clone()
        };

        let body = AnthropicRequest {
            model: &self.config.model,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: request.temperature.unwrap_or(self.config.temperature),
            system: &request.system_prompt,
            messages: vec![Message {
                role: "user",
                content: &user_prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SocratisError::LlmApi(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| SocratisError::LlmApi(format!("Failed to parse response: {}", e)))?;

        let text: String = api_response
            .content
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        if text.trim().is_empty() {
            return Err(SocratisError::LlmApi("Empty response from API".to_string()));
        }

        Ok(ModelResponse {
            text,
            tokens_used: api_response
                .usage
                .map(|u| u.input_tokens + u.output_tokens),
            model: api_response
                .model
                .unwrap_or_else(|| self.config.model.clone()),
        })
    }

    /// Make an API call to OpenAI
    async fn call_openai(&self, request: &GenerationRequest) -> Result<ModelResponse> {
        debug!("Calling OpenAI API");

        let body = OpenAiRequest {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &request.system_prompt,
                },
                Message {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature.unwrap_or(self.config.temperature),
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SocratisError::LlmApi(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| SocratisError::LlmApi(format!("Failed to parse response: {}", e)))?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SocratisError::LlmApi("Empty response from API".to_string()))?;

        Ok(ModelResponse {
            text,
            tokens_used: api_response.usage.map(|u| u.total_tokens),
            model: api_response
                .model
                .unwrap_or_else(|| self.config.model.clone()),
        })
    }
}

#[async_trait]
impl ModelClient for LlmService {
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelResponse> {
        match self.config.provider {
            LlmProvider::Anthropic => self.call_anthropic(request).await,
            LlmProvider::OpenAi => self.call_openai(request).await,
        }
    }
}
