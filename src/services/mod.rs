//! Services layer for Socratis
//!
//! Provides LLM integration and tolerant handling of model JSON replies.

pub mod json;
pub mod llm;

pub use json::{extract_json_payload, parse_model_json, sanitize_text, strip_control_chars};
pub use llm::{GenerationRequest, LlmConfig, LlmProvider, LlmService, ModelClient, ModelResponse};
