//! Socratis - Multi-Agent Essay Grading
//!
//! Grades Portuguese essays with a set of LLM agents and anchors their
//! findings to exact spans of the essay text:
//! - Grammar, logic, structure, repertoire, rewrite and Socratic agents
//! - A final evaluator that weighs the other agents' scores
//! - Fuzzy excerpt location and non-overlapping highlights
//! - Keyword-overlap theme adherence
//!
//! # Architecture
//!
//! - **Types**: submissions, agent outputs and the full report
//! - **Highlight**: synchronous span resolution over borrowed text
//! - **Services**: LLM providers and model-reply JSON handling
//! - **Agents**: prompts, output validation and the agent runner
//! - **Orchestration**: plan-gated execution of the agents for one essay
//!
//! # Example
//!
//! ```ignore
//! use socratis_core::{EssaySubmission, Orchestrator, Plan, SocratisConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SocratisConfig::from_file("socratis.toml".as_ref())?.with_env_overrides()?;
//!     let orchestrator = Orchestrator::from_config(&config)?;
//!
//!     let submission: EssaySubmission = serde_json::from_str(&std::fs::read_to_string("redacao.json")?)?;
//!     let analysis = orchestrator.analyze(&submission, Plan::Premium, "redacao-1").await?;
//!
//!     for span in &analysis.highlights {
//!         println!("{}..{} {}", span.start, span.end, &analysis.text[span.range()]);
//!     }
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod config;
pub mod error;
pub mod highlight;
pub mod orchestration;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, SocratisConfig};
pub use error::{Result, SocratisError};
pub use highlight::{
    paragraph_spans, Finding, FindingCategory, HighlightBatch, HighlightEngine, HighlightSpan,
    ThemeAdherence, ThemeEstimator,
};
pub use orchestration::Orchestrator;
pub use services::{LlmConfig, LlmProvider, LlmService, ModelClient};
pub use types::{EssayKind, EssaySubmission, FullAnalysis, Plan};
