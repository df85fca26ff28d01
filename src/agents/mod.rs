//! Analysis agents
//!
//! Each agent is a prompt plus an output type. `AgentRunner` owns the
//! model client and turns an agent and an essay into a validated reply:
//!
//! ```ignore
//! let runner = AgentRunner::new(client, Duration::from_secs(120));
//! let reply = runner.run(&GrammarAgent, &context).await?;
//! println!("{}", reply.output.score);
//! ```

pub mod evaluator;
pub mod grammar;
pub mod logic;
pub mod premium;
pub mod prompts;
pub mod structure;

pub use evaluator::EvaluatorAgent;
pub use grammar::GrammarAgent;
pub use logic::LogicAgent;
pub use premium::{RepertoireAgent, RewriteAgent, SocraticAgent};
pub use structure::StructureAgent;

use crate::error::{Result, SocratisError};
use crate::services::{parse_model_json, GenerationRequest, ModelClient};
use crate::types::{EssayKind, EssaySubmission};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Structural checks on a parsed agent reply
pub trait ValidateOutput {
    /// Describe the first violation, if any
    fn validate(&self) -> std::result::Result<(), String>;
}

/// An analysis agent: what to ask the model and what shape to expect back
pub trait Agent: Send + Sync {
    type Output: DeserializeOwned + ValidateOutput + Send;

    fn name(&self) -> &'static str;

    fn system_prompt(&self) -> &'static str;

    /// Task appended after the essay in the user prompt
    fn instruction(&self, context: &EssayContext) -> String;

    fn temperature(&self) -> f32;
}

/// Scores from agents that already ran, fed to the evaluator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriorScores {
    pub grammar: Option<f32>,
    pub logic: Option<f32>,
    pub structure: Option<f32>,
}

impl PriorScores {
    pub fn is_empty(&self) -> bool {
        self.grammar.is_none() && self.logic.is_none() && self.structure.is_none()
    }
}

/// Everything an agent may look at
#[derive(Debug, Clone, Default)]
pub struct EssayContext {
    pub text: String,
    pub theme: String,
    pub kind: EssayKind,
    pub expected_references: Vec<String>,
    pub prior_scores: PriorScores,
}

impl EssayContext {
    pub fn from_submission(submission: &EssaySubmission) -> Self {
        Self {
            text: submission.text.clone(),
            theme: submission.theme.clone(),
            kind: submission.kind,
            expected_references: submission.expected_references.clone(),
            prior_scores: PriorScores::default(),
        }
    }

    pub fn with_prior_scores(mut self, prior_scores: PriorScores) -> Self {
        self.prior_scores = prior_scores;
        self
    }
}

/// A validated agent output with the tokens it cost
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply<T> {
    pub output: T,
    pub tokens_used: Option<u64>,
}

/// Runs agents against a model client with a per-call timeout
#[derive(Clone)]
pub struct AgentRunner {
    client: Arc<dyn ModelClient>,
    timeout: Duration,
}

impl AgentRunner {
    pub fn new(client: Arc<dyn ModelClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the request an agent would send for `context`
    pub fn request_for<A: Agent>(&self, agent: &A, context: &EssayContext) -> GenerationRequest {
        GenerationRequest {
            system_prompt: agent.system_prompt().to_string(),
            user_prompt: format!(
                "{}\n\n{}",
                prompts::format_essay_prompt(&context.theme, &context.text),
                agent.instruction(context)
            ),
            temperature: Some(agent.temperature()),
            max_tokens: None,
            json_mode: true,
        }
    }

    /// Run one agent to completion
    pub async fn run<A: Agent>(&self, agent: &A, context: &EssayContext) -> Result<AgentReply<A::Output>> {
        let request = self.request_for(agent, context);
        let started = Instant::now();
        info!("Running {} agent", agent.name());

        let response = tokio::time::timeout(self.timeout, self.client.generate(&request))
            .await
            .map_err(|_| SocratisError::LlmTimeout {
                agent: agent.name().to_string(),
                seconds: self.timeout.as_secs(),
            })??;

        debug!(
            "{} agent replied with {} bytes ({:?} tokens)",
            agent.name(),
            response.text.len(),
            response.tokens_used
        );

        let output: A::Output = parse_model_json(agent.name(), &response.text)?;
        output
            .validate()
            .map_err(|reason| SocratisError::InvalidResponse {
                agent: agent.name().to_string(),
                reason,
            })?;

        info!(
            "{} agent finished in {:.2}s",
            agent.name(),
            started.elapsed().as_secs_f64()
        );

        Ok(AgentReply {
            output,
            tokens_used: response.tokens_used,
        })
    }
}

/// Check that a score lies in `[0, max]`
pub(crate) fn check_range<T>(field: &str, value: T, max: T) -> std::result::Result<(), String>
where
    T: PartialOrd + Default + std::fmt::Display + Copy,
{
    if (T::default()..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be between 0 and {} (got {})", field, max, value))
    }
}

/// Upper bound for 0-10 agent scores
pub(crate) const MAX_AGENT_SCORE: f32 = 10.0;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ModelResponse;
    use crate::types::GrammarAnalysis;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: String,
        delay: Duration,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedClient {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn generate(&self, request: &GenerationRequest) -> Result<ModelResponse> {
            self.seen.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(ModelResponse {
                text: self.reply.clone(),
                tokens_used: Some(42),
                model: "scripted".to_string(),
            })
        }
    }

    fn context() -> EssayContext {
        EssayContext {
            text: "A educação é importante.".to_string(),
            theme: "Educação".to_string(),
            ..Default::default()
        }
    }

    const GRAMMAR_REPLY: &str = r#"```json
{"nota": 8.5, "total_erros": 0, "erros": [], "feedback_geral": "Bom"}
```"#;

    #[tokio::test]
    async fn test_run_parses_fenced_reply() {
        let client = Arc::new(ScriptedClient::new(GRAMMAR_REPLY));
        let runner = AgentRunner::new(client.clone(), Duration::from_secs(5));

        let reply: AgentReply<GrammarAnalysis> = runner.run(&GrammarAgent, &context()).await.unwrap();

        assert_eq!(reply.output.score, 8.5);
        assert_eq!(reply.tokens_used, Some(42));

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].json_mode);
        assert_eq!(seen[0].temperature, Some(0.3));
        assert!(seen[0].user_prompt.starts_with("TEMA: Educação\n\nTEXTO DA REDAÇÃO:\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let mut client = ScriptedClient::new(GRAMMAR_REPLY);
        client.delay = Duration::from_secs(600);
        let runner = AgentRunner::new(Arc::new(client), Duration::from_secs(120));

        let err = runner.run(&GrammarAgent, &context()).await.unwrap_err();

        match err {
            SocratisError::LlmTimeout { agent, seconds } => {
                assert_eq!(agent, "grammar");
                assert_eq!(seconds, 120);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_rejects_out_of_range_score() {
        let client = Arc::new(ScriptedClient::new(
            r#"{"nota": 14, "total_erros": 0, "feedback_geral": "?"}"#,
        ));
        let runner = AgentRunner::new(client, Duration::from_secs(5));

        let err = runner.run(&GrammarAgent, &context()).await.unwrap_err();
        assert!(matches!(err, SocratisError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_run_rejects_non_json() {
        let client = Arc::new(ScriptedClient::new("Desculpe, não posso ajudar."));
        let runner = AgentRunner::new(client, Duration::from_secs(5));

        let err = runner.run(&GrammarAgent, &context()).await.unwrap_err();
        assert!(matches!(err, SocratisError::InvalidResponse { agent, .. } if agent == "grammar"));
    }

    #[test]
    fn test_check_range() {
        assert!(check_range("nota", 0.0_f32, 10.0).is_ok());
        assert!(check_range("nota", 10.0_f32, 10.0).is_ok());
        assert!(check_range("nota", -0.5_f32, 10.0).is_err());
        assert!(check_range("nota", f32::NAN, 10.0).is_err());
        assert!(check_range("nota_enem", 1001_u16, 1000).is_err());
    }
}
