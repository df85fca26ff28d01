//! Essay analysis orchestrator
//!
//! Order of work for one essay:
//! 1. sanitize and validate the submission
//! 2. grammar agent and theme adherence (every plan)
//! 3. logic, structure, repertoire, rewrite and Socratic agents
//!    concurrently (premium and B2B)
//! 4. evaluator, with the scores from the earlier agents
//! 5. highlights resolved over grammar errors and logic problems
//!
//! Any agent failure aborts the analysis.

use crate::agents::{
    AgentReply, AgentRunner, EssayContext, EvaluatorAgent, GrammarAgent, LogicAgent, PriorScores,
    RepertoireAgent, RewriteAgent, SocraticAgent, StructureAgent,
};
use crate::config::SocratisConfig;
use crate::error::Result;
use crate::highlight::{Anchor, HighlightEngine, ThemeEstimator};
use crate::services::{LlmService, ModelClient};
use crate::types::{
    EssaySubmission, FullAnalysis, LogicAnalysis, Plan, RepertoireAnalysis, RewriteSet,
    SocraticQuestions, StructuralAnalysis,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outputs of the premium agents
struct PremiumAnalyses {
    logic: AgentReply<LogicAnalysis>,
    structure: AgentReply<StructuralAnalysis>,
    repertoire: AgentReply<RepertoireAnalysis>,
    rewrites: AgentReply<RewriteSet>,
    socratic: AgentReply<SocraticQuestions>,
}

/// Coordinates agents, highlight resolution and theme estimation
pub struct Orchestrator {
    runner: AgentRunner,
    engine: HighlightEngine,
    estimator: ThemeEstimator,
}

impl Orchestrator {
    pub fn new(runner: AgentRunner, engine: HighlightEngine, estimator: ThemeEstimator) -> Self {
        Self {
            runner,
            engine,
            estimator,
        }
    }

    /// Build an orchestrator backed by the configured LLM provider
    pub fn from_config(config: &SocratisConfig) -> Result<Self> {
        let client: Arc<dyn ModelClient> = Arc::new(LlmService::new(config.llm.clone())?);
        Self::with_client(config, client)
    }

    /// Build an orchestrator around an existing model client
    pub fn with_client(config: &SocratisConfig, client: Arc<dyn ModelClient>) -> Result<Self> {
        Ok(Self::new(
            AgentRunner::new(client, config.llm.timeout),
            HighlightEngine::from_config(&config.highlights)?,
            ThemeEstimator::from_config(&config.theme),
        ))
    }

    /// Analyze one essay for a user on `plan`
    pub async fn analyze(
        &self,
        submission: &EssaySubmission,
        plan: Plan,
        essay_id: &str,
    ) -> Result<FullAnalysis> {
        let started = Instant::now();
        let submission = submission.sanitized();
        submission.validate()?;

        info!(
            "Analyzing essay {} ({} plan, kind {}, {} chars)",
            essay_id,
            plan,
            submission.kind,
            submission.text.chars().count()
        );

        let context = EssayContext::from_submission(&submission);

        let grammar = self.runner.run(&GrammarAgent, &context).await?;

        let theme = self.estimator.estimate(
            &submission.text,
            &submission.theme,
            &submission.expected_references,
        );
        if theme.deviates {
            warn!(
                "Essay {} may deviate from its theme ({}% adherence)",
                essay_id, theme.adherence
            );
        }

        let premium = if plan.includes_premium() {
            Some(self.run_premium(&context).await?)
        } else {
            debug!("Skipping premium agents for {} plan", plan);
            None
        };

        let prior_scores = PriorScores {
            grammar: Some(grammar.output.score),
            logic: premium.as_ref().map(|p| p.logic.output.score),
            structure: premium.as_ref().map(|p| p.structure.output.score),
        };
        let evaluation = self
            .runner
            .run(&EvaluatorAgent, &context.clone().with_prior_scores(prior_scores))
            .await?;

        let mut token_counts = vec![grammar.tokens_used, evaluation.tokens_used];
        if let Some(p) = &premium {
            token_counts.extend([
                p.logic.tokens_used,
                p.structure.tokens_used,
                p.repertoire.tokens_used,
                p.rewrites.tokens_used,
                p.socratic.tokens_used,
            ]);
        }
        let tokens_used = sum_tokens(&token_counts);

        let mut grammar_output = grammar.output;
        let (mut logic, structure, repertoire, rewrites, socratic) = match premium {
            Some(p) => (
                Some(p.logic.output),
                Some(p.structure.output),
                Some(p.repertoire.output),
                Some(p.rewrites.output.rewrites),
                Some(p.socratic.output),
            ),
            None => (None, None, None, None, None),
        };

        let batch = {
            let mut records: Vec<&mut dyn Anchor> = Vec::new();
            for error in grammar_output.errors.iter_mut() {
                records.push(error);
            }
            if let Some(logic) = logic.as_mut() {
                for problem in logic.problems.iter_mut() {
                    records.push(problem);
                }
            }
            self.engine.resolve(&submission.text, &mut records)
        };
        info!(
            "Resolved {} highlights for essay {} ({} skipped, {} overlapping, {} truncated)",
            batch.highlights.len(),
            essay_id,
            batch.skipped().count(),
            batch.overlapping,
            batch.truncated
        );

        let elapsed = started.elapsed();
        info!("Analysis of essay {} finished in {:.2}s", essay_id, elapsed.as_secs_f64());

        Ok(FullAnalysis {
            essay_id: essay_id.to_string(),
            plan,
            text: submission.text,
            grammar: grammar_output,
            theme_deviation: theme.deviates,
            theme_adherence: theme.adherence,
            keywords_used: theme.keywords_used.into_iter().collect(),
            logic,
            structure,
            repertoire,
            rewrites,
            socratic,
            final_evaluation: evaluation.output,
            highlights: batch.highlights,
            processing_seconds: round_seconds(elapsed),
            analyzed_at: Utc::now(),
            tokens_used,
        })
    }

    async fn run_premium(&self, context: &EssayContext) -> Result<PremiumAnalyses> {
        info!("Running premium agents");
        let (logic, structure, repertoire, rewrites, socratic) = tokio::try_join!(
            self.runner.run(&LogicAgent, context),
            self.runner.run(&StructureAgent, context),
            self.runner.run(&RepertoireAgent, context),
            self.runner.run(&RewriteAgent, context),
            self.runner.run(&SocraticAgent, context),
        )?;

        Ok(PremiumAnalyses {
            logic,
            structure,
            repertoire,
            rewrites,
            socratic,
        })
    }
}

/// Sum of reported token counts; `None` when no reply reported any
fn sum_tokens(counts: &[Option<u64>]) -> Option<u64> {
    counts
        .iter()
        .flatten()
        .copied()
        .reduce(|a, b| a.saturating_add(b))
}

fn round_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}
