//! Final evaluator agent
//!
//! Runs last so it can weigh the scores the other agents produced. ENEM
//! essays are graded on the five competencies; other kinds get a general
//! evaluation.

use super::prompts::EVALUATOR_SYSTEM_PROMPT;
use super::{check_range, Agent, EssayContext, ValidateOutput, MAX_AGENT_SCORE};
use crate::types::{EssayKind, FinalEvaluation};
use std::fmt::Write;

const MAX_ENEM_SCORE: u16 = 1000;
const MAX_COMPETENCY_SCORE: u16 = 200;

#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluatorAgent;

impl Agent for EvaluatorAgent {
    type Output = FinalEvaluation;

    fn name(&self) -> &'static str {
        "evaluator"
    }

    fn system_prompt(&self) -> &'static str {
        EVALUATOR_SYSTEM_PROMPT
    }

    fn instruction(&self, context: &EssayContext) -> String {
        let mut instruction = String::new();
        let prior = &context.prior_scores;

        if !prior.is_empty() {
            instruction.push_str("ANÁLISES ANTERIORES (use como referência):\n");
            let labelled = [
                ("Gramática", prior.grammar),
                ("Lógica", prior.logic),
                ("Estrutura", prior.structure),
            ];
            for (label, score) in labelled {
                if let Some(score) = score {
                    // Writing to a String cannot fail
                    let _ = writeln!(instruction, "{}: Nota {}", label, score);
                }
            }
            instruction.push('\n');
        }

        match context.kind {
            EssayKind::Enem => {
                instruction.push_str("Avalie esta redação segundo as 5 COMPETÊNCIAS DO ENEM.")
            }
            _ => instruction.push_str("Avalie esta redação de forma GERAL."),
        }

        instruction
    }

    fn temperature(&self) -> f32 {
        0.5
    }
}

impl ValidateOutput for FinalEvaluation {
    fn validate(&self) -> Result<(), String> {
        check_range("nota_geral", self.overall_score, MAX_AGENT_SCORE)?;
        if let Some(enem) = self.enem_score {
            check_range("nota_enem", enem, MAX_ENEM_SCORE)?;
        }
        for competency in self.competencies.iter().flatten() {
            if !(1..=5).contains(&competency.number) {
                return Err(format!(
                    "competency number must be between 1 and 5 (got {})",
                    competency.number
                ));
            }
            check_range("nota", competency.score, MAX_COMPETENCY_SCORE)?;
        }
        Ok(())
    }
}
