//! Grammar and style agent (all plans)

use super::prompts::GRAMMAR_SYSTEM_PROMPT;
use super::{check_range, Agent, EssayContext, ValidateOutput, MAX_AGENT_SCORE};
use crate::types::GrammarAnalysis;

/// Spelling, agreement, regency, crase, punctuation and language vices
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarAgent;

impl Agent for GrammarAgent {
    type Output = GrammarAnalysis;

    fn name(&self) -> &'static str {
        "grammar"
    }

    fn system_prompt(&self) -> &'static str {
        GRAMMAR_SYSTEM_PROMPT
    }

    fn instruction(&self, _context: &EssayContext) -> String {
        "Analise TODOS os aspectos gramaticais e estilísticos deste texto.".to_string()
    }

    fn temperature(&self) -> f32 {
        0.3
    }
}

impl ValidateOutput for GrammarAnalysis {
    fn validate(&self) -> Result<(), String> {
        check_range("nota", self.score, MAX_AGENT_SCORE)
    }
}
