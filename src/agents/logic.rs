//! Argumentation agent (premium)

use super::prompts::LOGIC_SYSTEM_PROMPT;
use super::{check_range, Agent, EssayContext, ValidateOutput, MAX_AGENT_SCORE};
use crate::types::LogicAnalysis;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogicAgent;

impl Agent for LogicAgent {
    type Output = LogicAnalysis;

    fn name(&self) -> &'static str {
        "logic"
    }

    fn system_prompt(&self) -> &'static str {
        LOGIC_SYSTEM_PROMPT
    }

    fn instruction(&self, _context: &EssayContext) -> String {
        "Analise a LÓGICA e a ARGUMENTAÇÃO deste texto com rigor filosófico.".to_string()
    }

    fn temperature(&self) -> f32 {
        0.4
    }
}

impl ValidateOutput for LogicAnalysis {
    fn validate(&self) -> Result<(), String> {
        check_range("nota", self.score, MAX_AGENT_SCORE)
    }
}
