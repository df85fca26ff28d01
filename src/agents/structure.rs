//! Cohesion and structure agent (premium)

use super::prompts::STRUCTURE_SYSTEM_PROMPT;
use super::{check_range, Agent, EssayContext, ValidateOutput, MAX_AGENT_SCORE};
use crate::types::StructuralAnalysis;

#[derive(Debug, Clone, Copy, Default)]
pub struct StructureAgent;

impl Agent for StructureAgent {
    type Output = StructuralAnalysis;

    fn name(&self) -> &'static str {
        "structure"
    }

    fn system_prompt(&self) -> &'static str {
        STRUCTURE_SYSTEM_PROMPT
    }

    fn instruction(&self, _context: &EssayContext) -> String {
        "Analise a ESTRUTURA e a COESÃO deste texto.".to_string()
    }

    fn temperature(&self) -> f32 {
        0.3
    }
}

impl ValidateOutput for StructuralAnalysis {
    fn validate(&self) -> Result<(), String> {
        check_range("nota", self.score, MAX_AGENT_SCORE)
    }
}
