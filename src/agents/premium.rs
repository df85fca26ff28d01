//! Premium-only agents: repertoire, rewrites and Socratic questions

use super::prompts::{REPERTOIRE_SYSTEM_PROMPT, REWRITE_SYSTEM_PROMPT, SOCRATIC_SYSTEM_PROMPT};
use super::{Agent, EssayContext, ValidateOutput};
use crate::types::{RepertoireAnalysis, RewriteSet, SocraticQuestions};

/// Cultural, historical and scientific references
#[derive(Debug, Clone, Copy, Default)]
pub struct RepertoireAgent;

impl Agent for RepertoireAgent {
    type Output = RepertoireAnalysis;

    fn name(&self) -> &'static str {
        "repertoire"
    }

    fn system_prompt(&self) -> &'static str {
        REPERTOIRE_SYSTEM_PROMPT
    }

    fn instruction(&self, context: &EssayContext) -> String {
        let mut instruction =
            "Identifique e avalie o REPERTÓRIO SOCIOCULTURAL usado.".to_string();
        if !context.expected_references.is_empty() {
            instruction.push_str("\nReferências esperadas: ");
            instruction.push_str(&context.expected_references.join(", "));
        }
        instruction
    }

    fn temperature(&self) -> f32 {
        0.4
    }
}

impl ValidateOutput for RepertoireAnalysis {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Expert rewrites of weak excerpts
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteAgent;

impl Agent for RewriteAgent {
    type Output = RewriteSet;

    fn name(&self) -> &'static str {
        "rewrite"
    }

    fn system_prompt(&self) -> &'static str {
        REWRITE_SYSTEM_PROMPT
    }

    fn instruction(&self, _context: &EssayContext) -> String {
        "Identifique 2-3 trechos problemáticos e REESCREVA-OS de forma exemplar.".to_string()
    }

    fn temperature(&self) -> f32 {
        0.6
    }
}

impl ValidateOutput for RewriteSet {
    fn validate(&self) -> Result<(), String> {
        match self
            .rewrites
            .iter()
            .position(|r| r.rewritten_excerpt.trim().is_empty())
        {
            Some(index) => Err(format!("rewrite {} has an empty rewritten excerpt", index)),
            None => Ok(()),
        }
    }
}

/// Questions that lead the author to improve the essay
#[derive(Debug, Clone, Copy, Default)]
pub struct SocraticAgent;

impl Agent for SocraticAgent {
    type Output = SocraticQuestions;

    fn name(&self) -> &'static str {
        "socratic"
    }

    fn system_prompt(&self) -> &'static str {
        SOCRATIC_SYSTEM_PROMPT
    }

    fn instruction(&self, _context: &EssayContext) -> String {
        "Faça 3-5 PERGUNTAS SOCRÁTICAS para ajudar o aluno a melhorar o texto.".to_string()
    }

    fn temperature(&self) -> f32 {
        0.7
    }
}

impl ValidateOutput for SocraticQuestions {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
