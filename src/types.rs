//! Core types for the Socratis grading system
//!
//! Field names are English in Rust; the serde names follow the JSON contract
//! shared with the agents' prompts and the web UI (Portuguese keys).

use crate::error::{Result, SocratisError};
use crate::highlight::HighlightSpan;
use crate::services::json::sanitize_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Bounds on submission fields, in characters
pub const TITLE_CHARS: (usize, usize) = (5, 200);
pub const TEXT_CHARS: (usize, usize) = (100, 10_000);
pub const THEME_CHARS: (usize, usize) = (1, 500);

/// Subscription plan of the submitting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Premium,
    B2b,
}

impl Plan {
    /// Whether premium agents run for this plan
    pub fn includes_premium(&self) -> bool {
        matches!(self, Plan::Premium | Plan::B2b)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Free => write!(f, "free"),
            Plan::Premium => write!(f, "premium"),
            Plan::B2b => write!(f, "b2b"),
        }
    }
}

impl FromStr for Plan {
    type Err = SocratisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "premium" => Ok(Plan::Premium),
            "b2b" => Ok(Plan::B2b),
            other => Err(SocratisError::InvalidArgument(format!("unknown plan '{}'", other))),
        }
    }
}

/// Kind of essay being graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EssayKind {
    #[serde(rename = "enem")]
    Enem,
    #[default]
    #[serde(rename = "dissertativa")]
    Dissertative,
    #[serde(rename = "argumentativa")]
    Argumentative,
    #[serde(rename = "concurso")]
    PublicExam,
}

impl fmt::Display for EssayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EssayKind::Enem => "enem",
            EssayKind::Dissertative => "dissertativa",
            EssayKind::Argumentative => "argumentativa",
            EssayKind::PublicExam => "concurso",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for EssayKind {
    type Err = SocratisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "enem" => Ok(EssayKind::Enem),
            "dissertativa" => Ok(EssayKind::Dissertative),
            "argumentativa" => Ok(EssayKind::Argumentative),
            "concurso" => Ok(EssayKind::PublicExam),
            other => Err(SocratisError::InvalidArgument(format!(
                "unknown essay kind '{}'",
                other
            ))),
        }
    }
}

/// An essay as submitted for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssaySubmission {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "tema")]
    pub theme: String,
    #[serde(rename = "tipo", default)]
    pub kind: EssayKind,
    /// Keywords the author was expected to use
    #[serde(rename = "referencias_esperadas", default)]
    pub expected_references: Vec<String>,
}

impl EssaySubmission {
    /// Copy with control characters removed, line endings normalised,
    /// and title/theme trimmed
    pub fn sanitized(&self) -> Self {
        Self {
            title: sanitize_text(&self.title).trim().to_string(),
            text: sanitize_text(&self.text),
            theme: sanitize_text(&self.theme).trim().to_string(),
            kind: self.kind,
            expected_references: self.expected_references.clone(),
        }
    }

    /// Check length bounds on every field
    pub fn validate(&self) -> Result<()> {
        check_len("titulo", &self.title, TITLE_CHARS)?;
        check_len("texto", &self.text, TEXT_CHARS)?;
        check_len("tema", &self.theme, THEME_CHARS)?;
        Ok(())
    }
}

fn check_len(field: &str, value: &str, (min, max): (usize, usize)) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(SocratisError::InvalidSubmission(format!(
            "{} must have between {} and {} characters (got {})",
            field, min, max, len
        )));
    }
    Ok(())
}

/// Paragraph numbers arrive as integers, digit strings, or garbage;
/// anything that is not a positive integer becomes `None`
fn lenient_paragraph<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(paragraph_from_value))
}

/// Interpret a JSON value as a 1-based paragraph number
pub(crate) fn paragraph_from_value(value: &serde_json::Value) -> Option<usize> {
    let paragraph = match value {
        serde_json::Value::Number(n) => n.as_u64().map(|n| n as usize),
        serde_json::Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    paragraph.filter(|n| *n > 0)
}

/// One grammar error reported by the grammar agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarError {
    #[serde(rename = "trecho")]
    pub excerpt: String,
    #[serde(rename = "tipo", default)]
    pub kind: String,
    #[serde(rename = "explicacao", default)]
    pub explanation: String,
    #[serde(rename = "sugestao", default)]
    pub suggestion: String,
    #[serde(rename = "regra", default)]
    pub rule: String,
    /// Character offsets of the excerpt, filled in by highlight resolution
    #[serde(rename = "posicao_inicio", default)]
    pub start: Option<usize>,
    #[serde(rename = "posicao_fim", default)]
    pub end: Option<usize>,
}

/// Grammar agent output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarAnalysis {
    #[serde(rename = "nota")]
    pub score: f32,
    #[serde(rename = "erros", default)]
    pub errors: Vec<GrammarError>,
    #[serde(rename = "total_erros")]
    pub total_errors: u32,
    #[serde(rename = "vicios_linguagem", default)]
    pub language_vices: Vec<String>,
    #[serde(rename = "feedback_geral")]
    pub general_feedback: String,
}

/// One reasoning problem reported by the logic agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicProblem {
    #[serde(rename = "tipo", default)]
    pub kind: String,
    /// 1-based paragraph the model attributes the problem to
    #[serde(
        rename = "paragrafo",
        default,
        deserialize_with = "lenient_paragraph"
    )]
    pub paragraph: Option<usize>,
    #[serde(rename = "trecho")]
    pub excerpt: String,
    #[serde(rename = "explicacao", default)]
    pub explanation: String,
    #[serde(rename = "sugestao", default)]
    pub suggestion: String,
    /// Character offsets of the excerpt, filled in by highlight resolution
    #[serde(rename = "posicao_inicio", default)]
    pub start: Option<usize>,
    #[serde(rename = "posicao_fim", default)]
    pub end: Option<usize>,
}

/// Logic agent output (premium)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicAnalysis {
    #[serde(rename = "nota")]
    pub score: f32,
    #[serde(rename = "tese_clara")]
    pub clear_thesis: bool,
    #[serde(rename = "tese_identificada", default)]
    pub identified_thesis: Option<String>,
    #[serde(rename = "problemas", default)]
    pub problems: Vec<LogicProblem>,
    /// superficial, moderada or profunda
    #[serde(rename = "profundidade_argumentacao")]
    pub argument_depth: String,
    #[serde(rename = "falacias_detectadas", default)]
    pub fallacies: Vec<String>,
    #[serde(rename = "feedback_geral")]
    pub general_feedback: String,
}

/// One cohesion or organisation problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralProblem {
    #[serde(rename = "tipo", default)]
    pub kind: String,
    #[serde(rename = "localizacao", default)]
    pub location: String,
    #[serde(rename = "explicacao", default)]
    pub explanation: String,
    #[serde(rename = "sugestao", default)]
    pub suggestion: String,
}

/// Structure agent output (premium)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralAnalysis {
    #[serde(rename = "nota")]
    pub score: f32,
    #[serde(rename = "estrutura_adequada")]
    pub adequate_structure: bool,
    #[serde(rename = "tem_introducao")]
    pub has_introduction: bool,
    #[serde(rename = "tem_desenvolvimento")]
    pub has_development: bool,
    #[serde(rename = "tem_conclusao")]
    pub has_conclusion: bool,
    /// Connective -> number of uses
    #[serde(rename = "uso_conectivos", default)]
    pub connective_usage: BTreeMap<String, u32>,
    #[serde(rename = "problemas", default)]
    pub problems: Vec<StructuralProblem>,
    #[serde(rename = "feedback_geral")]
    pub general_feedback: String,
}

/// Score for one of the five ENEM competencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemCompetency {
    #[serde(rename = "numero")]
    pub number: u8,
    #[serde(rename = "nota")]
    pub score: u16,
    #[serde(rename = "justificativa", default)]
    pub justification: String,
    #[serde(rename = "pontos_fortes", default)]
    pub strengths: Vec<String>,
    #[serde(rename = "pontos_fracos", default)]
    pub weaknesses: Vec<String>,
}

/// Evaluator agent output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalEvaluation {
    #[serde(rename = "nota_geral")]
    pub overall_score: f32,
    #[serde(rename = "nota_enem", default)]
    pub enem_score: Option<u16>,
    #[serde(rename = "competencias_enem", default)]
    pub competencies: Option<Vec<EnemCompetency>>,
    #[serde(rename = "feedback_geral")]
    pub general_feedback: String,
    #[serde(rename = "pontos_fortes", default)]
    pub strengths: Vec<String>,
    #[serde(rename = "pontos_fracos", default)]
    pub weaknesses: Vec<String>,
    #[serde(rename = "sugestoes_melhoria", default)]
    pub improvement_suggestions: Vec<String>,
}

/// A cultural, historical or scientific reference found in the essay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepertoireCitation {
    #[serde(rename = "tipo", default)]
    pub kind: String,
    #[serde(rename = "conteudo", default)]
    pub content: String,
    /// "sim" / "não" as returned by the model
    #[serde(rename = "produtiva", default)]
    pub productive: String,
    #[serde(rename = "justificativa", default)]
    pub justification: String,
}

/// Repertoire agent output (premium)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepertoireAnalysis {
    #[serde(rename = "citacoes_identificadas", default)]
    pub citations: Vec<RepertoireCitation>,
    #[serde(rename = "uso_adequado", default = "default_true")]
    pub adequate_use: bool,
    pub feedback: String,
}

fn default_true() -> bool {
    true
}

/// An excerpt rewritten the way an expert would write it (premium)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rewrite {
    #[serde(rename = "trecho_original")]
    pub original_excerpt: String,
    #[serde(rename = "trecho_reescrito")]
    pub rewritten_excerpt: String,
    #[serde(rename = "explicacao", default)]
    pub explanation: String,
    #[serde(rename = "melhorias", default)]
    pub improvements: Vec<String>,
}

/// Rewrite agent output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteSet {
    #[serde(rename = "reescritas", default)]
    pub rewrites: Vec<Rewrite>,
}

/// A question meant to make the author think, tied to a paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocraticQuestion {
    #[serde(rename = "paragrafo", default, deserialize_with = "lenient_paragraph")]
    pub paragraph: Option<usize>,
    #[serde(rename = "pergunta")]
    pub question: String,
    #[serde(rename = "objetivo", default)]
    pub goal: String,
}

/// Socratic agent output (premium)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocraticQuestions {
    #[serde(rename = "perguntas", default)]
    pub questions: Vec<SocraticQuestion>,
}

/// Complete report for one essay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysis {
    #[serde(rename = "redacao_id")]
    pub essay_id: String,
    #[serde(rename = "plano_usuario")]
    pub plan: Plan,
    /// Sanitized essay text; every offset in the report indexes into it
    #[serde(rename = "texto")]
    pub text: String,

    #[serde(rename = "analise_gramatical")]
    pub grammar: GrammarAnalysis,

    #[serde(rename = "fuga_ao_tema")]
    pub theme_deviation: bool,
    #[serde(rename = "aderencia_tema")]
    pub theme_adherence: f64,
    #[serde(rename = "palavras_chave_usadas")]
    pub keywords_used: Vec<String>,

    #[serde(rename = "analise_logica")]
    pub logic: Option<LogicAnalysis>,
    #[serde(rename = "analise_estrutural")]
    pub structure: Option<StructuralAnalysis>,
    #[serde(rename = "repertorio_sociocultural")]
    pub repertoire: Option<RepertoireAnalysis>,
    #[serde(rename = "reescritas_comparativas")]
    pub rewrites: Option<Vec<Rewrite>>,
    #[serde(rename = "modo_socratico")]
    pub socratic: Option<SocraticQuestions>,

    #[serde(rename = "avaliacao_final")]
    pub final_evaluation: FinalEvaluation,

    #[serde(rename = "trechos_melhoria")]
    pub highlights: Vec<HighlightSpan>,

    #[serde(rename = "tempo_processamento")]
    pub processing_seconds: f64,
    #[serde(rename = "data_analise")]
    pub analyzed_at: DateTime<Utc>,
    #[serde(rename = "tokens_utilizados")]
    pub tokens_used: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(text: &str) -> EssaySubmission {
        EssaySubmission {
            title: "  Educação digital  ".to_string(),
            text: text.to_string(),
            theme: " Educação e Tecnologia ".to_string(),
            kind: EssayKind::Enem,
            expected_references: vec![],
        }
    }

    #[test]
    fn test_plan_premium_gate() {
        assert!(!Plan::Free.includes_premium());
        assert!(Plan::Premium.includes_premium());
        assert!(Plan::B2b.includes_premium());
    }

    #[test]
    fn test_sanitized_submission() {
        let clean = submission("Primeira linha\r\nSegunda\u{0000} linha").sanitized();
        assert_eq!(clean.title, "Educação digital");
        assert_eq!(clean.theme, "Educação e Tecnologia");
        assert_eq!(clean.text, "Primeira linha\nSegunda linha");
    }

    #[test]
    fn test_validate_text_too_short() {
        let err = submission("curto").sanitized().validate().unwrap_err();
        assert!(matches!(err, SocratisError::InvalidSubmission(_)));
        assert!(err.to_string().contains("texto"));
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        // 100 two-byte characters is exactly at the lower bound
        let text = "ç".repeat(100);
        assert!(submission(&text).sanitized().validate().is_ok());
    }

    #[test]
    fn test_logic_problem_lenient_paragraph() {
        let from_int: LogicProblem =
            serde_json::from_str(r#"{"tipo":"falacia","paragrafo":2,"trecho":"x"}"#).unwrap();
        assert_eq!(from_int.paragraph, Some(2));

        let from_str: LogicProblem =
            serde_json::from_str(r#"{"paragrafo":"3","trecho":"x"}"#).unwrap();
        assert_eq!(from_str.paragraph, Some(3));

        let negative: LogicProblem =
            serde_json::from_str(r#"{"paragrafo":-1,"trecho":"x"}"#).unwrap();
        assert_eq!(negative.paragraph, None);

        let missing: LogicProblem = serde_json::from_str(r#"{"trecho":"x"}"#).unwrap();
        assert_eq!(missing.paragraph, None);
        assert_eq!(missing.explanation, "");
    }

    #[test]
    fn test_grammar_analysis_wire_names() {
        let raw = r#"{
            "nota": 8.5,
            "total_erros": 1,
            "erros": [{
                "trecho": "fazem dois anos",
                "tipo": "concordancia_verbal",
                "explicacao": "Verbo fazer impessoal",
                "sugestao": "faz dois anos",
                "regra": "Fazer indicando tempo é impessoal"
            }],
            "feedback_geral": "Bom texto"
        }"#;
        let analysis: GrammarAnalysis = serde_json::from_str(raw).unwrap();
        assert_eq!(analysis.errors.len(), 1);
        assert_eq!(analysis.errors[0].excerpt, "fazem dois anos");
        assert_eq!(analysis.errors[0].start, None);
        assert!(analysis.language_vices.is_empty());
    }

    #[test]
    fn test_essay_kind_wire_names() {
        assert_eq!(serde_json::to_string(&EssayKind::PublicExam).unwrap(), "\"concurso\"");
        assert_eq!(EssayKind::default(), EssayKind::Dissertative);
        assert_eq!(EssayKind::Enem.to_string(), "enem");
        assert_eq!("Concurso".parse::<EssayKind>().unwrap(), EssayKind::PublicExam);
        assert!("poema".parse::<EssayKind>().is_err());
    }

    #[test]
    fn test_plan_from_str() {
        assert_eq!("B2B".parse::<Plan>().unwrap(), Plan::B2b);
        assert!(matches!(
            "gold".parse::<Plan>(),
            Err(SocratisError::InvalidArgument(_))
        ));
    }
}
