//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use socratis_core::{
    agents::prompts::{
        EVALUATOR_SYSTEM_PROMPT, GRAMMAR_SYSTEM_PROMPT, LOGIC_SYSTEM_PROMPT,
        REPERTOIRE_SYSTEM_PROMPT, REWRITE_SYSTEM_PROMPT, SOCRATIC_SYSTEM_PROMPT,
        STRUCTURE_SYSTEM_PROMPT,
    },
    error::{Result, SocratisError},
    services::{GenerationRequest, ModelResponse},
    EssayKind, EssaySubmission, ModelClient,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const THEME: &str = "Educação e Tecnologia no Século XXI";

pub const ESSAY: &str = "A educação digital transforma o Brasil do século XXI. Fazem dois anos que as escolas adotaram a tecnologia em sala de aula.

Ela muda   vidas. Todos sabem que a internet resolve qualquer problema de aprendizagem.

Portanto, cabe ao Estado investir em formação docente e infraestrutura para garantir acesso universal.";

pub const GRAMMAR_REPLY: &str = r#"{
    "nota": 7.5,
    "total_erros": 2,
    "erros": [
        {
            "trecho": "Fazem dois anos",
            "tipo": "concordancia_verbal",
            "explicacao": "O verbo fazer indicando tempo é impessoal",
            "sugestao": "Faz dois anos",
            "regra": "Impessoalidade do verbo fazer"
        },
        {
            "trecho": "houveram muitos casos",
            "tipo": "concordancia_verbal",
            "explicacao": "Haver no sentido de existir é impessoal",
            "sugestao": "houve muitos casos",
            "regra": "Impessoalidade do verbo haver"
        }
    ],
    "vicios_linguagem": [],
    "feedback_geral": "Bom domínio da norma culta com desvios pontuais"
}"#;

pub const LOGIC_REPLY: &str = r#"Segue a análise:
```json
{
    "nota": 6.0,
    "tese_clara": true,
    "tese_identificada": "A educação digital transforma o Brasil",
    "problemas": [
        {
            "tipo": "argumento_fraco",
            "paragrafo": 2,
            "trecho": "Ela muda vidas",
            "explicacao": "Afirmação genérica sem desenvolvimento",
            "sugestao": "Explique como e para quem"
        },
        {
            "tipo": "generalizacao_apressada",
            "paragrafo": "2",
            "trecho": "Todos sabem que a internet resolve qualquer problema",
            "explicacao": "Generalização sem evidência",
            "sugestao": "Apresente dados"
        }
    ],
    "profundidade_argumentacao": "superficial",
    "falacias_detectadas": ["apelo ao senso comum"],
    "feedback_geral": "Argumentação previsível"
}
```"#;

pub const STRUCTURE_REPLY: &str = r#"{
    "nota": 7.0,
    "estrutura_adequada": true,
    "tem_introducao": true,
    "tem_desenvolvimento": true,
    "tem_conclusao": true,
    "uso_conectivos": {"portanto": 1},
    "problemas": [],
    "feedback_geral": "Estrutura clássica respeitada"
}"#;

pub const REPERTOIRE_REPLY: &str = r#"{
    "citacoes_identificadas": [],
    "uso_adequado": false,
    "feedback": "Nenhum repertório identificado"
}"#;

pub const REWRITE_REPLY: &str = r#"{
    "reescritas": [
        {
            "trecho_original": "Ela muda vidas.",
            "trecho_reescrito": "A educação digital amplia oportunidades para estudantes de baixa renda.",
            "explicacao": "Especifica o sujeito e o efeito",
            "melhorias": ["precisão", "formalidade"]
        }
    ]
}"#;

pub const SOCRATIC_REPLY: &str = r#"{
    "perguntas": [
        {
            "paragrafo": "2",
            "pergunta": "Que evidências mostram que a internet resolve problemas de aprendizagem?",
            "objetivo": "Fundamentar o argumento"
        }
    ]
}"#;

pub const EVALUATOR_REPLY: &str = r#"{
    "nota_geral": 7.0,
    "nota_enem": 720,
    "competencias_enem": [
        {"numero": 1, "nota": 160, "justificativa": "Desvios leves"},
        {"numero": 2, "nota": 160, "justificativa": "Tema compreendido"},
        {"numero": 3, "nota": 120, "justificativa": "Argumentação previsível"},
        {"numero": 4, "nota": 160, "justificativa": "Boa coesão"},
        {"numero": 5, "nota": 120, "justificativa": "Proposta incompleta"}
    ],
    "feedback_geral": "Texto adequado com argumentação a desenvolver",
    "pontos_fortes": ["estrutura clara"],
    "pontos_fracos": ["argumentos genéricos"],
    "sugestoes_melhoria": ["use dados e exemplos"]
}"#;

/// Tokens reported by every mock reply
pub const TOKENS_PER_CALL: u64 = 100;

/// Model client that answers by agent, keyed on the system prompt
pub struct MockModelClient {
    replies: HashMap<&'static str, String>,
    delays: HashMap<&'static str, Duration>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl MockModelClient {
    /// A client with a valid canned reply for every agent
    pub fn new() -> Self {
        let replies = [
            (GRAMMAR_SYSTEM_PROMPT, GRAMMAR_REPLY),
            (LOGIC_SYSTEM_PROMPT, LOGIC_REPLY),
            (STRUCTURE_SYSTEM_PROMPT, STRUCTURE_REPLY),
            (REPERTOIRE_SYSTEM_PROMPT, REPERTOIRE_REPLY),
            (REWRITE_SYSTEM_PROMPT, REWRITE_REPLY),
            (SOCRATIC_SYSTEM_PROMPT, SOCRATIC_REPLY),
            (EVALUATOR_SYSTEM_PROMPT, EVALUATOR_REPLY),
        ]
        .into_iter()
        .map(|(prompt, reply)| (prompt, reply.to_string()))
        .collect();

        Self {
            replies,
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the reply for the agent using `system_prompt`
    pub fn with_reply(mut self, system_prompt: &'static str, reply: &str) -> Self {
        self.replies.insert(system_prompt, reply.to_string());
        self
    }

    /// Delay the reply for the agent using `system_prompt`
    pub fn with_delay(mut self, system_prompt: &'static str, delay: Duration) -> Self {
        self.delays.insert(system_prompt, delay);
        self
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// The request sent by the agent using `system_prompt`, if any
    pub fn call_for(&self, system_prompt: &str) -> Option<GenerationRequest> {
        self.calls()
            .into_iter()
            .find(|call| call.system_prompt == system_prompt)
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelResponse> {
        self.calls.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delays.get(request.system_prompt.as_str()) {
            tokio::time::sleep(*delay).await;
        }

        let text = self
            .replies
            .get(request.system_prompt.as_str())
            .cloned()
            .ok_or_else(|| SocratisError::LlmApi("no scripted reply for prompt".to_string()))?;

        Ok(ModelResponse {
            text,
            tokens_used: Some(TOKENS_PER_CALL),
            model: "mock".to_string(),
        })
    }
}

/// A valid ENEM submission on `THEME`
pub fn sample_submission() -> EssaySubmission {
    EssaySubmission {
        title: "Educação digital no Brasil".to_string(),
        text: ESSAY.to_string(),
        theme: THEME.to_string(),
        kind: EssayKind::Enem,
        expected_references: vec!["Estado".to_string(), "Paulo Freire".to_string()],
    }
}

/// Character offset of the first occurrence of `needle`
pub fn char_offset(text: &str, needle: &str) -> usize {
    text[..text.find(needle).unwrap()].chars().count()
}

/// Slice `text` by character offsets
pub fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}
