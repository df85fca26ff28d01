//! Full essay analysis command

use socratis_core::{error::Result, EssayKind, EssaySubmission, Orchestrator, Plan};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use super::helpers::{load_config, print_json, read_essay};

/// Arguments of `socratis analyze`
pub struct AnalyzeArgs {
    pub essay: PathBuf,
    pub theme: String,
    pub title: String,
    pub kind: EssayKind,
    pub plan: Plan,
    pub references: Vec<String>,
    pub essay_id: Option<String>,
    pub config: Option<PathBuf>,
}

/// Handle essay analysis command
pub async fn handle(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let orchestrator = Orchestrator::from_config(&config)?;

    let submission = EssaySubmission {
        title: args.title,
        text: read_essay(&args.essay)?,
        theme: args.theme,
        kind: args.kind,
        expected_references: args.references,
    };
    let essay_id = args
        .essay_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info!(
        "Analyzing {} with {} ({})",
        args.essay.display(),
        config.llm.model,
        config.llm.provider
    );
    let analysis = orchestrator.analyze(&submission, args.plan, &essay_id).await?;

    print_json(&analysis)
}
