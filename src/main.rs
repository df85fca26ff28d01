//! Socratis - Multi-Agent Essay Grading
//!
//! Command-line entry point. Reports are written to stdout as JSON; logs go
//! to stderr.

mod cli;

use clap::{Parser, Subcommand};
use socratis_core::{EssayKind, Plan};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

use cli::analyze::AnalyzeArgs;

#[derive(Parser)]
#[command(name = "socratis")]
#[command(about = "Multi-agent grading and highlighting for Portuguese essays", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every agent for the essay's plan and print the full report
    Analyze {
        /// Essay text file
        #[arg(short, long)]
        essay: PathBuf,

        /// Assigned theme
        #[arg(short, long)]
        theme: String,

        /// Essay title
        #[arg(long, default_value = "Redação sem título")]
        title: String,

        /// Essay kind (enem, dissertativa, argumentativa, concurso)
        #[arg(short, long, default_value = "dissertativa")]
        kind: EssayKind,

        /// Subscription plan (free, premium, b2b)
        #[arg(short, long, default_value = "free")]
        plan: Plan,

        /// Reference the author was expected to use (repeatable)
        #[arg(short, long = "reference")]
        references: Vec<String>,

        /// Identifier for the report (random UUID if omitted)
        #[arg(long)]
        essay_id: Option<String>,

        /// TOML configuration file
        #[arg(short, long, env = "SOCRATIS_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Resolve raw findings against an essay without calling a model
    Highlight {
        /// Essay text file
        #[arg(short, long)]
        essay: PathBuf,

        /// JSON file with findings keyed by category (gramatica, logica)
        #[arg(short, long)]
        findings: PathBuf,

        /// Maximum number of highlights
        #[arg(long, default_value_t = socratis_core::highlight::DEFAULT_HIGHLIGHT_LIMIT)]
        limit: usize,
    },

    /// Estimate how closely an essay follows its theme
    Theme {
        /// Essay text file
        #[arg(short, long)]
        essay: PathBuf,

        /// Assigned theme
        #[arg(short, long)]
        theme: String,

        /// Reference the author was expected to use (repeatable)
        #[arg(short, long = "reference")]
        references: Vec<String>,

        /// TOML configuration file
        #[arg(short, long, env = "SOCRATIS_CONFIG")]
        config: Option<PathBuf>,
    },

    /// List the paragraphs of an essay with their character offsets
    Paragraphs {
        /// Essay text file
        #[arg(short, long)]
        essay: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Our crates at the requested level, HTTP internals quieter
    let filter = EnvFilter::new(format!(
        "socratis={level},socratis_core={level},reqwest=warn,hyper=warn",
        level = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Socratis v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Analyze {
            essay,
            theme,
            title,
            kind,
            plan,
            references,
            essay_id,
            config,
        } => {
            cli::analyze::handle(AnalyzeArgs {
                essay,
                theme,
                title,
                kind,
                plan,
                references,
                essay_id,
                config,
            })
            .await?
        }
        Commands::Highlight {
            essay,
            findings,
            limit,
        } => cli::highlight::handle(&essay, &findings, limit)?,
        Commands::Theme {
            essay,
            theme,
            references,
            config,
        } => cli::theme::handle(&essay, &theme, &references, config.as_deref())?,
        Commands::Paragraphs { essay } => cli::paragraphs::handle(&essay)?,
    }

    Ok(())
}
