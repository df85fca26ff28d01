//! Theme adherence command

use socratis_core::{error::Result, ThemeEstimator};
use std::path::Path;

use super::helpers::{load_config, print_json, read_essay};

/// Handle theme command
pub fn handle(essay: &Path, theme: &str, references: &[String], config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let text = read_essay(essay)?;

    let adherence = ThemeEstimator::from_config(&config.theme).estimate(&text, theme, references);
    print_json(&adherence)
}
