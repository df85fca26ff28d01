//! Shared helper functions for CLI commands

use serde::Serialize;
use socratis_core::{error::Result, SocratisConfig};
use std::path::Path;
use tracing::debug;

/// Read an essay from disk
pub fn read_essay(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Load configuration from `path` (or defaults) and apply environment overrides
pub fn load_config(path: Option<&Path>) -> Result<SocratisConfig> {
    let config = match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            SocratisConfig::from_file(path)?
        }
        None => SocratisConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
