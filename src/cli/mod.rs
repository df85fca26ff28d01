//! CLI command handlers
//!
//! Each subcommand is implemented in its own module. Only `analyze` talks
//! to a model; the others run the highlight core offline.

pub mod analyze;
pub mod helpers;
pub mod highlight;
pub mod paragraphs;
pub mod theme;
