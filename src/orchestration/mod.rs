//! Multi-agent essay analysis

pub mod orchestrator;

pub use orchestrator::Orchestrator;
