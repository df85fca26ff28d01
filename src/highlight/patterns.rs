//! Pre-compiled regex patterns for highlight resolution

use once_cell::sync::Lazy;
use regex::Regex;

/// Common patterns used across the highlight pipeline
pub struct CommonPatterns;

impl CommonPatterns {
    /// Paragraph separator: a newline, optional whitespace, then one or more newlines
    pub fn paragraph_break() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\n\s*\n+").expect("Valid paragraph break regex")
        });
        &PATTERN
    }
}
