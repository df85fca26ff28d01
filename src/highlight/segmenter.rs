//! Paragraph segmentation
//!
//! Paragraphs are separated by one or more blank lines. Models refer to
//! them 1-based ("paragraph 2"); spans here are 0-indexed.

use super::patterns::CommonPatterns;
use std::ops::Range;

/// Split `text` into paragraph byte ranges, in order
///
/// Segments that are empty after trimming produce no span, and the text
/// after the last separator is included when it has content.
pub fn paragraph_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;

    for separator in CommonPatterns::paragraph_break().find_iter(text) {
        let end = separator.start();
        if !text[start..end].trim().is_empty() {
            spans.push(start..end);
        }
        start = separator.end();
    }

    if !text[start..].trim().is_empty() {
        spans.push(start..text.len());
    }

    spans
}
