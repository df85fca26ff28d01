//! Overlap resolution for located findings

use super::finding::{Finding, FindingCategory};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A finding anchored to an exact span of the essay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    /// Character offset of the first character
    #[serde(rename = "inicio")]
    pub start: usize,
    /// Character offset one past the last character
    #[serde(rename = "fim")]
    pub end: usize,
    /// Same span in UTF-8 bytes
    #[serde(rename = "inicio_byte")]
    pub byte_start: usize,
    #[serde(rename = "fim_byte")]
    pub byte_end: usize,
    /// Exact essay text covered by the span
    #[serde(rename = "trecho")]
    pub text: String,
    #[serde(rename = "categoria")]
    pub category: FindingCategory,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "explicacao")]
    pub explanation: String,
    #[serde(rename = "sugestao")]
    pub suggestion: String,
    #[serde(rename = "paragrafo")]
    pub paragraph: Option<usize>,
}

impl HighlightSpan {
    /// Build a span for `finding` located at `range` of `text`
    ///
    /// `range` is in bytes and must lie on char boundaries of `text`.
    pub fn from_finding(text: &str, range: Range<usize>, finding: &Finding) -> Self {
        let chars = char_range(text, range.clone());
        Self {
            start: chars.start,
            end: chars.end,
            byte_start: range.start,
            byte_end: range.end,
            text: text[range].to_string(),
            category: finding.category,
            kind: finding.kind.clone(),
            explanation: finding.explanation.clone(),
            suggestion: finding.suggestion.clone(),
            paragraph: finding.paragraph_hint,
        }
    }

    /// Byte range, for slicing the essay
    pub fn range(&self) -> Range<usize> {
        self.byte_start..self.byte_end
    }

    pub fn char_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Convert a byte range on char boundaries of `text` into character offsets
pub fn char_range(text: &str, bytes: Range<usize>) -> Range<usize> {
    let start = text[..bytes.start].chars().count();
    start..start + text[bytes].chars().count()
}

/// Result of merging candidate spans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Accepted spans, ordered by start, pairwise non-overlapping
    pub spans: Vec<HighlightSpan>,
    /// Candidates dropped for overlapping an accepted span
    pub overlapping: usize,
    /// Candidates dropped once the limit was reached
    pub truncated: usize,
}

/// First-by-position span merger
///
/// Candidates are ordered by `(start, end)`; a candidate is accepted only if
/// it starts at or after the end of the last accepted span. Overlaps are
/// never unioned.
pub struct SpanMerger {
    limit: usize,
    candidates: Vec<HighlightSpan>,
}

impl SpanMerger {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            candidates: Vec::new(),
        }
    }

    /// Add a candidate span
    pub fn add(&mut self, span: HighlightSpan) {
        self.candidates.push(span);
    }

    /// Resolve overlaps and apply the limit
    pub fn merge(mut self) -> MergeOutcome {
        // Stable: equal spans keep insertion order
        self.candidates.sort_by_key(|span| (span.byte_start, span.byte_end));

        let mut outcome = MergeOutcome::default();
        let mut last_end: Option<usize> = None;

        for span in self.candidates {
            if last_end.is_some_and(|end| span.byte_start < end) {
                outcome.overlapping += 1;
                continue;
            }
            if outcome.spans.len() >= self.limit {
                outcome.truncated += 1;
                continue;
            }
            last_end = Some(span.byte_end);
            outcome.spans.push(span);
        }

        outcome
    }

    /// Merge `candidates` with the given limit
    pub fn resolve(candidates: Vec<HighlightSpan>, limit: usize) -> MergeOutcome {
        let mut merger = Self::new(limit);
        for span in candidates {
            merger.add(span);
        }
        merger.merge()
    }
}
