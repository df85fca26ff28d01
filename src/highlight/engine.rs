//! Highlight resolution engine
//!
//! Runs findings through location and overlap resolution, keeping a
//! per-record report so callers can see why a finding produced nothing.

use super::finding::{Anchor, Finding, FindingCategory, SkipReason};
use super::locator::{locate, MatchTier};
use super::merger::{HighlightSpan, SpanMerger};
use crate::config::HighlightConfig;
use crate::error::{Result, SocratisError};
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// Default cap on highlights per essay
pub const DEFAULT_HIGHLIGHT_LIMIT: usize = 25;

/// What happened to one input record
///
/// `range` is in characters, like the highlight offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Resolved { range: Range<usize>, tier: MatchTier },
    Skipped { reason: SkipReason },
}

/// Outcome of one record, by position in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub category: FindingCategory,
    pub index: usize,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Result of a resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightBatch {
    pub highlights: Vec<HighlightSpan>,
    pub items: Vec<ItemReport>,
    /// Resolved records dropped for overlapping an earlier highlight
    pub overlapping: usize,
    /// Resolved records dropped by the limit
    pub truncated: usize,
}

impl HighlightBatch {
    pub fn resolved_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Resolved { .. }))
            .count()
    }

    /// Records that produced no location, with their reason
    pub fn skipped(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Skipped { .. }))
    }
}

/// Resolves findings into ordered, non-overlapping highlights
#[derive(Debug, Clone)]
pub struct HighlightEngine {
    limit: usize,
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HIGHLIGHT_LIMIT,
        }
    }
}

impl HighlightEngine {
    /// Create an engine that keeps at most `limit` highlights
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(SocratisError::InvalidArgument(
                "highlight limit must be at least 1".to_string(),
            ));
        }
        Ok(Self { limit })
    }

    pub fn from_config(config: &HighlightConfig) -> Result<Self> {
        Self::new(config.limit)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Resolve `records` against `text`, backfilling each located record
    ///
    /// Every located record receives its character offsets and exact text,
    /// including records the merger later drops.
    pub fn resolve(&self, text: &str, records: &mut [&mut dyn Anchor]) -> HighlightBatch {
        let mut merger = SpanMerger::new(self.limit);
        let mut items = Vec::with_capacity(records.len());
        let mut per_category: [usize; 2] = [0, 0];

        for record in records.iter_mut() {
            let category = record.category();
            let index = next_index(&mut per_category, category);

            let outcome = match record.finding() {
                Ok(finding) => match self.place(text, &finding) {
                    Ok((range, tier)) => {
                        let span = HighlightSpan::from_finding(text, range, &finding);
                        record.backfill(span.char_range(), &span.text);
                        let range = span.char_range();
                        merger.add(span);
                        ItemOutcome::Resolved { range, tier }
                    }
                    Err(reason) => ItemOutcome::Skipped { reason },
                },
                Err(reason) => ItemOutcome::Skipped { reason },
            };

            log_skip(category, index, &outcome);
            items.push(ItemReport {
                category,
                index,
                outcome,
            });
        }

        Self::finish(merger, items)
    }

    /// Resolve already-normalized findings without touching any record
    pub fn resolve_findings(&self, text: &str, findings: &[Finding]) -> HighlightBatch {
        let mut merger = SpanMerger::new(self.limit);
        let mut items = Vec::with_capacity(findings.len());
        let mut per_category: [usize; 2] = [0, 0];

        for finding in findings {
            let index = next_index(&mut per_category, finding.category);
            let outcome = match self.place(text, finding) {
                Ok((range, tier)) => {
                    let span = HighlightSpan::from_finding(text, range, finding);
                    let range = span.char_range();
                    merger.add(span);
                    ItemOutcome::Resolved { range, tier }
                }
                Err(reason) => ItemOutcome::Skipped { reason },
            };

            log_skip(finding.category, index, &outcome);
            items.push(ItemReport {
                category: finding.category,
                index,
                outcome,
            });
        }

        Self::finish(merger, items)
    }

    fn place(
        &self,
        text: &str,
        finding: &Finding,
    ) -> std::result::Result<(Range<usize>, MatchTier), SkipReason> {
        if finding.excerpt.trim().is_empty() {
            return Err(SkipReason::EmptyExcerpt);
        }
        locate(text, &finding.excerpt, finding.paragraph_hint)
            .map(|span| (span.range, span.tier))
            .ok_or(SkipReason::NotFound)
    }

    fn finish(merger: SpanMerger, items: Vec<ItemReport>) -> HighlightBatch {
        let merged = merger.merge();
        debug!(
            "Resolved {} highlights ({} overlapping, {} truncated)",
            merged.spans.len(),
            merged.overlapping,
            merged.truncated
        );
        HighlightBatch {
            highlights: merged.spans,
            items,
            overlapping: merged.overlapping,
            truncated: merged.truncated,
        }
    }
}

fn next_index(counters: &mut [usize; 2], category: FindingCategory) -> usize {
    let slot = match category {
        FindingCategory::Grammar => 0,
        FindingCategory::Logic => 1,
    };
    let index = counters[slot];
    counters[slot] += 1;
    index
}

fn log_skip(category: FindingCategory, index: usize, outcome: &ItemOutcome) {
    if let ItemOutcome::Skipped { reason } = outcome {
        debug!("Skipping {} finding {}: {}", category, index, reason);
    }
}
