//! Offline highlight resolution command
//!
//! Reads raw findings as `{"gramatica": [...], "logica": [...]}` and prints
//! the resolved highlights, the skipped records, and the findings with
//! their positions backfilled.

use serde::Serialize;
use serde_json::Value;
use socratis_core::{
    error::Result,
    highlight::{Anchor, ItemReport, RawRecord},
    FindingCategory, HighlightEngine, HighlightSpan,
};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use super::helpers::{print_json, read_essay};

#[derive(Serialize)]
struct HighlightReport<'a> {
    highlights: &'a [HighlightSpan],
    skipped: Vec<&'a ItemReport>,
    overlapping: usize,
    truncated: usize,
    findings: &'a BTreeMap<FindingCategory, Vec<Value>>,
}

/// Handle highlight command
pub fn handle(essay: &Path, findings: &Path, limit: usize) -> Result<()> {
    let text = read_essay(essay)?;
    let mut by_category: BTreeMap<FindingCategory, Vec<Value>> =
        serde_json::from_str(&std::fs::read_to_string(findings)?)?;
    let engine = HighlightEngine::new(limit)?;

    let batch = {
        let mut records: Vec<RawRecord> = by_category
            .iter_mut()
            .flat_map(|(category, values)| {
                let category = *category;
                values
                    .iter_mut()
                    .map(move |value| RawRecord { category, value })
            })
            .collect();
        debug!("Resolving {} raw findings", records.len());

        let mut anchors: Vec<&mut dyn Anchor> = records
            .iter_mut()
            .map(|record| record as &mut dyn Anchor)
            .collect();
        engine.resolve(&text, &mut anchors)
    };

    print_json(&HighlightReport {
        highlights: &batch.highlights,
        skipped: batch.skipped().collect(),
        overlapping: batch.overlapping,
        truncated: batch.truncated,
        findings: &by_category,
    })
}
