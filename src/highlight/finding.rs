//! Uniform findings from heterogeneous analyzer records
//!
//! Grammar errors and logic problems carry different fields. Each record is
//! converted once into a `Finding`; nothing downstream probes records for
//! optional fields.

use crate::types::{paragraph_from_value, GrammarError, LogicProblem};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// Analyzer a finding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FindingCategory {
    #[serde(rename = "gramatica")]
    Grammar,
    #[serde(rename = "logica")]
    Logic,
}

impl FindingCategory {
    /// Wire name, also the default `kind` for records that omit one
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::Grammar => "gramatica",
            FindingCategory::Logic => "logica",
        }
    }

    /// Whether records of this category carry a paragraph number
    fn has_paragraph(&self) -> bool {
        match self {
            FindingCategory::Grammar => false,
            FindingCategory::Logic => true,
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One issue raised by an analyzer, before location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub excerpt: String,
    pub category: FindingCategory,
    pub kind: String,
    pub explanation: String,
    pub suggestion: String,
    /// 1-based paragraph number suggested by the analyzer
    pub paragraph_hint: Option<usize>,
}

/// Why a record produced no highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Raw record is not a JSON object
    NotAnObject,
    /// Record has no string excerpt
    MissingExcerpt,
    /// Excerpt is empty or whitespace
    EmptyExcerpt,
    /// No location strategy matched the excerpt
    NotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SkipReason::NotAnObject => "record is not an object",
            SkipReason::MissingExcerpt => "record has no excerpt",
            SkipReason::EmptyExcerpt => "excerpt is empty",
            SkipReason::NotFound => "excerpt not found in text",
        };
        write!(f, "{}", msg)
    }
}

/// A record that can be turned into a finding and receive its resolved position
pub trait Anchor {
    fn category(&self) -> FindingCategory;

    fn finding(&self) -> Result<Finding, SkipReason>;

    /// Store the resolved character range and the exact matched text on the record
    fn backfill(&mut self, range: Range<usize>, exact: &str);
}

fn kind_or_default(kind: &str, category: FindingCategory) -> String {
    if kind.trim().is_empty() {
        category.as_str().to_string()
    } else {
        kind.to_string()
    }
}

impl Anchor for GrammarError {
    fn category(&self) -> FindingCategory {
        FindingCategory::Grammar
    }

    fn finding(&self) -> Result<Finding, SkipReason> {
        Ok(Finding {
            excerpt: self.excerpt.clone(),
            category: FindingCategory::Grammar,
            kind: kind_or_default(&self.kind, FindingCategory::Grammar),
            explanation: self.explanation.clone(),
            suggestion: self.suggestion.clone(),
            paragraph_hint: None,
        })
    }

    fn backfill(&mut self, range: Range<usize>, exact: &str) {
        self.start = Some(range.start);
        self.end = Some(range.end);
        self.excerpt = exact.to_string();
    }
}

impl Anchor for LogicProblem {
    fn category(&self) -> FindingCategory {
        FindingCategory::Logic
    }

    fn finding(&self) -> Result<Finding, SkipReason> {
        Ok(Finding {
            excerpt: self.excerpt.clone(),
            category: FindingCategory::Logic,
            kind: kind_or_default(&self.kind, FindingCategory::Logic),
            explanation: self.explanation.clone(),
            suggestion: self.suggestion.clone(),
            paragraph_hint: self.paragraph.filter(|p| *p > 0),
        })
    }

    fn backfill(&mut self, range: Range<usize>, exact: &str) {
        self.start = Some(range.start);
        self.end = Some(range.end);
        self.excerpt = exact.to_string();
    }
}

/// A raw JSON record as produced by an analyzer, tagged with its category
pub struct RawRecord<'a> {
    pub category: FindingCategory,
    pub value: &'a mut Value,
}

impl Anchor for RawRecord<'_> {
    fn category(&self) -> FindingCategory {
        self.category
    }

    fn finding(&self) -> Result<Finding, SkipReason> {
        finding_from_value(self.category, &*self.value)
    }

    fn backfill(&mut self, range: Range<usize>, exact: &str) {
        if let Value::Object(map) = &mut *self.value {
            map.insert("posicao_inicio".to_string(), Value::from(range.start));
            map.insert("posicao_fim".to_string(), Value::from(range.end));
            map.insert("trecho".to_string(), Value::from(exact));
        } else {
            debug!("Cannot backfill a non-object {} record", self.category);
        }
    }
}

/// Convert one raw analyzer record into a finding
///
/// Both categories use `trecho`, `tipo`, `explicacao` and `sugestao`; logic
/// records add `paragrafo`. Missing optional text fields become empty.
pub fn finding_from_value(category: FindingCategory, value: &Value) -> Result<Finding, SkipReason> {
    let record = value.as_object().ok_or(SkipReason::NotAnObject)?;

    let excerpt = record
        .get("trecho")
        .and_then(Value::as_str)
        .ok_or(SkipReason::MissingExcerpt)?;

    let text_field = |key: &str| {
        record
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let paragraph_hint = if category.has_paragraph() {
        record.get("paragrafo").and_then(paragraph_from_value)
    } else {
        None
    };

    Ok(Finding {
        excerpt: excerpt.to_string(),
        category,
        kind: kind_or_default(&text_field("tipo"), category),
        explanation: text_field("explicacao"),
        suggestion: text_field("sugestao"),
        paragraph_hint,
    })
}

/// A raw record that could not be normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub category: FindingCategory,
    /// Position of the record within its category
    pub index: usize,
    pub reason: SkipReason,
}

/// Findings normalized from raw records, plus the records that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFindings {
    pub findings: Vec<Finding>,
    pub skipped: Vec<SkippedRecord>,
}

/// Normalize raw records grouped by category
///
/// A malformed record is skipped with its reason; the rest are still
/// processed. Output follows category order, then record order.
pub fn normalize(by_category: &BTreeMap<FindingCategory, Vec<Value>>) -> NormalizedFindings {
    let mut normalized = NormalizedFindings::default();

    for (category, records) in by_category {
        for (index, record) in records.iter().enumerate() {
            match finding_from_value(*category, record) {
                Ok(finding) => normalized.findings.push(finding),
                Err(reason) => {
                    debug!("Skipping {} record {}: {}", category, index, reason);
                    normalized.skipped.push(SkippedRecord {
                        category: *category,
                        index,
                        reason,
                    });
                }
            }
        }
    }

    normalized
}
