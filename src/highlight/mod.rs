//! Highlight resolution
//!
//! Turns the excerpts that analyzers quote back into exact, non-overlapping
//! spans of the essay:
//!
//! - `segmenter`: paragraph boundaries
//! - `locator`: paragraph-hinted, exact, then whitespace-tolerant matching
//! - `finding`: uniform findings from typed or raw JSON records
//! - `merger`: first-by-position overlap resolution with a cap
//! - `engine`: the pipeline, with per-record outcomes and backfill
//! - `theme`: keyword-overlap theme adherence
//!
//! Everything here is synchronous and operates on borrowed text. Matching
//! works on byte ranges; highlights and backfilled records carry character
//! offsets.

pub mod engine;
pub mod finding;
pub mod locator;
pub mod merger;
pub mod patterns;
pub mod segmenter;
pub mod theme;

pub use engine::{HighlightBatch, HighlightEngine, ItemOutcome, ItemReport, DEFAULT_HIGHLIGHT_LIMIT};
pub use finding::{
    finding_from_value, normalize, Anchor, Finding, FindingCategory, NormalizedFindings, RawRecord,
    SkipReason, SkippedRecord,
};
pub use locator::{locate, LocatedSpan, MatchTier};
pub use merger::{char_range, HighlightSpan, MergeOutcome, SpanMerger};
pub use segmenter::paragraph_spans;
pub use theme::{ThemeAdherence, ThemeEstimator};
