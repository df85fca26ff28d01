//! Fuzzy span location
//!
//! Maps an excerpt quoted by a model back to exact offsets in the essay.
//! Models usually get the words right and the whitespace wrong, so the
//! locator tries three strategies, strictest first:
//!
//! 1. **Paragraph**: exact match inside the hinted paragraph
//! 2. **Exact**: first exact match anywhere
//! 3. **Whitespace**: same tokens in order, any whitespace run between them
//!
//! Nothing looser than tier 3 is ever accepted: a located span always
//! contains the excerpt's tokens verbatim.

use super::segmenter::paragraph_spans;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

/// Which strategy produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Exact match inside the hinted paragraph
    Paragraph,
    /// Exact match in the whole text
    Exact,
    /// Token match tolerating whitespace differences
    Whitespace,
}

/// Result of a successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSpan {
    /// Byte range into the text, on char boundaries
    pub range: Range<usize>,
    pub tier: MatchTier,
}

impl LocatedSpan {
    /// The matched text; may differ from the excerpt for whitespace matches
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.range.clone()]
    }
}

/// Find `excerpt` in `text`
///
/// `paragraph_hint` is 1-based; out-of-range hints are ignored. Returns
/// `None` for empty text, blank excerpts, or when no strategy matches.
pub fn locate(text: &str, excerpt: &str, paragraph_hint: Option<usize>) -> Option<LocatedSpan> {
    if text.is_empty() || excerpt.trim().is_empty() {
        return None;
    }

    if let Some(hint) = paragraph_hint {
        if let Some(range) = find_in_paragraph(text, excerpt, hint) {
            return Some(LocatedSpan {
                range,
                tier: MatchTier::Paragraph,
            });
        }
    }

    if let Some(start) = text.find(excerpt) {
        return Some(LocatedSpan {
            range: start..start + excerpt.len(),
            tier: MatchTier::Exact,
        });
    }

    find_whitespace_tolerant(text, excerpt).map(|range| LocatedSpan {
        range,
        tier: MatchTier::Whitespace,
    })
}

fn find_in_paragraph(text: &str, excerpt: &str, hint: usize) -> Option<Range<usize>> {
    let spans = paragraph_spans(text);
    if hint == 0 || hint > spans.len() {
        debug!(
            "Paragraph hint {} out of range ({} paragraphs), ignoring",
            hint,
            spans.len()
        );
        return None;
    }

    let paragraph = &spans[hint - 1];
    text[paragraph.clone()].find(excerpt).map(|local| {
        let start = paragraph.start + local;
        start..start + excerpt.len()
    })
}

/// Build a pattern matching the excerpt's tokens separated by any whitespace
fn tolerant_pattern(excerpt: &str) -> Option<Regex> {
    let tokens: Vec<String> = excerpt.split_whitespace().map(regex::escape).collect();
    if tokens.is_empty() {
        return None;
    }

    match Regex::new(&tokens.join(r"\s+")) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!("Could not build whitespace-tolerant pattern: {}", e);
            None
        }
    }
}

fn find_whitespace_tolerant(text: &str, excerpt: &str) -> Option<Range<usize>> {
    tolerant_pattern(excerpt)?.find(text).map(|m| m.range())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_match() {
        let text = "A educação é importante.";
        let span = locate(text, "é importante", None).unwrap();
        assert_eq!(span.tier, MatchTier::Exact);
        assert_eq!(span.text(text), "é importante");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "o tema e o tema";
        let span = locate(text, "o tema", None).unwrap();
        assert_eq!(span.range, 0..6);
    }

    #[test]
    fn test_whitespace_tolerance() {
        let text = "hello   world";
        let span = locate(text, "hello world", None).unwrap();
        assert_eq!(span.tier, MatchTier::Whitespace);
        assert_eq!(span.range, 0..text.len());
        assert_eq!(span.text(text), "hello   world");
    }

    #[test]
    fn test_whitespace_tolerance_across_line_break() {
        let text = "A sociedade\nbrasileira enfrenta desafios.";
        let span = locate(text, "sociedade brasileira", None).unwrap();
        assert_eq!(span.text(text), "sociedade\nbrasileira");
    }

    #[test]
    fn test_excerpt_with_extra_whitespace() {
        let text = "Ela muda vidas.";
        let span = locate(text, "  Ela   muda\nvidas ", None).unwrap();
        assert_eq!(span.text(text), "Ela muda vidas");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(locate("abc", "xyz", None), None);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(locate("", "abc", None), None);
        assert_eq!(locate("abc", "", None), None);
        assert_eq!(locate("a b c", "   ", None), None);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        // "a.b" must not match "axb" through the regex tier
        assert_eq!(locate("axb", "a.b", None), None);

        let text = "custa R$ 10 (dez) reais";
        let span = locate(text, "R$  10 (dez)", None).unwrap();
        assert_eq!(span.tier, MatchTier::Whitespace);
        assert_eq!(span.text(text), "R$ 10 (dez)");
    }

    #[test]
    fn test_paragraph_hint_precedence() {
        let text = "Primeiro falamos sobre o tema.\n\nDepois voltamos a o tema central.";
        let spans = paragraph_spans(text);

        let span = locate(text, "o tema", Some(2)).unwrap();
        assert_eq!(span.tier, MatchTier::Paragraph);
        assert!(span.range.start >= spans[1].start && span.range.end <= spans[1].end);
        assert_eq!(span.text(text), "o tema");

        // Without a hint the earlier occurrence wins
        let unhinted = locate(text, "o tema", None).unwrap();
        assert!(unhinted.range.end <= spans[0].end);
    }

    #[test]
    fn test_invalid_hint_falls_through() {
        let text = "Um parágrafo.\n\nOutro parágrafo.";
        for hint in [0, 3, 99] {
            let span = locate(text, "Outro", Some(hint)).unwrap();
            assert_eq!(span.tier, MatchTier::Exact);
            assert_eq!(span.text(text), "Outro");
        }
    }

    #[test]
    fn test_hint_without_local_match_uses_global_search() {
        let text = "Frase longa no início.\n\nCurta.";
        let span = locate(text, "Frase longa", Some(2)).unwrap();
        assert_eq!(span.tier, MatchTier::Exact);
        assert_eq!(span.range.start, 0);
    }

    #[test]
    fn test_end_to_end_excerpt_with_hint() {
        let text = "A educação é importante.\n\nEla muda   vidas.";
        let span = locate(text, "Ela muda vidas", Some(2)).unwrap();
        assert_eq!(span.tier, MatchTier::Whitespace);
        assert_eq!(span.text(text), "Ela muda   vidas");
        assert_eq!(span.range.start, text.find("Ela").unwrap());
    }

    proptest! {
        #[test]
        fn prop_exact_substring_is_found(
            text in "[a-zé ,.\n]{1,60}",
            a in 0usize..60,
            b in 0usize..60,
        ) {
            let chars: Vec<(usize, char)> = text.char_indices().collect();
            let (x, y) = (a % chars.len(), b % chars.len());
            let (i, j) = (x.min(y), x.max(y));
            let start = chars[i].0;
            let end = chars[j].0 + chars[j].1.len_utf8();
            let excerpt = &text[start..end];
            prop_assume!(!excerpt.trim().is_empty());

            let span = locate(&text, excerpt, None).unwrap();
            prop_assert_eq!(span.tier, MatchTier::Exact);
            prop_assert_eq!(&text[span.range.clone()], excerpt);
            prop_assert_eq!(span.range.start, text.find(excerpt).unwrap());
        }

        #[test]
        fn prop_located_spans_are_in_bounds(
            text in "[a-z \n]{0,40}",
            excerpt in "[a-z ]{0,8}",
            hint in proptest::option::of(0usize..4),
        ) {
            if let Some(span) = locate(&text, &excerpt, hint) {
                prop_assert!(span.range.start <= span.range.end);
                prop_assert!(span.range.end <= text.len());
                prop_assert!(!span.text(&text).trim().is_empty());
            }
        }
    }
}
