//! Paragraph listing command

use serde::Serialize;
use socratis_core::{error::Result, highlight::char_range, paragraph_spans};
use std::path::Path;

use super::helpers::{print_json, read_essay};

#[derive(Serialize)]
struct Paragraph<'a> {
    #[serde(rename = "paragrafo")]
    number: usize,
    #[serde(rename = "inicio")]
    start: usize,
    #[serde(rename = "fim")]
    end: usize,
    #[serde(rename = "texto")]
    text: &'a str,
}

/// Handle paragraphs command
pub fn handle(essay: &Path) -> Result<()> {
    let text = read_essay(essay)?;
    let paragraphs: Vec<Paragraph> = paragraph_spans(&text)
        .into_iter()
        .enumerate()
        .map(|(i, span)| {
            let chars = char_range(&text, span.clone());
            Paragraph {
                number: i + 1,
                start: chars.start,
                end: chars.end,
                text: &text[span],
            }
        })
        .collect();

    print_json(&paragraphs)
}
