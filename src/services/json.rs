//! Tolerant JSON handling for model replies and submitted text
//!
//! Models wrap JSON in markdown fences, prepend chatter, or leak raw
//! control characters into string values. These helpers recover the
//! payload without guessing at its contents.

use crate::error::{Result, SocratisError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Control characters other than tab, newline and carriage return
static INVALID_CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F]").expect("Valid control character regex")
});

/// Every C0 control character
static ALL_CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x1F]").expect("Valid control character regex"));

/// Remove control characters that are never valid in essay text or JSON,
/// keeping `\t`, `\n` and `\r`
pub fn strip_control_chars(text: &str) -> String {
    INVALID_CONTROL_CHARS.replace_all(text, "").into_owned()
}

/// Remove invalid control characters and normalise line endings to `\n`
pub fn sanitize_text(text: &str) -> String {
    strip_control_chars(text)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Locate the JSON document inside a model reply
///
/// Strips a surrounding markdown code fence and any prose before the first
/// `{`/`[` or after the matching last `}`/`]`.
pub fn extract_json_payload(reply: &str) -> Option<&str> {
    let mut body = reply.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string ("json") on the opening fence line
        body = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest,
        };
        body = body.trim_end();
        body = body.strip_suffix("```").unwrap_or(body).trim();
    }

    let start = body.find(['{', '['])?;
    let closing = if body[start..].starts_with('{') { '}' } else { ']' };
    let end = body.rfind(closing)?;
    if end < start {
        return None;
    }

    Some(&body[start..=end])
}

/// Parse a model reply into `T`
///
/// First attempt removes only invalid control characters; if that fails,
/// every control character is removed (raw newlines inside string values
/// are the usual culprit) and parsing is retried.
pub fn parse_model_json<T: DeserializeOwned>(agent: &str, reply: &str) -> Result<T> {
    let payload = extract_json_payload(reply).ok_or_else(|| SocratisError::InvalidResponse {
        agent: agent.to_string(),
        reason: "no JSON document found in reply".to_string(),
    })?;

    let cleaned = strip_control_chars(payload);
    match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!(
                "First JSON parse for agent '{}' failed ({}), retrying without control characters",
                agent, first
            );
            let stripped = ALL_CONTROL_CHARS.replace_all(&cleaned, "");
            serde_json::from_str::<T>(&stripped).map_err(|_| SocratisError::InvalidResponse {
                agent: agent.to_string(),
                reason: first.to_string(),
            })
        }
    }
}
