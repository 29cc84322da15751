//! Permissive JSON recovery for model output.
//!
//! Models asked for "only JSON" still wrap it in code fences, lead with
//! "Sure!" or trail off with commentary. Recovery strips fences, skips to the
//! first `{`, and cuts at the brace that closes it. Braces inside string
//! values (and escaped quotes) do not count toward nesting.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("no JSON object found in model output")]
    NoObject,

    #[error("JSON object in model output is never closed")]
    Unbalanced,

    #[error("recovered JSON object is invalid: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// Either marker is removed on its own if the other is missing.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scan {
    Structure,
    InString,
    Escaped,
}

/// Returns the first balanced `{ ... }` span in `text`.
pub fn locate_json_object(text: &str) -> Result<&str, RecoveryError> {
    let start = text.find('{').ok_or(RecoveryError::NoObject)?;
    let candidate = &text[start..];

    let mut state = Scan::Structure;
    let mut depth = 0usize;
    for (offset, ch) in candidate.char_indices() {
        state = match (state, ch) {
            (Scan::Structure, '"') => Scan::InString,
            (Scan::Structure, '{') => {
                depth += 1;
                Scan::Structure
            }
            (Scan::Structure, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&candidate[..offset + ch.len_utf8()]);
                }
                Scan::Structure
            }
            (Scan::Structure, _) => Scan::Structure,
            (Scan::InString, '\\') => Scan::Escaped,
            (Scan::InString, '"') => Scan::Structure,
            (Scan::InString, _) => Scan::InString,
            (Scan::Escaped, _) => Scan::InString,
        };
    }

    Err(RecoveryError::Unbalanced)
}

/// Full recovery: fences → first balanced object → parsed JSON object.
pub fn recover_json_object(raw: &str) -> Result<Map<String, Value>, RecoveryError> {
    let object = locate_json_object(strip_json_fences(raw))?;
    match serde_json::from_str::<Value>(object)? {
        Value::Object(map) => Ok(map),
        // locate_json_object always yields a `{...}` span
        _ => Err(RecoveryError::NoObject),
    }
}
