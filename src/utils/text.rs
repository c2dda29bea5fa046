//! Text helpers for payloads crossing the engine boundary.

use serde_json::Value;

/// Converts an inbound payload to printable text.
///
/// Strings pass through untouched, a missing or `null` payload becomes the
/// empty string, and anything else is rendered as compact JSON.
pub fn payload_text(payload: Option<&Value>) -> String {
    match payload {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Rewrites the first bare `\n` to `\r\n` for a raw-mode terminal.
///
/// Later newlines stay bare. Text that already contains a `\r\n` anywhere is
/// returned unchanged.
pub fn normalize_line_endings(text: &str) -> String {
    if text.contains("\r\n") {
        text.to_string()
    } else {
        text.replacen('\n', "\r\n", 1)
    }
}
