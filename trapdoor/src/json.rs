//! Serialization collaborator: raw-text decoding with the temporal
//! quote-wrapping rule, plus lossy/pretty rendering helpers for the
//! transport layer.

use serde_json::Value;

use crate::method::TypeTag;

/// Decodes a raw wire fragment against a declared parameter type.
///
/// Temporal parameters are routinely submitted as bare text
/// (`2023-01-01T00:00:00`), which is not valid JSON on its own. For a
/// `DateTime` tag the text is quote-wrapped before decoding unless the
/// caller already quoted it, so both forms decode to the same value.
pub fn decode_typed(text: &str, tag: &TypeTag) -> serde_json::Result<Value> {
    if matches!(tag, TypeTag::DateTime) {
        let trimmed = text.trim();
        if !trimmed.starts_with('"') {
            return serde_json::from_str(&format!("\"{}\"", trimmed));
        }
    }
    serde_json::from_str(text)
}

/// Renders a value as plain text without ever failing: strings pass
/// through unquoted, null becomes `None`, anything else serializes.
/// Serialization failures are logged at debug and collapse to `None`.
pub fn to_text_lossy(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => match serde_json::to_string(other) {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("to_text_lossy serialization failed: {}", err);
                None
            }
        },
    }
}

/// Pretty-printed rendering for operator-facing output.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
