//! Serde helpers for loosely-typed payload fields.
//!
//! Notification payloads are written by many different front-end screens, so
//! a field documented as text may arrive as a number (`"rating": 4`), a
//! boolean, or `null`. These helpers accept any JSON scalar and keep the
//! request valid; only the meaning of the value is resolved here.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize any JSON value into optional text.
///
/// `null`, a missing key, and the empty string all become `None`, so
/// `field.or(fallback)` behaves like a truthiness fallback. Numbers and
/// booleans are rendered with their JSON spelling; arrays and objects are
/// kept as compact JSON.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

fn value_to_text(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
