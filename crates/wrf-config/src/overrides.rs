//! `key=value` command-line overrides.

use indexmap::IndexMap;

use crate::error::{ConfigError, Result};
use crate::value::Value;

/// Parse a single `key=value` override.
///
/// The key may carry an `@domain.` prefix. Everything after the first `=`
/// is the value, so values may themselves contain `=`.
pub fn parse_override(text: &str) -> Result<(String, Value)> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| ConfigError::invalid_value(text, "expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::InvalidPath(text.to_string()));
    }
    Ok((key.to_string(), parse_scalar(value)))
}

/// Integer if it parses as one, then float, otherwise the raw string.
pub fn parse_scalar(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::Int(i);
    }
    match text.parse::<f64>() {
        Ok(x) if x.is_finite() => Value::Float(x),
        _ => Value::Str(text.to_string()),
    }
}

/// Parse a list of overrides. When a key repeats, the last value wins and
/// keeps the position of the first occurrence.
pub fn collect_overrides<S: AsRef<str>>(items: &[S]) -> Result<IndexMap<String, Value>> {
    let mut out = IndexMap::with_capacity(items.len());
    for item in items {
        let (key, value) = parse_override(item.as_ref())?;
        out.insert(key, value);
    }
    Ok(out)
}
