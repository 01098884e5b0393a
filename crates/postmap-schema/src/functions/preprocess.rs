//! Builtin preprocessing functions.
//!
//! Each function receives the previous step's output. The pipeline never calls
//! them with a missing source value, but `null` can still appear mid-chain.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use postmap_core::dates;

use super::FunctionRegistry;
use crate::duration;
use crate::error::FieldError;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static DISALLOWED_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^\w\s.!?,;:\-()\[\]{}"'@#]"#).expect("valid text-cleaning regex")
});

pub(super) fn register_builtins(registry: &mut FunctionRegistry) {
    registry
        .register_preprocessing("clean_text", clean_text)
        .register_preprocessing("remove_extra_whitespace", remove_extra_whitespace)
        .register_preprocessing("clean_username", remove_extra_whitespace)
        .register_preprocessing("normalize_hashtags", normalize_hashtags)
        .register_preprocessing("extract_hashtag_names", extract_hashtag_names)
        .register_preprocessing("parse_iso_timestamp", parse_iso_timestamp)
        .register_preprocessing("extract_date_only", extract_date_only)
        .register_preprocessing("safe_int", safe_int)
        .register_preprocessing("safe_float", safe_float)
        .register_preprocessing("safe_bool", safe_bool)
        .register_preprocessing("parse_reaction_types", parse_reaction_types)
        .register_preprocessing("parse_attachments", parse_attachments)
        .register_preprocessing("extract_address_from_about", extract_address_from_about)
        .register_preprocessing("parse_duration_seconds", parse_duration_seconds);
}

fn expect_text(value: Value) -> Result<Option<String>, FieldError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(FieldError::type_mismatch("string", &other)),
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Collapses whitespace and strips characters outside word characters and
/// common punctuation (emoji, control characters, symbols).
///
/// # Errors
///
/// Returns [`FieldError::Type`] for non-string input.
pub fn clean_text(value: Value) -> Result<Value, FieldError> {
    let Some(text) = expect_text(value)? else {
        return Ok(json!(""));
    };
    let stripped = DISALLOWED_TEXT_RE.replace_all(&text, "");
    Ok(Value::String(collapse_whitespace(&stripped)))
}

/// Trims and collapses runs of whitespace to a single space.
///
/// # Errors
///
/// Returns [`FieldError::Type`] for non-string input.
pub fn remove_extra_whitespace(value: Value) -> Result<Value, FieldError> {
    let Some(text) = expect_text(value)? else {
        return Ok(json!(""));
    };
    Ok(Value::String(collapse_whitespace(&text)))
}

/// Lowercases hashtags and strips leading `#`, dropping empty tags.
///
/// # Errors
///
/// Returns [`FieldError::Type`] unless the input is an array or a single string.
pub fn normalize_hashtags(value: Value) -> Result<Value, FieldError> {
    let tags = match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![Value::String(s)],
        Value::Array(items) => items,
        other => return Err(FieldError::type_mismatch("array", &other)),
    };
    let normalized: Vec<Value> = tags
        .iter()
        .filter_map(Value::as_str)
        .map(|tag| tag.trim().trim_start_matches('#').trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .map(Value::String)
        .collect();
    Ok(Value::Array(normalized))
}

/// Pulls tag names out of `[{"name": "..."}]` arrays (plain strings are kept).
///
/// # Errors
///
/// Returns [`FieldError::Type`] for non-array input.
pub fn extract_hashtag_names(value: Value) -> Result<Value, FieldError> {
    let items = match value {
        Value::Null => return Ok(json!([])),
        Value::Array(items) => items,
        other => return Err(FieldError::type_mismatch("array", &other)),
    };
    let names: Vec<Value> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .map(|name| Value::String(name.to_string()))
        .collect();
    Ok(Value::Array(names))
}

/// Normalizes a timestamp to RFC 3339 with an explicit offset; unparsable
/// input becomes the current time.
///
/// # Errors
///
/// Never fails.
pub fn parse_iso_timestamp(value: Value) -> Result<Value, FieldError> {
    Ok(Value::String(dates::normalize_timestamp(&value)))
}

/// Reduces a timestamp to its `YYYY-MM-DD` date; unparsable input becomes
/// today's date.
///
/// # Errors
///
/// Never fails.
pub fn extract_date_only(value: Value) -> Result<Value, FieldError> {
    let date = dates::date_key(&value)
        .unwrap_or_else(|| dates::now_rfc3339().chars().take(10).collect());
    Ok(Value::String(date))
}

/// Coerces to an integer. Anything non-numeric becomes `0`.
///
/// # Errors
///
/// Never fails.
pub fn safe_int(value: Value) -> Result<Value, FieldError> {
    Ok(json!(as_int(&value)))
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn as_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Coerces to a float. Anything non-numeric becomes `0.0`.
///
/// # Errors
///
/// Never fails.
pub fn safe_float(value: Value) -> Result<Value, FieldError> {
    Ok(json!(as_float(&value)))
}

pub(crate) fn as_float(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Coerces to a boolean: `true`, non-zero numbers and `"true"`/`"yes"`/`"1"`
/// are true, everything else is false.
///
/// # Errors
///
/// Never fails.
pub fn safe_bool(value: Value) -> Result<Value, FieldError> {
    let flag = match &value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    };
    Ok(Value::Bool(flag))
}

fn object_items(value: Value) -> Result<Vec<Map<String, Value>>, FieldError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(obj) => Some(obj),
                _ => None,
            })
            .collect()),
        other => Err(FieldError::type_mismatch("array", &other)),
    }
}

fn str_or_empty(obj: &Map<String, Value>, key: &str) -> Value {
    match obj.get(key) {
        Some(Value::String(s)) => Value::String(s.clone()),
        Some(Value::Number(n)) => Value::String(n.to_string()),
        _ => Value::String(String::new()),
    }
}

/// `[{"type", "reaction_count"}]` into `[{"type", "count"}]`.
///
/// # Errors
///
/// Returns [`FieldError::Type`] for non-array input.
pub fn parse_reaction_types(value: Value) -> Result<Value, FieldError> {
    let parsed: Vec<Value> = object_items(value)?
        .iter()
        .map(|reaction| {
            json!({
                "type": str_or_empty(reaction, "type"),
                "count": reaction.get("reaction_count").map_or(0, as_int),
            })
        })
        .collect();
    Ok(Value::Array(parsed))
}

/// Keeps the `id`, `type`, `url` and `attachment_url` of each attachment.
///
/// # Errors
///
/// Returns [`FieldError::Type`] for non-array input.
pub fn parse_attachments(value: Value) -> Result<Value, FieldError> {
    let parsed: Vec<Value> = object_items(value)?
        .iter()
        .map(|attachment| {
            json!({
                "id": str_or_empty(attachment, "id"),
                "type": str_or_empty(attachment, "type"),
                "url": str_or_empty(attachment, "url"),
                "attachment_url": str_or_empty(attachment, "attachment_url"),
            })
        })
        .collect();
    Ok(Value::Array(parsed))
}

/// Returns the value of the first `ADDRESS`-typed about section, or `""`.
///
/// # Errors
///
/// Returns [`FieldError::Type`] for non-array input.
pub fn extract_address_from_about(value: Value) -> Result<Value, FieldError> {
    let address = object_items(value)?
        .iter()
        .find(|section| section.get("type").and_then(Value::as_str) == Some("ADDRESS"))
        .and_then(|section| section.get("value").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();
    Ok(Value::String(address))
}

/// ISO 8601, clock-style or raw-second durations to whole seconds.
///
/// # Errors
///
/// Never fails; unparsable durations are `0`.
pub fn parse_duration_seconds(value: Value) -> Result<Value, FieldError> {
    Ok(json!(duration::duration_seconds_of(&value)))
}

#[cfg(test)]
#[path = "preprocess_test.rs"]
mod tests;
