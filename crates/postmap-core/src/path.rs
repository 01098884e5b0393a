//! Dot-path addressing over JSON trees.
//!
//! Reads never fail: an absent segment, a non-object intermediate or a JSON
//! `null` leaf all read as "missing". Writes create intermediate objects on
//! demand and refuse to descend through a non-object value.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("empty field path")]
    Empty,

    #[error("cannot write '{path}': segment '{segment}' holds a non-object value")]
    NotAnObject { path: String, segment: String },
}

/// Short JSON type name for diagnostics.
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Looks up `path` (e.g. `authorMeta.fans`) starting at `root`.
///
/// Returns `None` when any segment is absent or the final value is `null`.
#[must_use]
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Same as [`lookup`] but rooted at an object map.
#[must_use]
pub fn lookup_in<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let first = root.get(head)?;
    match rest {
        Some(rest) => lookup(first, rest),
        None if first.is_null() => None,
        None => Some(first),
    }
}

/// Writes `value` at `path`, creating intermediate objects as needed.
///
/// # Errors
///
/// Returns [`PathError::Empty`] for an empty path and
/// [`PathError::NotAnObject`] when an intermediate segment already holds a
/// scalar or array.
pub fn insert(root: &mut Map<String, Value>, path: &str, value: Value) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let mut segments = path.split('.').peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return Ok(());
        }
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(map) => map,
            _ => {
                return Err(PathError::NotAnObject {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })
            }
        };
    }
    Ok(())
}
