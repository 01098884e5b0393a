use serde_json::Value;

/// Applies a named field validation rule.
///
/// `null` fails every rule. Unrecognized rule names pass, so a schema written
/// for a newer engine still maps.
#[must_use]
pub fn validate_field(value: &Value, rule: &str) -> bool {
    if value.is_null() {
        return false;
    }
    match rule {
        "non_empty_string" => value.as_str().is_some_and(|s| !s.trim().is_empty()),
        "url_format" => value
            .as_str()
            .is_some_and(|s| s.starts_with("http://") || s.starts_with("https://")),
        "email_format" => value
            .as_str()
            .is_some_and(|s| s.contains('@') && s.contains('.')),
        _ => true,
    }
}

/// Truncates strings longer than `max_length` characters, appending `...`.
#[must_use]
pub fn truncate(value: Value, max_length: usize) -> Value {
    match value {
        Value::String(s) if s.chars().count() > max_length => {
            let mut truncated: String = s.chars().take(max_length).collect();
            truncated.push_str("...");
            Value::String(truncated)
        }
        other => other,
    }
}
