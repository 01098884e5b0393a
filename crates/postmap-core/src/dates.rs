//! Timestamp normalization and date-key extraction.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Current wall-clock time as an RFC 3339 string with an explicit `+00:00` offset.
#[must_use]
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Normalizes a raw timestamp, falling back to the current time when it cannot
/// be understood.
#[must_use]
pub fn normalize_timestamp(raw: &Value) -> String {
    try_normalize_timestamp(raw).unwrap_or_else(now_rfc3339)
}

/// Normalizes a raw timestamp into an RFC 3339 string with an explicit offset.
///
/// - `2024-12-24T13:30:14.000Z` becomes `2024-12-24T13:30:14.000+00:00`
/// - timestamps without an offset are taken as UTC
/// - bare dates become UTC midnight
/// - numbers (or numeric strings) are Unix epoch seconds
#[must_use]
pub fn try_normalize_timestamp(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => normalize_str(s.trim()),
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        _ => None,
    }
}

fn normalize_str(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }

    if s.contains('T') {
        let candidate = match s.strip_suffix('Z') {
            Some(head) => format!("{head}+00:00"),
            None => s.to_string(),
        };
        if DateTime::parse_from_rfc3339(&candidate).is_ok() {
            return Some(candidate);
        }
        return NAIVE_FORMATS
            .iter()
            .find(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
            .map(|_| format!("{s}+00:00"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt).to_rfc3339_opts(SecondsFormat::Secs, false));
    }

    s.parse::<f64>().ok().and_then(from_epoch)
}

#[allow(clippy::cast_possible_truncation)]
fn from_epoch(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.trunc() as i64;
    let nanos = ((seconds - seconds.trunc()) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    Utc.timestamp_opt(whole, nanos)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false))
}

/// Extracts the `YYYY-MM-DD` calendar date a raw timestamp falls on.
///
/// ISO timestamps contribute the part before `T`; anything else contributes its
/// first ten characters. Epoch numbers are converted through UTC. Returns
/// `None` when the result is not a valid calendar date.
#[must_use]
pub fn date_key(raw: &Value) -> Option<String> {
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => {
            return n
                .as_f64()
                .and_then(from_epoch)
                .and_then(|ts| date_key(&Value::String(ts)));
        }
        _ => return None,
    };

    let candidate: String = match text.split_once('T') {
        Some((date, _)) => date.to_string(),
        None => text.chars().take(10).collect(),
    };

    NaiveDate::parse_from_str(&candidate, "%Y-%m-%d")
        .ok()
        .map(|_| candidate)
}
