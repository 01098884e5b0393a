//! Video duration parsing.
//!
//! Platforms report durations as ISO 8601 (`PT4M13S`), clock strings
//! (`4:13`, `1:23:45`) or raw seconds. All of them normalize to whole seconds;
//! anything unparsable is `0`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static ISO_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .expect("valid duration regex")
});

/// Parses a duration string into whole seconds.
#[must_use]
pub fn parse_duration_seconds(raw: &str) -> u64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0;
    }

    if let Some(caps) = ISO_DURATION_RE.captures(s) {
        let part = |idx: usize| -> f64 {
            caps.get(idx)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        let total = part(1) * 86_400.0 + part(2) * 3_600.0 + part(3) * 60.0 + part(4);
        return whole_seconds(total);
    }

    if s.contains(':') {
        return parse_clock(s).unwrap_or(0);
    }

    s.parse::<f64>().map_or(0, whole_seconds)
}

/// Same as [`parse_duration_seconds`] for an arbitrary JSON value.
///
/// Numbers are taken as seconds already.
#[must_use]
pub fn duration_seconds_of(value: &Value) -> u64 {
    match value {
        Value::String(s) => parse_duration_seconds(s),
        Value::Number(n) => n.as_f64().map_or(0, whole_seconds),
        _ => 0,
    }
}

fn parse_clock(s: &str) -> Option<u64> {
    let parts: Vec<u64> = s
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [m, sec] => m.checked_mul(60)?.checked_add(*sec),
        [h, m, sec] => h
            .checked_mul(3_600)?
            .checked_add(m.checked_mul(60)?)?
            .checked_add(*sec),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    }
}
