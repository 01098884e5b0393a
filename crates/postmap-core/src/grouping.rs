//! Platform-aware upload-date grouping.
//!
//! Records are partitioned by when the content was published on its platform,
//! never by when it was crawled. Anything without a usable upload date lands in
//! the [`UNKNOWN_DATE`] bucket.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates;
use crate::path;
use crate::platform::Platform;
use crate::record::CanonicalRecord;

/// Group key for items whose upload date is absent or unparsable.
pub const UNKNOWN_DATE: &str = "unknown";

/// Date key (`YYYY-MM-DD` or [`UNKNOWN_DATE`]) to the items published that day.
pub type DateGroups<T> = BTreeMap<String, Vec<T>>;

/// Extracts the upload date of a raw post as `YYYY-MM-DD`.
///
/// Returns [`UNKNOWN_DATE`] when the platform is not recognized or the
/// platform's native date field is absent, `null` or unparsable.
#[must_use]
pub fn extract_upload_date(raw_post: &Value, platform: &str) -> String {
    let Ok(platform) = platform.parse::<Platform>() else {
        tracing::warn!(platform, "unknown platform, upload date unavailable");
        return UNKNOWN_DATE.to_string();
    };
    upload_date_of(raw_post, platform)
}

/// Typed variant of [`extract_upload_date`] for an already-resolved platform.
#[must_use]
pub fn upload_date_of(raw_post: &Value, platform: Platform) -> String {
    let field = platform.upload_date_field();
    let Some(value) = path::lookup(raw_post, field) else {
        let post_id = platform.post_id(raw_post).unwrap_or_default();
        tracing::warn!(
            platform = %platform,
            field,
            post_id = %post_id,
            "upload date field missing"
        );
        return UNKNOWN_DATE.to_string();
    };

    dates::date_key(value).unwrap_or_else(|| {
        tracing::warn!(platform = %platform, field, value = %value, "failed to parse upload date");
        UNKNOWN_DATE.to_string()
    })
}

/// Anything that can be bucketed by upload date.
pub trait UploadDated {
    /// `YYYY-MM-DD` or [`UNKNOWN_DATE`].
    fn upload_date_key(&self) -> String;

    /// Platform name used for the per-platform distribution in summaries.
    fn platform_name(&self) -> &str;
}

/// A raw post tagged with the platform it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedPost {
    pub platform: String,
    #[serde(default)]
    pub raw_data: Value,
}

impl TaggedPost {
    #[must_use]
    pub fn new(platform: impl Into<String>, raw_data: Value) -> Self {
        Self {
            platform: platform.into(),
            raw_data,
        }
    }
}

impl UploadDated for TaggedPost {
    fn upload_date_key(&self) -> String {
        extract_upload_date(&self.raw_data, &self.platform)
    }

    fn platform_name(&self) -> &str {
        &self.platform
    }
}

impl UploadDated for CanonicalRecord {
    fn upload_date_key(&self) -> String {
        if let Some(key) = self.grouped_date() {
            return key.to_string();
        }
        self.get("date_posted")
            .and_then(dates::date_key)
            .unwrap_or_else(|| UNKNOWN_DATE.to_string())
    }

    fn platform_name(&self) -> &str {
        self.get_str("platform").unwrap_or(UNKNOWN_DATE)
    }
}

/// Buckets `items` by upload date, preserving input order within each bucket.
pub fn group_by_upload_date<T, I>(items: I) -> DateGroups<T>
where
    T: UploadDated,
    I: IntoIterator<Item = T>,
{
    let mut groups: DateGroups<T> = BTreeMap::new();
    let mut total = 0usize;
    for item in items {
        total += 1;
        groups.entry(item.upload_date_key()).or_default().push(item);
    }

    tracing::info!(total, groups = groups.len(), "grouped items by upload date");
    for (date, items) in &groups {
        tracing::debug!(date = %date, count = items.len(), "date group");
    }
    groups
}

/// Distribution statistics for a set of date groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadDateSummary {
    pub total_date_groups: usize,
    /// Number of groups keyed by a real date.
    pub valid_dates: usize,
    /// Number of items in the [`UNKNOWN_DATE`] group.
    pub unknown_dates: usize,
    pub total_posts: usize,
    pub platform_distribution: BTreeMap<String, usize>,
    pub earliest_upload_date: Option<String>,
    pub latest_upload_date: Option<String>,
    /// Inclusive span between earliest and latest date; 0 with no valid dates.
    pub date_range_days: i64,
}

#[must_use]
pub fn upload_date_summary<T: UploadDated>(groups: &DateGroups<T>) -> UploadDateSummary {
    let mut platform_distribution = BTreeMap::new();
    for item in groups.values().flatten() {
        *platform_distribution
            .entry(item.platform_name().to_string())
            .or_insert(0) += 1;
    }

    // BTreeMap keys are already sorted, and ISO dates sort chronologically.
    let valid: Vec<&String> = groups.keys().filter(|k| *k != UNKNOWN_DATE).collect();
    let earliest = valid.first().map(|s| (*s).clone());
    let latest = valid.last().map(|s| (*s).clone());

    let date_range_days = match (&earliest, &latest) {
        (Some(first), Some(last)) => {
            let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
            match (parse(first), parse(last)) {
                (Some(a), Some(b)) => (b - a).num_days() + 1,
                _ => 0,
            }
        }
        _ => 0,
    };

    UploadDateSummary {
        total_date_groups: groups.len(),
        valid_dates: valid.len(),
        unknown_dates: groups.get(UNKNOWN_DATE).map_or(0, Vec::len),
        total_posts: groups.values().map(Vec::len).sum(),
        platform_distribution,
        earliest_upload_date: earliest,
        latest_upload_date: latest,
        date_range_days,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn facebook_uses_date_posted() {
        let post = json!({"date_posted": "2024-12-24T13:30:14.000Z"});
        assert_eq!(extract_upload_date(&post, "facebook"), "2024-12-24");
    }

    #[test]
    fn tiktok_uses_create_time_iso() {
        let post = json!({"createTimeISO": "2025-06-30T08:00:00.000Z", "date_posted": "2020-01-01"});
        assert_eq!(extract_upload_date(&post, "tiktok"), "2025-06-30");
    }

    #[test]
    fn youtube_uses_date() {
        let post = json!({"date": "2025-07-08T10:41:45.000Z"});
        assert_eq!(extract_upload_date(&post, "YouTube"), "2025-07-08");
    }

    #[test]
    fn unknown_platform_yields_sentinel() {
        let post = json!({"date_posted": "2024-12-24"});
        assert_eq!(extract_upload_date(&post, "myspace"), UNKNOWN_DATE);
    }

    #[test]
    fn missing_null_and_garbage_yield_sentinel() {
        assert_eq!(extract_upload_date(&json!({}), "facebook"), UNKNOWN_DATE);
        assert_eq!(
            extract_upload_date(&json!({"date_posted": null}), "facebook"),
            UNKNOWN_DATE
        );
        assert_eq!(
            extract_upload_date(&json!({"date_posted": "soon"}), "facebook"),
            UNKNOWN_DATE
        );
    }

    #[test]
    fn canonical_record_prefers_grouped_date() {
        let record = CanonicalRecord::from(
            json!({"grouped_date": "2024-12-24", "date_posted": "2025-01-01T00:00:00+00:00"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(record.upload_date_key(), "2024-12-24");
    }

    #[test]
    fn canonical_record_falls_back_to_date_posted() {
        let record = CanonicalRecord::from(
            json!({"date_posted": "2025-01-01T00:00:00+00:00", "platform": "tiktok"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(record.upload_date_key(), "2025-01-01");
        assert_eq!(record.platform_name(), "tiktok");
    }

    #[test]
    fn summary_of_empty_groups_is_zeroed() {
        let groups: DateGroups<TaggedPost> = BTreeMap::new();
        let summary = upload_date_summary(&groups);
        assert_eq!(summary, UploadDateSummary::default());
    }
}
