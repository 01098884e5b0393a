//! Per-platform data-quality scoring.
//!
//! Each platform weighs the presence of content, engagement, media, identity
//! and date differently, but every score is a float in `[0.0, 1.0]`.

use serde_json::Value;

use postmap_core::{CanonicalRecord, Platform};

use crate::functions::preprocess::as_float;

/// True for non-empty strings and collections, non-zero numbers and `true`.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

fn positive(record: &CanonicalRecord, path: &str) -> bool {
    record.get(path).map_or(0.0, as_float) > 0.0
}

fn present(record: &CanonicalRecord, path: &str) -> bool {
    is_truthy(record.get(path))
}

/// Sums the weights of satisfied components and normalizes by the total weight.
fn weighted(components: &[(f64, bool)]) -> f64 {
    let max: f64 = components.iter().map(|(weight, _)| weight).sum();
    if max <= 0.0 {
        return 0.0;
    }
    let score: f64 = components
        .iter()
        .filter(|(_, satisfied)| *satisfied)
        .map(|(weight, _)| weight)
        .sum();
    (score / max).clamp(0.0, 1.0)
}

#[must_use]
pub fn facebook_quality(record: &CanonicalRecord) -> f64 {
    weighted(&[
        (4.0, present(record, "post_content")),
        (
            2.0,
            positive(record, "engagement_metrics.likes")
                || positive(record, "engagement_metrics.comments"),
        ),
        (2.0, positive(record, "media_metadata.media_count")),
        (1.0, present(record, "page_name")),
        (1.0, present(record, "date_posted")),
    ])
}

#[must_use]
pub fn tiktok_quality(record: &CanonicalRecord) -> f64 {
    weighted(&[
        (3.0, present(record, "description")),
        (
            2.0,
            positive(record, "play_count") || positive(record, "digg_count"),
        ),
        (
            2.0,
            present(record, "video_metadata.video_url")
                || positive(record, "video_metadata.duration_seconds"),
        ),
        (
            2.0,
            present(record, "user_username") || present(record, "author_name"),
        ),
        (1.0, present(record, "date_posted")),
    ])
}

#[must_use]
pub fn youtube_quality(record: &CanonicalRecord) -> f64 {
    weighted(&[
        (3.0, present(record, "title")),
        (
            2.0,
            positive(record, "view_count") || positive(record, "like_count"),
        ),
        (
            2.0,
            present(record, "video_metadata.thumbnail_url")
                || positive(record, "video_metadata.duration_seconds"),
        ),
        (
            2.0,
            present(record, "channel_name") || present(record, "channel_id"),
        ),
        (
            1.0,
            present(record, "published_at") || present(record, "date_posted"),
        ),
    ])
}

/// The platform's own scoring function, used when a schema declares none.
#[must_use]
pub fn platform_quality(platform: Platform, record: &CanonicalRecord) -> f64 {
    match platform {
        Platform::Facebook => facebook_quality(record),
        Platform::TikTok => tiktok_quality(record),
        Platform::YouTube => youtube_quality(record),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> CanonicalRecord {
        match value {
            Value::Object(map) => CanonicalRecord::from(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn empty_record_scores_zero_everywhere() {
        let empty = CanonicalRecord::new();
        for platform in Platform::ALL {
            assert_eq!(platform_quality(platform, &empty), 0.0, "{platform}");
        }
    }

    #[test]
    fn complete_facebook_post_scores_one() {
        let r = record(json!({
            "post_content": "Hello",
            "engagement_metrics": {"likes": 3, "comments": 0},
            "media_metadata": {"media_count": 1},
            "page_name": "Brand",
            "date_posted": "2024-12-24T13:30:14.000+00:00"
        }));
        assert!((facebook_quality(&r) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn facebook_weights_content_heaviest() {
        let r = record(json!({"post_content": "Hello", "date_posted": "2024-12-24"}));
        assert!((facebook_quality(&r) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_engagement_does_not_count() {
        let r = record(json!({"engagement_metrics": {"likes": 0, "comments": "0"}}));
        assert_eq!(facebook_quality(&r), 0.0);
    }

    #[test]
    fn tiktok_complete_post_is_high_quality() {
        let r = record(json!({
            "description": "video",
            "play_count": 1000,
            "video_metadata": {"video_url": "https://tiktok.com/v/1"},
            "user_username": "brand",
            "date_posted": "2025-06-30T08:00:00+00:00"
        }));
        assert!(tiktok_quality(&r) > 0.7);
    }

    #[test]
    fn youtube_partial_post() {
        let r = record(json!({"title": "t", "channel_id": "c"}));
        assert!((youtube_quality(&r) - 0.5).abs() < 1e-9);
    }
}
