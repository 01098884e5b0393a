//! Builtin computation functions.
//!
//! Computations read the record built so far (mapped fields are already in
//! place) and fall back to the raw post only where a platform reports a value
//! that no mapping carries.

use serde_json::{json, Value};

use postmap_core::{path, CanonicalRecord};

use super::preprocess::as_int;
use super::FunctionRegistry;
use crate::duration;
use crate::error::FieldError;
use crate::quality;
use crate::text;

pub(super) fn register_builtins(registry: &mut FunctionRegistry) {
    registry
        // Facebook
        .register_computation("sum_reactions_by_type", sum_reactions_by_type)
        .register_computation("count_attachments", count_attachments)
        .register_computation("check_video_attachments", check_video_attachments)
        .register_computation("check_image_attachments", check_image_attachments)
        .register_computation("calculate_data_quality", calculate_data_quality)
        // TikTok
        .register_computation("sum_tiktok_engagement", sum_tiktok_engagement)
        .register_computation("calculate_tiktok_engagement_rate", calculate_tiktok_engagement_rate)
        .register_computation("calculate_aspect_ratio", calculate_aspect_ratio)
        .register_computation("check_has_music", check_has_music)
        .register_computation("count_hashtags", count_hashtags)
        .register_computation("calculate_tiktok_data_quality", calculate_tiktok_data_quality)
        // YouTube
        .register_computation("sum_youtube_engagement", sum_youtube_engagement)
        .register_computation("calculate_youtube_engagement_rate", calculate_youtube_engagement_rate)
        .register_computation("parse_youtube_duration", parse_youtube_duration)
        .register_computation("check_is_youtube_short", check_is_youtube_short)
        .register_computation("calculate_title_length", calculate_title_length)
        .register_computation("calculate_youtube_data_quality", calculate_youtube_data_quality)
        // Shared
        .register_computation("calculate_text_length", calculate_text_length)
        .register_computation("detect_language", detect_language)
        .register_computation("calculate_sentiment", calculate_sentiment);
}

fn int_at(record: &CanonicalRecord, path: &str) -> i64 {
    record.get(path).map_or(0, as_int)
}

fn array_at<'a>(record: &'a CanonicalRecord, path: &str) -> Result<&'a [Value], FieldError> {
    match record.get(path) {
        None => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(FieldError::type_mismatch("array", other)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn rate(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// The post's main body: Facebook `post_content`, TikTok and YouTube
/// `description`.
fn body_text(record: &CanonicalRecord) -> Option<&str> {
    record
        .get_str("post_content")
        .or_else(|| record.get_str("description"))
}

fn attachment_types(record: &CanonicalRecord) -> Result<Vec<String>, FieldError> {
    Ok(array_at(record, "media_metadata.attachments")?
        .iter()
        .filter_map(|att| att.get("type").and_then(Value::as_str))
        .map(str::to_lowercase)
        .collect())
}

// Facebook

/// Total of `engagement_metrics.reactions_by_type[].count`.
///
/// # Errors
///
/// Returns [`FieldError::Type`] when the reactions are not an array.
pub fn sum_reactions_by_type(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    let total: i64 = array_at(record, "engagement_metrics.reactions_by_type")?
        .iter()
        .map(|reaction| reaction.get("count").map_or(0, as_int))
        .fold(0, i64::saturating_add);
    Ok(json!(total))
}

/// # Errors
///
/// Returns [`FieldError::Type`] when the attachments are not an array.
pub fn count_attachments(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    Ok(json!(array_at(record, "media_metadata.attachments")?.len()))
}

/// # Errors
///
/// Returns [`FieldError::Type`] when the attachments are not an array.
pub fn check_video_attachments(
    _raw: &Value,
    record: &CanonicalRecord,
) -> Result<Value, FieldError> {
    let has_video = attachment_types(record)?.iter().any(|t| t == "video");
    Ok(Value::Bool(has_video))
}

/// # Errors
///
/// Returns [`FieldError::Type`] when the attachments are not an array.
pub fn check_image_attachments(
    _raw: &Value,
    record: &CanonicalRecord,
) -> Result<Value, FieldError> {
    let has_image = attachment_types(record)?
        .iter()
        .any(|t| t == "photo" || t == "image");
    Ok(Value::Bool(has_image))
}

/// # Errors
///
/// Never fails.
pub fn calculate_data_quality(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    Ok(json!(quality::facebook_quality(record)))
}

// TikTok

/// Counts come from scraped strings, so sums saturate instead of overflowing.
fn tiktok_engagement(record: &CanonicalRecord) -> i64 {
    int_at(record, "digg_count")
        .saturating_add(int_at(record, "comment_count"))
        .saturating_add(int_at(record, "share_count"))
}

/// Diggs + comments + shares.
///
/// # Errors
///
/// Never fails.
pub fn sum_tiktok_engagement(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    Ok(json!(tiktok_engagement(record)))
}

/// Engagement divided by plays; `0.0` without plays.
///
/// # Errors
///
/// Never fails.
pub fn calculate_tiktok_engagement_rate(
    _raw: &Value,
    record: &CanonicalRecord,
) -> Result<Value, FieldError> {
    Ok(json!(rate(
        tiktok_engagement(record),
        int_at(record, "play_count")
    )))
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `width:height` reduced by their GCD (`576x1024` is `9:16`).
///
/// # Errors
///
/// Never fails; missing or zero dimensions give `"unknown"`.
pub fn calculate_aspect_ratio(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    let width = int_at(record, "video_metadata.width");
    let height = int_at(record, "video_metadata.height");
    if width <= 0 || height <= 0 {
        return Ok(json!("unknown"));
    }
    let divisor = gcd(width, height);
    Ok(json!(format!("{}:{}", width / divisor, height / divisor)))
}

/// # Errors
///
/// Never fails.
pub fn check_has_music(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    let has_music = record.get_str("video_metadata.music_id").is_some()
        || record.get_str("video_metadata.music_title").is_some()
        || int_at(record, "video_metadata.music_id") != 0;
    Ok(Value::Bool(has_music))
}

/// # Errors
///
/// Returns [`FieldError::Type`] when the hashtags are not an array.
pub fn count_hashtags(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    Ok(json!(array_at(record, "content_analysis.hashtags")?.len()))
}

/// # Errors
///
/// Never fails.
pub fn calculate_tiktok_data_quality(
    _raw: &Value,
    record: &CanonicalRecord,
) -> Result<Value, FieldError> {
    Ok(json!(quality::tiktok_quality(record)))
}

// YouTube

fn youtube_engagement(record: &CanonicalRecord) -> i64 {
    int_at(record, "like_count").saturating_add(int_at(record, "comment_count"))
}

/// Likes + comments.
///
/// # Errors
///
/// Never fails.
pub fn sum_youtube_engagement(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    Ok(json!(youtube_engagement(record)))
}

/// Engagement divided by views; `0.0` without views.
///
/// # Errors
///
/// Never fails.
pub fn calculate_youtube_engagement_rate(
    _raw: &Value,
    record: &CanonicalRecord,
) -> Result<Value, FieldError> {
    Ok(json!(rate(
        youtube_engagement(record),
        int_at(record, "view_count")
    )))
}

fn youtube_duration_seconds(raw: &Value, record: &CanonicalRecord) -> u64 {
    if let Some(duration) = record.get("video_metadata.duration") {
        return duration::duration_seconds_of(duration);
    }
    if let Some(seconds) = record.get("video_metadata.duration_seconds") {
        return duration::duration_seconds_of(seconds);
    }
    path::lookup(raw, "duration").map_or(0, duration::duration_seconds_of)
}

/// Parses `video_metadata.duration` (or the raw `duration`) into seconds.
///
/// # Errors
///
/// Never fails; unparsable durations are `0`.
pub fn parse_youtube_duration(raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    Ok(json!(youtube_duration_seconds(raw, record)))
}

/// True iff the duration is within `(0, 60]` seconds.
///
/// # Errors
///
/// Never fails.
pub fn check_is_youtube_short(raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    let seconds = youtube_duration_seconds(raw, record);
    Ok(Value::Bool(seconds > 0 && seconds <= 60))
}

/// # Errors
///
/// Never fails.
pub fn calculate_title_length(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    let length = record.get_str("title").map_or(0, |t| t.chars().count());
    Ok(json!(length))
}

/// # Errors
///
/// Never fails.
pub fn calculate_youtube_data_quality(
    _raw: &Value,
    record: &CanonicalRecord,
) -> Result<Value, FieldError> {
    Ok(json!(quality::youtube_quality(record)))
}

// Shared

/// Character count of the post body.
///
/// # Errors
///
/// Never fails.
pub fn calculate_text_length(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    Ok(json!(body_text(record).map_or(0, |t| t.chars().count())))
}

/// ISO 639-1 code of the post body (or the title when there is no body).
///
/// # Errors
///
/// Never fails.
pub fn detect_language(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    let language = body_text(record)
        .or_else(|| record.get_str("title"))
        .map_or(text::UNKNOWN_LANGUAGE, text::detect_language);
    Ok(json!(language))
}

/// Lexicon polarity of the post body (or the title), in `[-1.0, 1.0]`.
///
/// # Errors
///
/// Never fails.
pub fn calculate_sentiment(_raw: &Value, record: &CanonicalRecord) -> Result<Value, FieldError> {
    let score = body_text(record)
        .or_else(|| record.get_str("title"))
        .map_or(0.0, text::sentiment_score);
    Ok(json!(score))
}

#[cfg(test)]
#[path = "compute_test.rs"]
mod tests;
