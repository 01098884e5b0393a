use serde_json::{json, Value};

use postmap_media::{detect_media_batch, BatchResult, MediaType};

fn tiktok_batch() -> Vec<Value> {
    vec![
        json!({"id": "1", "webVideoUrl": "https://www.tiktok.com/@a/video/1", "createTimeISO": "2025-07-12T10:00:00.000Z"}),
        json!({"id": "2", "webVideoUrl": "https://www.tiktok.com/@a/video/2"}),
        json!({"id": "3", "text": "no video here"}),
    ]
}

/// Everything except the wall-clock detection timestamp.
fn without_timestamp(result: &BatchResult) -> Value {
    let mut value = serde_json::to_value(result).expect("manifest serializes");
    value["batch_metadata"]
        .as_object_mut()
        .expect("batch metadata")
        .remove("detection_timestamp");
    value
}

#[test]
fn tiktok_batch_counts_videos() {
    let result = detect_media_batch(&tiktok_batch(), "tiktok");

    assert_eq!(result.platform, "tiktok");
    assert_eq!(result.total_posts, 3);
    assert_eq!(result.posts_with_media, 2);
    assert_eq!(result.total_videos, 2);
    assert_eq!(result.total_images, 0);
    assert_eq!(result.media_breakdown.videos.len(), 2);

    let first = &result.all_media_urls[0];
    assert_eq!(first.post_id, "1");
    assert_eq!(first.post_url, "https://www.tiktok.com/@a/video/1");
    assert_eq!(first.date_posted, "2025-07-12T10:00:00.000Z");
    assert_eq!(result.all_media_urls[1].date_posted, "");
}

#[test]
fn facebook_manifest_breakdown() {
    let posts = vec![json!({
        "post_id": "fb_1",
        "url": "https://facebook.com/p/1",
        "date_posted": "2024-12-24T13:30:14.000Z",
        "page_logo": "https://img.fb/logo.png",
        "attachments": [
            {"id": "a1", "type": "Video", "video_url": "https://video.fb/a1.mp4", "url": "https://img.fb/a1.jpg"},
            {"id": "a2", "type": "Photo", "url": "https://img.fb/a2.jpg"}
        ]
    })];
    let result = detect_media_batch(&posts, "facebook");

    assert_eq!(result.total_media_items, 3);
    assert_eq!(result.total_videos, 1);
    assert_eq!(result.total_images, 2);
    assert_eq!(result.media_breakdown.images.len(), 1);
    assert_eq!(result.media_breakdown.profile_images.len(), 1);
    assert_eq!(
        result.media_breakdown.videos[0].thumbnail_url.as_deref(),
        Some("https://img.fb/a1.jpg")
    );
    assert_eq!(result.posts_media_mapping[0].post_id, "fb_1");
    assert_eq!(result.posts_media_mapping[0].media_count, 3);

    let urls: Vec<&str> = result.urls().collect();
    assert_eq!(
        urls,
        vec![
            "https://video.fb/a1.mp4",
            "https://img.fb/a2.jpg",
            "https://img.fb/logo.png"
        ]
    );
}

#[test]
fn youtube_video_is_always_a_media_item() {
    // Unlike Facebook and TikTok, the YouTube video is listed even though it
    // is never downloaded.
    let posts = vec![json!({
        "id": "yt1",
        "url": "https://youtube.com/watch?v=yt1",
        "date": "2025-07-08T10:41:45.000Z",
        "thumbnailUrl": "https://i.ytimg.com/vi/yt1/hq.jpg",
        "channel_id": "ch1",
        "channel_metadata": {"banner_url": "https://yt/banner.jpg"}
    })];
    let result = detect_media_batch(&posts, "youtube");

    assert_eq!(result.total_videos, 1);
    assert_eq!(result.media_breakdown.videos[0].media_id, "yt1");
    // Banners are listed but not counted as images.
    assert_eq!(result.total_media_items, 3);
    assert_eq!(result.total_images, 1);
    assert_eq!(result.all_media_urls[2].media_type, MediaType::BannerImage);
}

#[test]
fn unknown_platform_yields_zeroed_manifest() {
    let result = detect_media_batch(&tiktok_batch(), "myspace");

    assert_eq!(result.platform, "unknown");
    assert_eq!(result.batch_metadata.platform, "unknown");
    assert_eq!(result.total_posts, 0);
    assert_eq!(result.posts_with_media, 0);
    assert_eq!(result.total_media_items, 0);
    assert!(result.all_media_urls.is_empty());
    assert!(result.posts_media_mapping.is_empty());
    assert!(result.media_breakdown.videos.is_empty());
}

#[test]
fn failing_post_does_not_abort_batch() {
    let mut posts = tiktok_batch();
    posts.insert(1, json!({"id": "bad", "webVideoUrl": "https://x", "videoMeta": "oops"}));
    posts.push(json!(42));

    let result = detect_media_batch(&posts, "tiktok");
    assert_eq!(result.total_posts, 5);
    assert_eq!(result.posts_with_media, 2);
    assert_eq!(result.total_videos, 2);
}

#[test]
fn detection_is_idempotent() {
    let posts = tiktok_batch();
    let first = detect_media_batch(&posts, "tiktok");
    let second = detect_media_batch(&posts, "tiktok");
    assert_eq!(without_timestamp(&first), without_timestamp(&second));
}

#[test]
fn manifest_serializes_descriptor_type_field() {
    let result = detect_media_batch(&tiktok_batch(), "tiktok");
    let value = serde_json::to_value(&result).expect("manifest serializes");
    assert_eq!(value["all_media_urls"][0]["type"], json!("video"));
    assert_eq!(value["batch_metadata"]["platform"], json!("tiktok"));
    assert!(value["all_media_urls"][0].get("thumbnail_url").is_none());
}
