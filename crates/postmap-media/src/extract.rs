//! Per-platform media extraction strategies.
//!
//! Each strategy is a pure `raw post -> descriptors` function. Descriptors come
//! back without post context; [`crate::detector`] attaches it.

use serde_json::{Map, Value};

use postmap_core::{json_kind, Platform};

use crate::error::MediaError;
use crate::types::{MediaDescriptor, MediaType};

const UNKNOWN_ID: &str = "unknown";

/// Extracts every media descriptor from one raw post.
///
/// # Errors
///
/// Returns [`MediaError`] when the post is not an object or a media container
/// field has the wrong shape.
pub fn extract_media(
    platform: Platform,
    raw_post: &Value,
) -> Result<Vec<MediaDescriptor>, MediaError> {
    let Value::Object(post) = raw_post else {
        return Err(MediaError::NotAnObject {
            found: json_kind(raw_post),
        });
    };
    match platform {
        Platform::Facebook => facebook_media(post),
        Platform::TikTok => tiktok_media(post),
        Platform::YouTube => youtube_media(post),
    }
}

/// Non-empty string at `key`; numbers are rendered as strings.
fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(obj, key))
}

/// Nested object at `key`; absent or `null` reads as empty.
fn object<'a>(
    obj: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a Map<String, Value>>, MediaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(other) => Err(MediaError::malformed(key, "an object", other)),
    }
}

/// Copies the present, non-null `keys` of `source` into descriptor metadata.
fn pick(source: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| match source.get(*key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(((*key).to_string(), value.clone())),
        })
        .collect()
}

fn facebook_media(post: &Map<String, Value>) -> Result<Vec<MediaDescriptor>, MediaError> {
    let mut media = Vec::new();

    let attachments = match post.get("attachments") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => return Err(MediaError::malformed("attachments", "an array", other)),
    };

    for (idx, attachment) in attachments.iter().enumerate() {
        let Value::Object(attachment) = attachment else {
            continue;
        };
        let media_id = text(attachment, "id").unwrap_or_else(|| format!("fb_attach_{idx}"));
        let kind = attachment
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();

        if let Some(video_url) = text(attachment, "video_url") {
            let mut descriptor = MediaDescriptor::new(video_url, MediaType::Video, media_id);
            descriptor.thumbnail_url = text(attachment, "url");
            descriptor.metadata = pick(attachment, &["video_length", "media_type"]);
            media.push(descriptor);
        } else if matches!(kind.as_str(), "photo" | "image") {
            if let Some(url) = text(attachment, "url") {
                let mut descriptor = MediaDescriptor::new(url, MediaType::Image, media_id);
                descriptor.metadata = pick(attachment, &["media_type"]);
                media.push(descriptor);
            }
        }
    }

    if let Some(logo) = text(post, "page_logo") {
        media.push(MediaDescriptor::new(logo, MediaType::ProfileImage, "page_logo"));
    }
    if let Some(image) = text(post, "post_image") {
        media.push(MediaDescriptor::new(image, MediaType::Image, "post_featured_image"));
    }

    Ok(media)
}

fn tiktok_media(post: &Map<String, Value>) -> Result<Vec<MediaDescriptor>, MediaError> {
    let mut media = Vec::new();
    let post_id = text(post, "id").unwrap_or_else(|| UNKNOWN_ID.to_string());
    let video_meta = object(post, "videoMeta")?;

    if let Some(video_url) = first_text(post, &["webVideoUrl", "video_url"]) {
        let mut descriptor = MediaDescriptor::new(video_url, MediaType::Video, post_id.clone());
        if let Some(meta) = video_meta {
            descriptor.metadata = pick(meta, &["duration", "height", "width", "format"]);
        }
        media.push(descriptor);
    }

    if let Some(cover) = video_meta.and_then(|meta| first_text(meta, &["coverUrl", "cover"])) {
        media.push(MediaDescriptor::new(
            cover,
            MediaType::Thumbnail,
            format!("{post_id}_cover"),
        ));
    }

    if let Some(author) = object(post, "authorMeta")? {
        if let Some(avatar) = text(author, "avatar") {
            let author_id = text(author, "id").unwrap_or_else(|| UNKNOWN_ID.to_string());
            media.push(MediaDescriptor::new(
                avatar,
                MediaType::ProfileImage,
                format!("{author_id}_avatar"),
            ));
        }
    }

    Ok(media)
}

/// The primary video URL is always emitted when present, even though YouTube
/// videos are never downloaded: consumers key off its presence.
fn youtube_media(post: &Map<String, Value>) -> Result<Vec<MediaDescriptor>, MediaError> {
    let mut media = Vec::new();
    let video_id = first_text(post, &["id", "video_id"]).unwrap_or_else(|| UNKNOWN_ID.to_string());

    if let Some(video_url) = first_text(post, &["url", "video_url"]) {
        let mut descriptor = MediaDescriptor::new(video_url, MediaType::Video, video_id.clone());
        descriptor.metadata = pick(post, &["duration", "viewCount", "title"]);
        media.push(descriptor);
    }

    if let Some(thumbnail) = first_text(post, &["thumbnailUrl", "thumbnail"]) {
        media.push(MediaDescriptor::new(
            thumbnail,
            MediaType::Thumbnail,
            format!("{video_id}_thumbnail"),
        ));
    }

    if let Some(channel) = object(post, "channel_metadata")? {
        let channel_id = text(post, "channel_id").unwrap_or_else(|| UNKNOWN_ID.to_string());
        if let Some(avatar) = text(channel, "avatar_url") {
            media.push(MediaDescriptor::new(
                avatar,
                MediaType::ProfileImage,
                format!("{channel_id}_avatar"),
            ));
        }
        if let Some(banner) = text(channel, "banner_url") {
            media.push(MediaDescriptor::new(
                banner,
                MediaType::BannerImage,
                format!("{channel_id}_banner"),
            ));
        }
    }

    Ok(media)
}
