use serde_json::Value;

use postmap_core::Platform;

use crate::extract::extract_media;
use crate::types::{BatchResult, MediaDescriptor, MediaType, PostMedia};

const UNKNOWN_PLATFORM: &str = "unknown";

/// Detects media across a batch of raw posts from the platform named
/// `platform`.
///
/// An unrecognized platform yields [`BatchResult::empty`] labelled `unknown`.
#[must_use]
pub fn detect_media_batch(raw_posts: &[Value], platform: &str) -> BatchResult {
    match platform.parse::<Platform>() {
        Ok(platform) => detect_media(raw_posts, platform),
        Err(e) => {
            tracing::warn!(platform, error = %e, "media detection skipped");
            BatchResult::empty(UNKNOWN_PLATFORM)
        }
    }
}

/// Typed variant of [`detect_media_batch`].
///
/// A post whose extraction fails is logged and counted as having no media.
#[must_use]
pub fn detect_media(raw_posts: &[Value], platform: Platform) -> BatchResult {
    let mut result = BatchResult::empty(platform.as_str());
    result.total_posts = raw_posts.len();

    for (index, raw_post) in raw_posts.iter().enumerate() {
        let media = match extract_media(platform, raw_post) {
            Ok(media) => media,
            Err(e) => {
                tracing::error!(platform = %platform, index, error = %e, "media extraction failed");
                continue;
            }
        };
        if media.is_empty() {
            continue;
        }

        let post_id = platform.post_id(raw_post).unwrap_or_else(|| "unknown".to_string());
        let post_url = platform.post_url(raw_post).unwrap_or_default();
        let date_posted = platform.post_date(raw_post).unwrap_or_default();

        let media: Vec<MediaDescriptor> = media
            .into_iter()
            .map(|mut descriptor| {
                descriptor.post_id.clone_from(&post_id);
                descriptor.post_url.clone_from(&post_url);
                descriptor.date_posted.clone_from(&date_posted);
                descriptor
            })
            .collect();

        tracing::debug!(
            platform = %platform,
            post_id = %post_id,
            count = media.len(),
            "media detected"
        );
        for descriptor in &media {
            record_descriptor(&mut result, descriptor);
        }
        result.posts_media_mapping.push(PostMedia {
            post_id,
            media_count: media.len(),
            media_items: media,
        });
    }

    result.posts_with_media = result.posts_media_mapping.len();
    result.total_media_items = result.all_media_urls.len();

    tracing::info!(
        platform = %platform,
        total_posts = result.total_posts,
        posts_with_media = result.posts_with_media,
        videos = result.total_videos,
        images = result.total_images,
        "media detection complete"
    );
    result
}

fn record_descriptor(result: &mut BatchResult, descriptor: &MediaDescriptor) {
    match descriptor.media_type {
        MediaType::Video => {
            result.total_videos += 1;
            result.media_breakdown.videos.push(descriptor.clone());
        }
        MediaType::Image | MediaType::Thumbnail => {
            result.media_breakdown.images.push(descriptor.clone());
        }
        MediaType::ProfileImage => {
            result.media_breakdown.profile_images.push(descriptor.clone());
        }
        MediaType::BannerImage => {}
    }
    if descriptor.media_type.counts_as_image() {
        result.total_images += 1;
    }
    result.all_media_urls.push(descriptor.clone());
}
