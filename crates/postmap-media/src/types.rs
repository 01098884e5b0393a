use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of media asset referenced by a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Video,
    Image,
    Thumbnail,
    ProfileImage,
    BannerImage,
}

impl MediaType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Image => "image",
            MediaType::Thumbnail => "thumbnail",
            MediaType::ProfileImage => "profile_image",
            MediaType::BannerImage => "banner_image",
        }
    }

    /// Counted in `total_images`. Banners are listed but never counted.
    #[must_use]
    pub fn counts_as_image(self) -> bool {
        matches!(
            self,
            MediaType::Image | MediaType::Thumbnail | MediaType::ProfileImage
        )
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One downloadable or referenceable media asset found in a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub media_id: String,
    /// Context of the post the asset was found in; filled by the detector.
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub post_url: String,
    /// The post's own upload timestamp, as found in the raw post.
    #[serde(default)]
    pub date_posted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl MediaDescriptor {
    #[must_use]
    pub fn new(url: impl Into<String>, media_type: MediaType, media_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            media_type,
            media_id: media_id.into(),
            post_id: String::new(),
            post_url: String::new(),
            date_posted: String::new(),
            thumbnail_url: None,
            metadata: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaBreakdown {
    pub videos: Vec<MediaDescriptor>,
    /// Images and thumbnails.
    pub images: Vec<MediaDescriptor>,
    pub profile_images: Vec<MediaDescriptor>,
}

/// The media found in one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMedia {
    pub post_id: String,
    pub media_count: usize,
    pub media_items: Vec<MediaDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub detection_timestamp: DateTime<Utc>,
    pub platform: String,
}

/// Batch-level media manifest for a list of posts from one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub platform: String,
    pub total_posts: usize,
    pub posts_with_media: usize,
    pub total_media_items: usize,
    pub total_videos: usize,
    pub total_images: usize,
    pub media_breakdown: MediaBreakdown,
    pub all_media_urls: Vec<MediaDescriptor>,
    pub posts_media_mapping: Vec<PostMedia>,
    pub batch_metadata: BatchMetadata,
}

impl BatchResult {
    /// A zeroed manifest labelled with `platform`.
    #[must_use]
    pub fn empty(platform: impl Into<String>) -> Self {
        let platform = platform.into();
        Self {
            platform: platform.clone(),
            total_posts: 0,
            posts_with_media: 0,
            total_media_items: 0,
            total_videos: 0,
            total_images: 0,
            media_breakdown: MediaBreakdown::default(),
            all_media_urls: Vec::new(),
            posts_media_mapping: Vec::new(),
            batch_metadata: BatchMetadata {
                detection_timestamp: Utc::now(),
                platform,
            },
        }
    }

    /// Every media URL in detection order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.all_media_urls.iter().map(|m| m.url.as_str())
    }
}
