//! The closed set of supported social platforms.
//!
//! Identity shape differs structurally between platforms, so post-id, post-url
//! and upload-date extraction are match arms here rather than schema config.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    TikTok,
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Facebook, Platform::TikTok, Platform::YouTube];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
        }
    }

    /// Name of the platform-native field holding the publication timestamp.
    #[must_use]
    pub fn upload_date_field(self) -> &'static str {
        match self {
            Platform::Facebook => "date_posted",
            Platform::TikTok => "createTimeISO",
            Platform::YouTube => "date",
        }
    }

    /// Extracts the platform-native post identifier from a raw post.
    ///
    /// Facebook exports carry `post_id` (falling back to `id`), TikTok uses
    /// `id`, and YouTube uses `id` with `video_id` as an older alias.
    #[must_use]
    pub fn post_id(self, raw_post: &Value) -> Option<String> {
        let candidates: &[&str] = match self {
            Platform::Facebook => &["post_id", "id"],
            Platform::TikTok => &["id"],
            Platform::YouTube => &["id", "video_id"],
        };
        first_scalar(raw_post, candidates)
    }

    /// Extracts the canonical URL of the post itself.
    #[must_use]
    pub fn post_url(self, raw_post: &Value) -> Option<String> {
        let candidates: &[&str] = match self {
            Platform::Facebook => &["post_url", "url"],
            Platform::TikTok => &["webVideoUrl"],
            Platform::YouTube => &["url", "video_url"],
        };
        first_scalar(raw_post, candidates)
    }

    /// Extracts the raw (un-normalized) publication timestamp string.
    #[must_use]
    pub fn post_date(self, raw_post: &Value) -> Option<String> {
        let candidates: &[&str] = match self {
            Platform::Facebook => &["date_posted"],
            Platform::TikTok => &["createTimeISO"],
            Platform::YouTube => &["date", "publishedAt"],
        };
        first_scalar(raw_post, candidates)
    }
}

/// Returns the first candidate key holding a non-empty string or a number.
fn first_scalar(raw_post: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw_post.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "tiktok" => Ok(Platform::TikTok),
            "youtube" => Ok(Platform::YouTube),
            _ => Err(CoreError::UnknownPlatform(s.to_string())),
        }
    }
}
