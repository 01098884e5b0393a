//! Multi-platform media detection.
//!
//! Finds the downloadable or referenceable media assets in a batch of raw
//! Facebook, TikTok or YouTube posts and summarizes them as a [`BatchResult`]
//! manifest.

pub mod detector;
pub mod error;
pub mod extract;
pub mod types;

pub use detector::{detect_media, detect_media_batch};
pub use error::MediaError;
pub use extract::extract_media;
pub use types::{BatchMetadata, BatchResult, MediaBreakdown, MediaDescriptor, MediaType, PostMedia};
