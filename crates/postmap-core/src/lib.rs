//! Shared types for the postmap workspace.
//!
//! Holds the closed [`Platform`] variant set, crawl metadata, the canonical
//! record type, the dot-path walker used by the schema engine, timestamp
//! helpers and the upload-date grouper that partitions records for storage.

pub mod app_config;
pub mod config;
pub mod dates;
pub mod grouping;
pub mod metadata;
pub mod path;
pub mod platform;
pub mod record;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use grouping::{
    extract_upload_date, group_by_upload_date, upload_date_of, upload_date_summary, DateGroups,
    TaggedPost, UploadDateSummary, UploadDated, UNKNOWN_DATE,
};
pub use metadata::CrawlMetadata;
pub use path::{json_kind, PathError};
pub use platform::Platform;
pub use record::CanonicalRecord;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
