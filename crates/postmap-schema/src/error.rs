use serde_json::Value;
use thiserror::Error;

use postmap_core::{json_kind, PathError};

/// Failures while loading schema documents from disk.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema path {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON schema {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse YAML schema {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid schema {path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// Post-level failures. These abort one post, never the batch.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("schema not found for {platform} v{version}")]
    SchemaNotFound { platform: String, version: String },

    #[error("raw post must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("failed to seed identity field: {0}")]
    Seed(#[from] PathError),
}

/// Field-level failures. The pipeline logs these and falls back to the
/// field's default value.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("expected {expected}, got {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value: {0}")]
    Invalid(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl FieldError {
    pub(crate) fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        FieldError::Type {
            expected,
            found: json_kind(found),
        }
    }
}
