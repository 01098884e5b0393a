use serde_json::Value;
use thiserror::Error;

use postmap_core::json_kind;

/// Failures while extracting media from one raw post. The detector logs these
/// and treats the post as having no media.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("raw post must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("field {field} must be {expected}, got {found}")]
    Malformed {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl MediaError {
    pub(crate) fn malformed(field: &'static str, expected: &'static str, value: &Value) -> Self {
        MediaError::Malformed {
            field,
            expected,
            found: json_kind(value),
        }
    }
}
