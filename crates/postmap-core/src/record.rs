use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::{self, PathError};

/// A flattened, platform-agnostic post produced by the transformation pipeline.
///
/// The record is a JSON object; nested groups such as
/// `engagement_metrics` are plain sub-objects addressed by dot paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalRecord(Map<String, Value>);

impl CanonicalRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the value at `path`; absent and `null` both read as `None`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        path::lookup_in(&self.0, path)
    }

    /// Reads a string at `path`, treating empty strings as absent.
    #[must_use]
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Reads a number at `path` as `f64`. Non-numeric values read as `None`.
    #[must_use]
    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    /// Writes `value` at `path`, creating intermediate objects.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when the path is empty or crosses a non-object value.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        path::insert(&mut self.0, path, value)
    }

    /// The upload-date key stamped on the record during transformation.
    #[must_use]
    pub fn grouped_date(&self) -> Option<&str> {
        self.get_str("grouped_date")
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for CanonicalRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<CanonicalRecord> for Value {
    fn from(record: CanonicalRecord) -> Self {
        Value::Object(record.0)
    }
}
