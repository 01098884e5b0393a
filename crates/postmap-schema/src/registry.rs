use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SchemaError;
use crate::schema::{schema_key, Schema};

const SCHEMA_FILE_MARKER: &str = "_schema_v";
const SCHEMA_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Loaded schema documents indexed by `"{platform}_v{version}"`.
///
/// Built once and shared read-only; a platform whose document failed to load
/// stays unavailable until the registry is loaded again.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `dir` for `*_schema_v*.{json,yaml,yml}` documents.
    ///
    /// Malformed documents are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] only when the directory itself cannot be read.
    pub fn load(dir: &Path) -> Result<Self, SchemaError> {
        let entries = std::fs::read_dir(dir).map_err(|e| SchemaError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_schema_file(path))
            .collect();
        paths.sort();

        let mut registry = Self::new();
        for path in &paths {
            match load_schema_file(path) {
                Ok(schema) => {
                    tracing::info!(
                        path = %path.display(),
                        key = %schema.key(),
                        "loaded schema"
                    );
                    registry.insert(schema);
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "skipping schema file");
                }
            }
        }

        if registry.is_empty() {
            tracing::warn!(dir = %dir.display(), "no schemas loaded");
        }
        Ok(registry)
    }

    /// Adds `schema`, replacing any schema with the same key.
    pub fn insert(&mut self, schema: Schema) {
        let key = schema.key();
        if self.schemas.contains_key(&key) {
            tracing::warn!(key = %key, "replacing previously loaded schema");
        }
        self.schemas.insert(key, schema);
    }

    #[must_use]
    pub fn get_schema(&self, platform: &str, version: &str) -> Option<&Schema> {
        self.schemas.get(&schema_key(platform, version))
    }

    /// Sorted registry keys.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Schemas in key order.
    #[must_use]
    pub fn schemas(&self) -> Vec<&Schema> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.schemas.get(key))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl FromIterator<Schema> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = Schema>>(iter: I) -> Self {
        let mut registry = Self::new();
        for schema in iter {
            registry.insert(schema);
        }
        registry
    }
}

fn is_schema_file(path: &Path) -> bool {
    let has_marker = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(SCHEMA_FILE_MARKER));
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCHEMA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    path.is_file() && has_marker && has_extension
}

/// Reads and validates a single schema document (JSON or YAML by extension).
///
/// # Errors
///
/// Returns [`SchemaError`] when the file cannot be read, parsed, or is
/// missing its identity or target fields.
pub fn load_schema_file(path: &Path) -> Result<Schema, SchemaError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
        path: display.clone(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "yaml" | "yml"));

    let schema: Schema = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| SchemaError::Yaml {
            path: display.clone(),
            source: e,
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| SchemaError::Json {
            path: display.clone(),
            source: e,
        })?
    };

    validate_schema(&schema).map_err(|reason| SchemaError::Invalid {
        path: display,
        reason,
    })?;
    Ok(schema)
}

fn validate_schema(schema: &Schema) -> Result<(), String> {
    if schema.platform.trim().is_empty() {
        return Err("platform must be non-empty".to_string());
    }
    if schema.schema_version.trim().is_empty() {
        return Err("schema_version must be non-empty".to_string());
    }
    for (group, name, mapping) in schema.mappings() {
        if mapping.target_field.trim().is_empty() {
            return Err(format!("mapping '{group}.{name}' has an empty target_field"));
        }
    }
    for (name, field) in schema.computed_fields.iter() {
        if field.target_field.trim().is_empty() {
            return Err(format!("computed field '{name}' has an empty target_field"));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
