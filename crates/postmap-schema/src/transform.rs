//! The schema-driven field transformation pipeline.
//!
//! One raw post becomes one [`CanonicalRecord`]:
//!
//! 1. resolve the schema (the only post-level failure),
//! 2. seed identity fields and the upload date,
//! 3. run every field mapping (extract, preprocess, validate, truncate, place),
//! 4. run computed fields in declaration order,
//! 5. attach `processing_metadata`,
//! 6. check required fields and the quality threshold (log-only).
//!
//! Field-level problems never abort the post; they fall back to the field's
//! default and are listed in `processing_metadata.degraded_fields`.

use std::sync::Arc;

use serde_json::{json, Value};

use postmap_core::{
    dates, json_kind, path, upload_date_of, CanonicalRecord, CrawlMetadata, Platform,
};

use crate::error::{FieldError, TransformError};
use crate::functions::FunctionRegistry;
use crate::quality;
use crate::registry::SchemaRegistry;
use crate::schema::{ComputedField, FieldMapping, Schema};
use crate::validation;

/// Version of the mapping engine stamped on every record.
pub const PROCESSING_VERSION: &str = "1.0.0";

/// Where the data-quality score lives in a canonical record.
pub const QUALITY_SCORE_FIELD: &str = "processing_metadata.data_quality_score";

/// Outcome of mapping one field.
#[derive(Debug, PartialEq)]
enum FieldValue {
    /// Extracted and processed successfully.
    Mapped(Value),
    /// The source path is absent or `null`; the default applies.
    Missing,
    /// The value failed its validation rule; the default applies.
    Rejected { rule: String },
}

#[derive(Debug, Clone)]
pub struct SchemaTransformer {
    schemas: Arc<SchemaRegistry>,
    functions: Arc<FunctionRegistry>,
}

impl SchemaTransformer {
    #[must_use]
    pub fn new(schemas: Arc<SchemaRegistry>, functions: Arc<FunctionRegistry>) -> Self {
        Self { schemas, functions }
    }

    #[must_use]
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    #[must_use]
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Transforms one raw post into a canonical record.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::SchemaNotFound`] when no schema is loaded for
    /// `platform` at `schema_version`, and [`TransformError::NotAnObject`] when
    /// the raw post is not a JSON object. Field-level failures never error.
    pub fn transform(
        &self,
        raw_post: &Value,
        platform: Platform,
        metadata: &CrawlMetadata,
        schema_version: &str,
    ) -> Result<CanonicalRecord, TransformError> {
        let schema = self
            .schemas
            .get_schema(platform.as_str(), schema_version)
            .ok_or_else(|| TransformError::SchemaNotFound {
                platform: platform.to_string(),
                version: schema_version.to_string(),
            })?;

        if !raw_post.is_object() {
            return Err(TransformError::NotAnObject {
                found: json_kind(raw_post),
            });
        }

        let mut record = seed_record(raw_post, platform, metadata)?;
        let mut degraded: Vec<String> = Vec::new();

        for (group, name, mapping) in schema.mappings() {
            self.place_field(raw_post, group, name, mapping, &mut record, &mut degraded);
        }

        for (name, computed) in schema.computed_fields.iter() {
            self.place_computed(raw_post, name, computed, &mut record, &mut degraded);
        }

        attach_processing_metadata(&mut record, platform, schema_version, degraded)?;
        check_record(&record, schema);

        Ok(record)
    }

    fn place_field(
        &self,
        raw_post: &Value,
        group: &str,
        name: &str,
        mapping: &FieldMapping,
        record: &mut CanonicalRecord,
        degraded: &mut Vec<String>,
    ) {
        let outcome = match self.map_field(raw_post, mapping) {
            Ok(FieldValue::Mapped(value)) => {
                match record.set(&mapping.target_field, value) {
                    Ok(()) => return,
                    Err(e) => Err(FieldError::from(e)),
                }
            }
            Ok(FieldValue::Missing) => Ok(false),
            Ok(FieldValue::Rejected { rule }) => {
                tracing::warn!(
                    group,
                    field = name,
                    rule = %rule,
                    "validation failed, using default"
                );
                Ok(true)
            }
            Err(e) => Err(e),
        };

        let is_degraded = match outcome {
            Ok(flag) => flag,
            Err(e) => {
                tracing::error!(
                    group,
                    field = name,
                    error = %e,
                    "error processing field, using default"
                );
                true
            }
        };
        if is_degraded {
            degraded.push(mapping.target_field.clone());
        }

        if let Some(default) = &mapping.default_value {
            if let Err(e) = record.set(&mapping.target_field, default.clone()) {
                tracing::error!(field = name, error = %e, "failed to place default value");
            }
        }
    }

    /// Extracts, preprocesses, validates and truncates one field.
    fn map_field(
        &self,
        raw_post: &Value,
        mapping: &FieldMapping,
    ) -> Result<FieldValue, FieldError> {
        let Some(source) = mapping.source_field.as_deref() else {
            return Ok(FieldValue::Missing);
        };
        let Some(extracted) = path::lookup(raw_post, source) else {
            return Ok(FieldValue::Missing);
        };

        let mut value = extracted.clone();
        for step in &mapping.preprocessing {
            match self.functions.preprocessing(step) {
                Some(function) => value = function.apply(value)?,
                None => tracing::warn!(
                    function = %step,
                    source,
                    "unknown preprocessing function, skipping"
                ),
            }
        }

        if let Some(rule) = &mapping.validation {
            if !validation::validate_field(&value, rule) {
                return Ok(FieldValue::Rejected { rule: rule.clone() });
            }
        }

        if value.is_null() {
            return Ok(FieldValue::Missing);
        }

        if let Some(max_length) = mapping.max_length {
            value = validation::truncate(value, max_length);
        }
        Ok(FieldValue::Mapped(value))
    }

    fn place_computed(
        &self,
        raw_post: &Value,
        name: &str,
        computed: &ComputedField,
        record: &mut CanonicalRecord,
        degraded: &mut Vec<String>,
    ) {
        let Some(function) = self.functions.computation(&computed.computation) else {
            tracing::warn!(
                field = name,
                function = %computed.computation,
                "unknown computation function, skipping"
            );
            return;
        };

        let result = function
            .compute(raw_post, record)
            .and_then(|value| match value {
                Value::Null => Ok(()),
                value => record.set(&computed.target_field, value).map_err(FieldError::from),
            });

        if let Err(e) = result {
            tracing::error!(field = name, error = %e, "error computing field");
            degraded.push(computed.target_field.clone());
        }
    }
}

/// Identity fields, upload date and grouping key.
fn seed_record(
    raw_post: &Value,
    platform: Platform,
    metadata: &CrawlMetadata,
) -> Result<CanonicalRecord, TransformError> {
    let post_id = platform.post_id(raw_post).unwrap_or_default();

    let mut record = CanonicalRecord::new();
    record.set("id", json!(format!("{post_id}_{}", metadata.crawl_id)))?;
    record.set("crawl_id", json!(metadata.crawl_id))?;
    record.set("snapshot_id", json!(metadata.snapshot_id))?;
    record.set("platform", json!(platform.as_str()))?;
    record.set("competitor", json!(metadata.competitor))?;
    record.set("brand", json!(metadata.brand))?;
    record.set("category", json!(metadata.category))?;
    record.set("crawl_date", json!(metadata.crawl_date))?;
    record.set("processed_date", json!(dates::now_rfc3339()))?;

    if let Some(raw_date) = path::lookup(raw_post, platform.upload_date_field()) {
        record.set("date_posted", json!(dates::normalize_timestamp(raw_date)))?;
    }
    record.set("grouped_date", json!(upload_date_of(raw_post, platform)))?;

    Ok(record)
}

fn attach_processing_metadata(
    record: &mut CanonicalRecord,
    platform: Platform,
    schema_version: &str,
    degraded: Vec<String>,
) -> Result<(), TransformError> {
    let score = match record.get(QUALITY_SCORE_FIELD).and_then(Value::as_f64) {
        Some(score) if score.is_finite() => score,
        _ => quality::platform_quality(platform, record),
    };

    record.set("processing_metadata.schema_version", json!(schema_version))?;
    record.set("processing_metadata.processing_version", json!(PROCESSING_VERSION))?;
    record.set(QUALITY_SCORE_FIELD, json!(score.clamp(0.0, 1.0)))?;
    record.set("processing_metadata.degraded_fields", json!(degraded))?;
    Ok(())
}

/// Required-field and quality checks. Observability only; never rejects.
fn check_record(record: &CanonicalRecord, schema: &Schema) {
    let rules = &schema.validation_rules;
    for field in &rules.required_fields {
        if !quality::is_truthy(record.get(field)) {
            tracing::warn!(
                platform = %schema.platform,
                field = %field,
                id = record.get_str("id").unwrap_or_default(),
                "required field missing"
            );
        }
    }

    let score = record.get_f64(QUALITY_SCORE_FIELD).unwrap_or(0.0);
    let minimum = rules.data_quality_thresholds.minimum_score;
    if score < minimum {
        tracing::warn!(
            platform = %schema.platform,
            id = record.get_str("id").unwrap_or_default(),
            score,
            minimum,
            "data quality score below threshold"
        );
    }
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
