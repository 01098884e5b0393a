use serde_json::json;

use super::*;

fn facebook_schema() -> Schema {
    serde_json::from_value(json!({
        "platform": "facebook",
        "schema_version": "1.0.0",
        "field_mappings": {
            "core_fields": {
                "post_id": {"source_field": "post_id", "target_field": "post_id"},
                "post_url": {
                    "source_field": "url",
                    "target_field": "post_url",
                    "validation": "url_format",
                    "default_value": ""
                },
                "content": {
                    "source_field": "content",
                    "target_field": "post_content",
                    "preprocessing": ["clean_text"],
                    "max_length": 12
                },
                "kind": {"target_field": "post_type", "default_value": "post"}
            },
            "engagement": {
                "likes": {
                    "source_field": "likes",
                    "target_field": "engagement_metrics.likes",
                    "preprocessing": ["safe_int"],
                    "default_value": 0
                },
                "attachments": {
                    "source_field": "attachments",
                    "target_field": "media_metadata.attachments",
                    "preprocessing": ["parse_attachments"],
                    "default_value": []
                },
                "title": {
                    "source_field": "title",
                    "target_field": "title",
                    "preprocessing": ["clean_text", "does_not_exist"]
                }
            }
        },
        "computed_fields": {
            "media_count": {"target_field": "media_metadata.media_count", "computation": "count_attachments"},
            "has_video": {"target_field": "media_metadata.has_video", "computation": "check_video_attachments"},
            "mystery": {"target_field": "mystery", "computation": "summon_magic"},
            "quality": {"target_field": "processing_metadata.data_quality_score", "computation": "calculate_data_quality"}
        },
        "validation_rules": {
            "required_fields": ["post_id", "post_content"],
            "data_quality_thresholds": {"minimum_score": 0.6}
        }
    }))
    .unwrap()
}

fn transformer() -> SchemaTransformer {
    let schemas: SchemaRegistry = [facebook_schema()].into_iter().collect();
    SchemaTransformer::new(Arc::new(schemas), Arc::new(FunctionRegistry::builtin()))
}

fn metadata() -> CrawlMetadata {
    CrawlMetadata {
        crawl_id: "crawl-9".to_string(),
        snapshot_id: "snap-1".to_string(),
        platform: "facebook".to_string(),
        competitor: "Acme".to_string(),
        brand: "Acme Milk".to_string(),
        category: "dairy".to_string(),
        crawl_date: "2025-01-10T00:00:00+00:00".to_string(),
    }
}

fn raw_post() -> Value {
    json!({
        "post_id": "123",
        "url": "https://facebook.com/acme/posts/123",
        "content": "  Hello   world 😀 ",
        "likes": "42",
        "date_posted": "2024-12-24T13:30:14.000Z",
        "attachments": [
            {"id": "a1", "type": "Video", "url": "https://fb/v1"},
            {"id": "a2", "type": "Photo", "url": "https://fb/p1"}
        ]
    })
}

fn degraded(record: &CanonicalRecord) -> Vec<&str> {
    record
        .get("processing_metadata.degraded_fields")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[test]
fn seeds_identity_and_crawl_context() {
    let record = transformer()
        .transform(&raw_post(), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();

    assert_eq!(record.get_str("id"), Some("123_crawl-9"));
    assert_eq!(record.get_str("crawl_id"), Some("crawl-9"));
    assert_eq!(record.get_str("snapshot_id"), Some("snap-1"));
    assert_eq!(record.get_str("platform"), Some("facebook"));
    assert_eq!(record.get_str("competitor"), Some("Acme"));
    assert_eq!(record.get_str("brand"), Some("Acme Milk"));
    assert_eq!(record.get_str("category"), Some("dairy"));
    assert_eq!(record.get_str("crawl_date"), Some("2025-01-10T00:00:00+00:00"));
    assert!(record.get_str("processed_date").is_some());
}

#[test]
fn date_posted_and_grouping_come_from_upload_date() {
    let record = transformer()
        .transform(&raw_post(), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get_str("date_posted"), Some("2024-12-24T13:30:14.000+00:00"));
    assert_eq!(record.grouped_date(), Some("2024-12-24"));
}

#[test]
fn missing_upload_date_groups_as_unknown() {
    let mut post = raw_post();
    post.as_object_mut().unwrap().remove("date_posted");
    let record = transformer()
        .transform(&post, Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get("date_posted"), None);
    assert_eq!(record.grouped_date(), Some(postmap_core::UNKNOWN_DATE));
}

#[test]
fn mappings_preprocess_and_truncate() {
    let record = transformer()
        .transform(&raw_post(), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();

    assert_eq!(record.get_str("post_id"), Some("123"));
    assert_eq!(record.get_str("post_url"), Some("https://facebook.com/acme/posts/123"));
    assert_eq!(record.get_str("post_content"), Some("Hello world"));
    assert_eq!(record.get("engagement_metrics.likes"), Some(&json!(42)));
    assert_eq!(record.get_str("post_type"), Some("post"));
}

#[test]
fn long_text_is_truncated_with_ellipsis() {
    let mut post = raw_post();
    post["content"] = json!("abcdefghijklmnopqrstuvwxyz");
    let record = transformer()
        .transform(&post, Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get_str("post_content"), Some("abcdefghijkl..."));
}

#[test]
fn computed_fields_see_earlier_fields() {
    let record = transformer()
        .transform(&raw_post(), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get("media_metadata.media_count"), Some(&json!(2)));
    assert_eq!(record.get("media_metadata.has_video"), Some(&json!(true)));
    assert_eq!(record.get("mystery"), None);
}

#[test]
fn processing_metadata_is_attached() {
    let record = transformer()
        .transform(&raw_post(), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get_str("processing_metadata.schema_version"), Some("1.0.0"));
    assert_eq!(
        record.get_str("processing_metadata.processing_version"),
        Some(PROCESSING_VERSION)
    );
    let score = record.get_f64(QUALITY_SCORE_FIELD).unwrap();
    assert!((0.0..=1.0).contains(&score), "score {score}");
    assert!(degraded(&record).is_empty());
}

#[test]
fn missing_fields_take_defaults_without_degrading() {
    let post = json!({"post_id": "7"});
    let record = transformer()
        .transform(&post, Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();

    assert_eq!(record.get("engagement_metrics.likes"), Some(&json!(0)));
    assert_eq!(record.get("media_metadata.attachments"), Some(&json!([])));
    assert_eq!(record.get("media_metadata.media_count"), Some(&json!(0)));
    assert_eq!(record.get("post_content"), None);
    assert_eq!(record.get("title"), None);
    assert!(degraded(&record).is_empty());
}

#[test]
fn null_source_counts_as_missing() {
    let mut post = raw_post();
    post["likes"] = Value::Null;
    let record = transformer()
        .transform(&post, Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get("engagement_metrics.likes"), Some(&json!(0)));
    assert!(degraded(&record).is_empty());
}

#[test]
fn failed_validation_falls_back_to_default() {
    let mut post = raw_post();
    post["url"] = json!("facebook.com/acme");
    let record = transformer()
        .transform(&post, Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get("post_url"), Some(&json!("")));
    assert_eq!(degraded(&record), vec!["post_url"]);
}

#[test]
fn preprocessing_error_falls_back_and_degrades() {
    let mut post = raw_post();
    post["attachments"] = json!("not-a-list");
    let record = transformer()
        .transform(&post, Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get("media_metadata.attachments"), Some(&json!([])));
    assert_eq!(record.get("media_metadata.media_count"), Some(&json!(0)));
    assert_eq!(degraded(&record), vec!["media_metadata.attachments"]);
}

#[test]
fn unknown_preprocessing_step_is_skipped() {
    let mut post = raw_post();
    post["title"] = json!("  Big   news ");
    let record = transformer()
        .transform(&post, Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get_str("title"), Some("Big news"));
}

#[test]
fn failing_computation_degrades_only_its_target() {
    let mut functions = FunctionRegistry::builtin();
    functions.register_computation(
        "check_video_attachments",
        |_: &Value, _: &CanonicalRecord| -> Result<Value, FieldError> {
            Err(FieldError::Invalid("boom".to_string()))
        },
    );
    let schemas: SchemaRegistry = [facebook_schema()].into_iter().collect();
    let transformer = SchemaTransformer::new(Arc::new(schemas), Arc::new(functions));

    let record = transformer
        .transform(&raw_post(), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get("media_metadata.has_video"), None);
    assert_eq!(record.get("media_metadata.media_count"), Some(&json!(2)));
    assert_eq!(degraded(&record), vec!["media_metadata.has_video"]);
}

#[test]
fn quality_falls_back_to_platform_scorer() {
    let mut schema = facebook_schema();
    schema.computed_fields = schema
        .computed_fields
        .iter()
        .filter(|(name, _)| *name != "quality")
        .map(|(name, field)| (name.to_string(), field.clone()))
        .collect();
    let schemas: SchemaRegistry = [schema].into_iter().collect();
    let transformer = SchemaTransformer::new(Arc::new(schemas), Arc::new(FunctionRegistry::builtin()));

    let record = transformer
        .transform(&json!({}), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(record.get_f64(QUALITY_SCORE_FIELD), Some(0.0));
    assert_eq!(record.get_str("id"), Some("_crawl-9"));
}

#[test]
fn unknown_schema_version_is_an_error() {
    let err = transformer()
        .transform(&raw_post(), Platform::Facebook, &metadata(), "9.9.9")
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::SchemaNotFound { ref platform, ref version }
            if platform == "facebook" && version == "9.9.9"
    ));
}

#[test]
fn unregistered_platform_is_an_error() {
    let err = transformer()
        .transform(&raw_post(), Platform::TikTok, &metadata(), "1.0.0")
        .unwrap_err();
    assert!(matches!(err, TransformError::SchemaNotFound { .. }));
}

#[test]
fn non_object_post_is_an_error() {
    let err = transformer()
        .transform(&json!([1, 2]), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap_err();
    assert!(matches!(err, TransformError::NotAnObject { found: "array" }));
}

#[test]
fn repeated_transforms_differ_only_in_processed_date() {
    let transformer = transformer();
    let strip = |record: CanonicalRecord| {
        let mut map = record.into_inner();
        map.remove("processed_date");
        map
    };
    let first = transformer
        .transform(&raw_post(), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    let second = transformer
        .transform(&raw_post(), Platform::Facebook, &metadata(), "1.0.0")
        .unwrap();
    assert_eq!(strip(first), strip(second));
}
