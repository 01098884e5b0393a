use serde_json::json;

use super::*;

fn sample_schema() -> Schema {
    serde_json::from_value(json!({
        "platform": "tiktok",
        "schema_version": "1.0.0",
        "field_mappings": {
            "core_fields": {
                "video_id": {"source_field": "id", "target_field": "video_id", "validation": "non_empty_string"},
                "description": {
                    "source_field": "text",
                    "target_field": "description",
                    "preprocessing": ["clean_text", "shout"],
                    "max_length": 10
                }
            },
            "engagement": {
                "play_count": {"source_field": "playCount", "target_field": "play_count", "default_value": 0}
            }
        },
        "computed_fields": {
            "total": {"target_field": "engagement_metrics.total_engagement", "computation": "sum_tiktok_engagement"},
            "magic": {"target_field": "x.y", "computation": "summon_magic"}
        },
        "validation_rules": {
            "required_fields": ["video_id"],
            "data_quality_thresholds": {"minimum_score": 0.6}
        }
    }))
    .expect("sample schema should deserialize")
}

#[test]
fn key_combines_platform_and_version() {
    assert_eq!(sample_schema().key(), "tiktok_v1.0.0");
    assert_eq!(schema_key("youtube", "2.1"), "youtube_v2.1");
}

#[test]
fn mapping_groups_keep_document_order() {
    let schema = sample_schema();
    let order: Vec<(&str, &str)> = schema
        .mappings()
        .map(|(group, name, _)| (group, name))
        .collect();
    assert_eq!(
        order,
        vec![
            ("core_fields", "video_id"),
            ("core_fields", "description"),
            ("engagement", "play_count"),
        ]
    );
}

#[test]
fn computed_fields_keep_document_order() {
    let schema = sample_schema();
    let names: Vec<&str> = schema.computed_fields.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["total", "magic"]);
}

#[test]
fn optional_mapping_parts_default() {
    let schema = sample_schema();
    let video_id = schema.field_mappings.get("core_fields").unwrap().get("video_id").unwrap();
    assert!(video_id.preprocessing.is_empty());
    assert_eq!(video_id.max_length, None);
    assert_eq!(video_id.default_value, None);

    let plays = schema.field_mappings.get("engagement").unwrap().get("play_count").unwrap();
    assert_eq!(plays.default_value, Some(json!(0)));
}

#[test]
fn validation_rules_parse() {
    let rules = sample_schema().validation_rules;
    assert_eq!(rules.required_fields, vec!["video_id".to_string()]);
    assert!((rules.data_quality_thresholds.minimum_score - 0.6).abs() < f64::EPSILON);
}

#[test]
fn missing_sections_default_to_empty() {
    let schema: Schema =
        serde_json::from_value(json!({"platform": "facebook", "schema_version": "1.0.0"})).unwrap();
    assert!(schema.field_mappings.is_empty());
    assert!(schema.computed_fields.is_empty());
    assert!(schema.validation_rules.required_fields.is_empty());
}

#[test]
fn missing_platform_is_rejected() {
    let result: Result<Schema, _> = serde_json::from_value(json!({"schema_version": "1.0.0"}));
    assert!(result.is_err());
}

#[test]
fn reports_unknown_functions_in_both_namespaces() {
    let unknown = sample_schema().unknown_functions(&FunctionRegistry::builtin());
    assert_eq!(
        unknown,
        vec![
            UnknownFunction {
                kind: FunctionKind::Preprocessing,
                name: "shout".to_string(),
                target_field: "description".to_string(),
            },
            UnknownFunction {
                kind: FunctionKind::Computation,
                name: "summon_magic".to_string(),
                target_field: "x.y".to_string(),
            },
        ]
    );
    assert_eq!(
        unknown[1].to_string(),
        "computation function 'summon_magic' (target 'x.y')"
    );
}

#[test]
fn serializes_back_in_document_order() {
    let schema = sample_schema();
    let text = serde_json::to_string(&schema.computed_fields).unwrap();
    let total_at = text.find("\"total\"").unwrap();
    let magic_at = text.find("\"magic\"").unwrap();
    assert!(total_at < magic_at);
}
