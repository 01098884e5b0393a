use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.schema_dir.to_string_lossy(), "./schemas");
    assert_eq!(cfg.schema_version, "1.0.0");
    assert_eq!(cfg.workers, 1);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("POSTMAP_ENV", "production");
    map.insert("POSTMAP_LOG_LEVEL", "debug");
    map.insert("POSTMAP_SCHEMA_DIR", "/etc/postmap/schemas");
    map.insert("POSTMAP_SCHEMA_VERSION", "2.0.0");
    map.insert("POSTMAP_WORKERS", "8");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.schema_dir.to_string_lossy(), "/etc/postmap/schemas");
    assert_eq!(cfg.schema_version, "2.0.0");
    assert_eq!(cfg.workers, 8);
}

#[test]
fn build_app_config_rejects_non_numeric_workers() {
    let mut map = HashMap::new();
    map.insert("POSTMAP_WORKERS", "many");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POSTMAP_WORKERS"),
        "expected InvalidEnvVar(POSTMAP_WORKERS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_workers() {
    let mut map = HashMap::new();
    map.insert("POSTMAP_WORKERS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POSTMAP_WORKERS"),
        "expected InvalidEnvVar(POSTMAP_WORKERS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_blank_schema_version() {
    let mut map = HashMap::new();
    map.insert("POSTMAP_SCHEMA_VERSION", "  ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POSTMAP_SCHEMA_VERSION"),
        "expected InvalidEnvVar(POSTMAP_SCHEMA_VERSION), got: {result:?}"
    );
}
