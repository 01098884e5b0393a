use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values can fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_workers = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        let workers = raw
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if workers == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(workers)
    };

    let env = parse_environment(&or_default("POSTMAP_ENV", "development"));
    let log_level = or_default("POSTMAP_LOG_LEVEL", "info");
    let schema_dir = PathBuf::from(or_default("POSTMAP_SCHEMA_DIR", "./schemas"));

    let schema_version = or_default("POSTMAP_SCHEMA_VERSION", "1.0.0");
    if schema_version.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "POSTMAP_SCHEMA_VERSION".to_string(),
            reason: "must be non-empty".to_string(),
        });
    }

    let workers = parse_workers("POSTMAP_WORKERS", "1")?;

    Ok(AppConfig {
        env,
        log_level,
        schema_dir,
        schema_version,
        workers,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
