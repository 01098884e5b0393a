use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Directory scanned for `*_schema_v*.{json,yaml,yml}` documents.
    pub schema_dir: PathBuf,
    /// Schema version used when the caller does not ask for one.
    pub schema_version: String,
    /// Worker threads for batch transformation; `1` keeps it sequential.
    pub workers: usize,
}
