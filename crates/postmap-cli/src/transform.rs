//! `transform` command: raw posts in, date-grouped canonical records out.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;

use postmap_core::{
    upload_date_summary, AppConfig, CanonicalRecord, CrawlMetadata, DateGroups, Platform,
    UploadDateSummary,
};
use postmap_schema::{process_posts, FunctionRegistry, SchemaRegistry, SchemaTransformer};

use crate::io::{read_posts, write_json};

#[derive(Debug, Serialize)]
struct FailureReport {
    index: usize,
    post_id: Option<String>,
    error: String,
}

#[derive(Debug, Serialize)]
struct TransformReport {
    platform: Platform,
    schema_version: String,
    summary: UploadDateSummary,
    groups: DateGroups<CanonicalRecord>,
    failures: Vec<FailureReport>,
}

pub(crate) fn run_transform(
    config: &AppConfig,
    platform: Platform,
    input: &Path,
    output: Option<&Path>,
    schema_version: &str,
    metadata: &CrawlMetadata,
) -> anyhow::Result<()> {
    let schemas = SchemaRegistry::load(&config.schema_dir)
        .with_context(|| format!("failed to load schemas from {}", config.schema_dir.display()))?;
    if schemas.get_schema(platform.as_str(), schema_version).is_none() {
        anyhow::bail!("no schema loaded for {platform} v{schema_version}");
    }

    let transformer =
        SchemaTransformer::new(Arc::new(schemas), Arc::new(FunctionRegistry::builtin()));
    let posts = read_posts(input)?;
    let outcome = process_posts(
        &transformer,
        &posts,
        platform,
        metadata,
        schema_version,
        config.workers,
    );

    let groups = outcome.grouped();
    let report = TransformReport {
        platform,
        schema_version: schema_version.to_string(),
        summary: upload_date_summary(&groups),
        groups,
        failures: outcome
            .failures
            .into_iter()
            .map(|f| FailureReport {
                index: f.index,
                post_id: f.post_id,
                error: f.error.to_string(),
            })
            .collect(),
    };

    write_json(&report, output)
}
