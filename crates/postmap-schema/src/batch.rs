use rayon::prelude::*;
use serde_json::Value;

use postmap_core::{group_by_upload_date, CanonicalRecord, CrawlMetadata, DateGroups, Platform};

use crate::error::TransformError;
use crate::transform::SchemaTransformer;

/// A raw post that could not be transformed.
#[derive(Debug)]
pub struct PostFailure {
    /// Position of the post in the input slice.
    pub index: usize,
    pub post_id: Option<String>,
    pub error: TransformError,
}

/// Records in input order plus the posts that failed.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<CanonicalRecord>,
    pub failures: Vec<PostFailure>,
}

impl BatchOutcome {
    /// Records partitioned by upload date.
    #[must_use]
    pub fn grouped(&self) -> DateGroups<CanonicalRecord> {
        group_by_upload_date(self.records.iter().cloned())
    }
}

/// Transforms a batch of raw posts from one platform.
///
/// A post-level failure is recorded and the batch continues. With
/// `workers > 1` posts are transformed on a dedicated rayon pool; output order
/// always matches input order.
#[must_use]
pub fn process_posts(
    transformer: &SchemaTransformer,
    raw_posts: &[Value],
    platform: Platform,
    metadata: &CrawlMetadata,
    schema_version: &str,
    workers: usize,
) -> BatchOutcome {
    let transform_one = |(index, raw): (usize, &Value)| {
        transformer
            .transform(raw, platform, metadata, schema_version)
            .map_err(|error| PostFailure {
                index,
                post_id: platform.post_id(raw),
                error,
            })
    };

    let results: Vec<Result<CanonicalRecord, PostFailure>> = if workers > 1 {
        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| {
                raw_posts
                    .par_iter()
                    .enumerate()
                    .map(transform_one)
                    .collect()
            }),
            Err(e) => {
                tracing::warn!(
                    workers,
                    error = %e,
                    "failed to build worker pool, running sequentially"
                );
                raw_posts.iter().enumerate().map(transform_one).collect()
            }
        }
    } else {
        raw_posts.iter().enumerate().map(transform_one).collect()
    };

    let mut outcome = BatchOutcome::default();
    for result in results {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(failure) => {
                tracing::error!(
                    platform = %platform,
                    index = failure.index,
                    post_id = failure.post_id.as_deref().unwrap_or_default(),
                    error = %failure.error,
                    "failed to transform post"
                );
                outcome.failures.push(failure);
            }
        }
    }

    tracing::info!(
        platform = %platform,
        crawl_id = %metadata.crawl_id,
        total = raw_posts.len(),
        transformed = outcome.records.len(),
        failed = outcome.failures.len(),
        "batch transformed"
    );
    outcome
}
