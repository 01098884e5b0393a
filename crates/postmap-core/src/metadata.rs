use serde::{Deserialize, Serialize};

/// Crawl and business context supplied by the caller for every batch.
///
/// Every field is optional on the wire; absent values become empty strings,
/// matching how they are copied verbatim into canonical records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlMetadata {
    pub crawl_id: String,
    pub snapshot_id: String,
    pub platform: String,
    pub competitor: String,
    pub brand: String,
    pub category: String,
    /// When the batch was scraped. Never used as a grouping key.
    pub crawl_date: String,
}
