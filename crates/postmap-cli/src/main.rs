mod io;
mod media;
mod schemas;
mod transform;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use postmap_core::{CrawlMetadata, Platform};

#[derive(Debug, Parser)]
#[command(name = "postmap-cli")]
#[command(about = "Transform raw social posts into canonical records")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Transform a JSON array of raw posts into date-grouped canonical records.
    Transform {
        #[arg(long)]
        platform: Platform,
        #[arg(long)]
        input: PathBuf,
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overrides `POSTMAP_SCHEMA_VERSION`.
        #[arg(long)]
        schema_version: Option<String>,
        #[command(flatten)]
        crawl: CrawlArgs,
    },
    /// Detect media in a JSON array of raw posts and print the batch manifest.
    Media {
        #[arg(long)]
        platform: String,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List loaded schemas and any function names they reference but the
    /// registry lacks.
    Schemas,
}

#[derive(Debug, Args, Default, PartialEq, Eq)]
struct CrawlArgs {
    #[arg(long, default_value = "")]
    crawl_id: String,
    #[arg(long, default_value = "")]
    snapshot_id: String,
    #[arg(long, default_value = "")]
    competitor: String,
    #[arg(long, default_value = "")]
    brand: String,
    #[arg(long, default_value = "")]
    category: String,
    /// When the batch was scraped (never used for grouping).
    #[arg(long, default_value = "")]
    crawl_date: String,
}

impl CrawlArgs {
    fn into_metadata(self, platform: Platform) -> CrawlMetadata {
        CrawlMetadata {
            crawl_id: self.crawl_id,
            snapshot_id: self.snapshot_id,
            platform: platform.as_str().to_string(),
            competitor: self.competitor,
            brand: self.brand,
            category: self.category,
            crawl_date: self.crawl_date,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = postmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Transform {
            platform,
            input,
            output,
            schema_version,
            crawl,
        }) => {
            let version = schema_version.unwrap_or_else(|| config.schema_version.clone());
            let metadata = crawl.into_metadata(platform);
            transform::run_transform(
                &config,
                platform,
                &input,
                output.as_deref(),
                &version,
                &metadata,
            )?;
        }
        Some(Commands::Media {
            platform,
            input,
            output,
        }) => media::run_media(&platform, &input, output.as_deref())?,
        Some(Commands::Schemas) => schemas::run_schemas(&config)?,
        None => println!("postmap-cli: use --help to list commands"),
    }

    Ok(())
}
