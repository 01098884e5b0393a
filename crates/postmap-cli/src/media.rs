use std::path::Path;

use crate::io::{read_posts, write_json};

pub(crate) fn run_media(platform: &str, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let posts = read_posts(input)?;
    let manifest = postmap_media::detect_media_batch(&posts, platform);
    write_json(&manifest, output)
}
