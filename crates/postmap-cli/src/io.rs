//! JSON file input and output shared by the commands.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

/// Reads a batch of raw posts: either a JSON array or an object with a
/// `posts` array.
pub(crate) fn read_posts(path: &Path) -> anyhow::Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {} as JSON", path.display()))?;
    posts_from_value(value).with_context(|| format!("unexpected layout in {}", path.display()))
}

pub(crate) fn posts_from_value(value: Value) -> anyhow::Result<Vec<Value>> {
    match value {
        Value::Array(posts) => Ok(posts),
        Value::Object(mut obj) => match obj.remove("posts") {
            Some(Value::Array(posts)) => Ok(posts),
            _ => anyhow::bail!("expected a JSON array or an object with a \"posts\" array"),
        },
        _ => anyhow::bail!("expected a JSON array or an object with a \"posts\" array"),
    }
}

/// Pretty-prints `value` to `output`, or to stdout when no path is given.
pub(crate) fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match output {
        Some(path) => std::fs::write(path, rendered + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
