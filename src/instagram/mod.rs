// Scraped Instagram records and the JSON loader shared by the pipelines.

pub mod models;

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read and parse a UTF-8 JSON file, with distinct errors for a missing
/// file and malformed content.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            anyhow::bail!("Input file not found: {}", path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Failed to parse JSON in {}: {}", path.display(), e))
}
