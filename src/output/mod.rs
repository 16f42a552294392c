// Output — JSON report files and terminal display.

pub mod terminal;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Serialize `value` as pretty JSON indented by `indent` spaces.
/// Non-ASCII text is written as-is.
pub fn to_json_string<T: Serialize>(value: &T, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).context("Failed to serialize JSON")?;
    String::from_utf8(buf).context("Serialized JSON was not UTF-8")
}

/// Write `value` to `path` as pretty JSON.
///
/// The file is written beside the destination first and renamed into
/// place, so readers never observe a partial report.
pub fn write_json<T: Serialize>(path: &Path, value: &T, indent: usize) -> Result<()> {
    let json = to_json_string(value, indent)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move output into {}", path.display()))?;
    Ok(())
}
