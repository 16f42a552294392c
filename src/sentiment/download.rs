// Model download helper for the sentiment classifier.
//
// Fetches the ONNX export, tokenizer and label config from a HuggingFace
// repository (configurable via SENTISCOPE_SENTIMENT_URL). Files are stored
// in a platform-appropriate directory (~/.local/share/sentiscope/models/ on
// Linux) so they persist across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Local file names inside the sentiment model directory.
pub const SENTIMENT_MODEL_FILE: &str = "model.onnx";
pub const SENTIMENT_TOKENIZER_FILE: &str = "tokenizer.json";
pub const SENTIMENT_CONFIG_FILE: &str = "config.json";

/// Where the ONNX export lives inside the remote repository.
const REMOTE_MODEL_PATH: &str = "onnx/model.onnx";

/// How to produce the model directory when no repository hosts an export.
pub const EXPORT_HINT: &str = "\
To export the model locally (needs Python with optimum installed):
  optimum-cli export onnx --model ganeshkharad/gk-hinglish-sentiment \\
      --task text-classification <dir>
then set SENTISCOPE_SENTIMENT_DIR=<dir>, or set SENTISCOPE_SENTIMENT_URL
to a repository that hosts onnx/model.onnx and tokenizer.json.";

/// Returns the default directory for storing model files.
/// Uses the platform data directory: ~/.local/share/sentiscope/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentiscope")
        .join("models")
}

/// Subdirectory within model_dir for the sentiment model.
pub fn sentiment_model_dir(base: &Path) -> PathBuf {
    base.join("sentiment")
}

/// Check whether the files needed to run the classifier exist.
/// config.json is optional and not checked here.
pub fn sentiment_files_present(dir: &Path) -> bool {
    dir.join(SENTIMENT_MODEL_FILE).exists() && dir.join(SENTIMENT_TOKENIZER_FILE).exists()
}

/// Download the sentiment model into `dir` from `base_url`.
///
/// Skips files that already exist. Creates directories as needed.
pub async fn download_model(base_url: &str, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    let base_url = base_url.trim_end_matches('/');
    let files = [
        (SENTIMENT_CONFIG_FILE, SENTIMENT_CONFIG_FILE, false),
        (SENTIMENT_TOKENIZER_FILE, SENTIMENT_TOKENIZER_FILE, false),
        (REMOTE_MODEL_PATH, SENTIMENT_MODEL_FILE, true),
    ];

    for (remote, local, large) in files {
        let dest = dir.join(local);
        if dest.exists() {
            info!(file = local, "Already present, skipping");
            println!("  {} (already exists)", local);
            continue;
        }
        println!("  Downloading {}...", local);
        download_file(&format!("{base_url}/{remote}"), local, &dest, large).await?;
    }

    Ok(())
}

/// Error for a non-success download response, naming the file involved.
/// A 404 usually means the repository has no ONNX export.
fn download_error(file: &str, url: &str, status: reqwest::StatusCode) -> anyhow::Error {
    if status == reqwest::StatusCode::NOT_FOUND {
        anyhow::anyhow!(
            "{file} is not published at {url} (status {status})\n{EXPORT_HINT}"
        )
    } else {
        anyhow::anyhow!("Download of {file} failed with status {status}: {url}")
    }
}

/// Download a single file from a URL to a local path.
/// If `show_progress` is true, display a progress bar.
async fn download_file(url: &str, file: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {file} from {url}"))?;

    if !response.status().is_success() {
        return Err(download_error(file, url, response.status()));
    }

    let pb = if show_progress {
        let pb = match response.content_length() {
            Some(size) => {
                let pb = ProgressBar::new(size);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                        .context("Invalid progress template")?
                        .progress_chars("=> "),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("    {spinner} {bytes}")
                        .context("Invalid progress template")?,
                );
                pb
            }
        };
        Some(pb)
    } else {
        None
    };

    // Buffer chunk by chunk so the bar moves during the transfer
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        body.extend_from_slice(&chunk);
        if let Some(ref pb) = pb {
            pb.set_position(body.len() as u64);
        }
    }

    // Write next to the destination and rename, so an interrupted download
    // never looks like a complete model file
    let partial = dest.with_extension("part");
    std::fs::write(&partial, &body)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move {} into place", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}
