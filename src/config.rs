use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::sentiment::download;

/// Default HuggingFace location of the sentiment model export.
pub const DEFAULT_SENTIMENT_URL: &str =
    "https://huggingface.co/ganeshkharad/gk-hinglish-sentiment/resolve/main";

/// Longest token sequence the sentiment model accepts (its position
/// embedding size). Also the upper bound for SENTISCOPE_MAX_TOKENS.
pub const DEFAULT_MAX_TOKENS: usize = 512;

/// Texts per forward pass.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy, so every value here
/// can live there instead of the shell environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for model artifacts
    pub model_dir: PathBuf,
    /// Directory holding model.onnx, tokenizer.json and config.json
    pub sentiment_dir: PathBuf,
    /// Base URL the download-model command fetches from
    pub sentiment_url: String,
    /// Token limit applied to every text before inference
    pub max_tokens: usize,
    /// Maximum texts per ONNX forward pass
    pub batch_size: usize,
    /// skl2onnx export of the bot classifier
    pub bot_model_path: PathBuf,
    /// StandardScaler parameters for the bot classifier
    pub bot_scaler_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only malformed numbers are errors.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("SENTISCOPE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| download::default_model_dir());

        let sentiment_dir = env::var("SENTISCOPE_SENTIMENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| download::sentiment_model_dir(&model_dir));

        let bot_dir = model_dir.join("bot");

        Ok(Self {
            sentiment_dir,
            sentiment_url: env::var("SENTISCOPE_SENTIMENT_URL")
                .unwrap_or_else(|_| DEFAULT_SENTIMENT_URL.to_string()),
            max_tokens: token_limit(positive_var(
                "SENTISCOPE_MAX_TOKENS",
                DEFAULT_MAX_TOKENS,
            )?)?,
            batch_size: positive_var("SENTISCOPE_BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
            bot_model_path: env::var("SENTISCOPE_BOT_MODEL")
                .map(PathBuf::from)
                .unwrap_or_else(|_| bot_dir.join(crate::bot::onnx::MODEL_FILE)),
            bot_scaler_path: env::var("SENTISCOPE_BOT_SCALER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| bot_dir.join(crate::bot::onnx::SCALER_FILE)),
            model_dir,
        })
    }

    /// Check that the sentiment model has been downloaded.
    /// Call this before any pipeline that classifies text.
    pub fn require_sentiment_model(&self) -> Result<()> {
        if !download::sentiment_files_present(&self.sentiment_dir) {
            anyhow::bail!(
                "Sentiment model files not found in {}\n\
                 Run `sentiscope download-model` to download them,\n\
                 or point SENTISCOPE_SENTIMENT_DIR at an existing export.\n{}",
                self.sentiment_dir.display(),
                download::EXPORT_HINT
            );
        }
        Ok(())
    }

    /// Check that both bot-detection artifacts exist.
    pub fn require_bot_model(&self) -> Result<()> {
        if !self.bot_model_path.exists() {
            anyhow::bail!(
                "Bot detection model not found: {}\n\
                 Set SENTISCOPE_BOT_MODEL to the skl2onnx export of the classifier.",
                self.bot_model_path.display()
            );
        }
        if !self.bot_scaler_path.exists() {
            anyhow::bail!(
                "Bot detection scaler not found: {}\n\
                 Set SENTISCOPE_BOT_SCALER to the scaler parameters JSON.",
                self.bot_scaler_path.display()
            );
        }
        Ok(())
    }
}

/// Read a strictly positive integer from the environment, falling back to
/// `default` when the variable is unset.
fn positive_var(name: &str, default: usize) -> Result<usize> {
    match env::var(name) {
        Ok(raw) => parse_positive(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<usize> {
    let value: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("{name} must be a positive integer, got {raw:?}"))?;
    if value == 0 {
        anyhow::bail!("{name} must be greater than zero");
    }
    Ok(value)
}

fn token_limit(value: usize) -> Result<usize> {
    if value > DEFAULT_MAX_TOKENS {
        anyhow::bail!(
            "SENTISCOPE_MAX_TOKENS must be at most {DEFAULT_MAX_TOKENS}, the model's position limit, got {value}"
        );
    }
    Ok(value)
}
