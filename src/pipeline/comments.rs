// Comment pipeline: scraped comment array -> classified comment array.

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::info;

use crate::instagram::models::ScrapedComment;
use crate::instagram::read_json;
use crate::report::models::CommentSentiment;
use crate::sentiment::traits::SentimentClassifier;

/// Indentation of the comment sentiment file.
pub const COMMENTS_INDENT: usize = 4;

/// Placeholder for comments whose author is unknown.
pub const UNKNOWN_USER: &str = "unknown";

/// Comments classified per progress step.
const CHUNK: usize = 32;

/// Classify every comment in `input_path` and write the array to
/// `output_path` once all comments are done.
pub async fn run(
    input_path: &Path,
    output_path: &Path,
    classifier: &dyn SentimentClassifier,
) -> Result<Vec<CommentSentiment>> {
    let raw: Value = read_json(input_path)?;
    let comments = parse_comments(raw)?;

    println!("Processing {} comments...", comments.len());
    info!(count = comments.len(), path = %input_path.display(), "Loaded comments");

    let results = classify_comments(&comments, classifier).await?;

    crate::output::write_json(output_path, &results, COMMENTS_INDENT)
        .with_context(|| format!("Failed to save results to {}", output_path.display()))?;
    info!(path = %output_path.display(), "Comment sentiment written");

    Ok(results)
}

/// The input must be a JSON array of comment objects.
pub fn parse_comments(raw: Value) -> Result<Vec<ScrapedComment>> {
    if !raw.is_array() {
        anyhow::bail!("JSON file must contain an array of comment objects.");
    }
    serde_json::from_value(raw).context("Malformed comment object")
}

/// Classify comments in order, filling in defaults for missing authors.
pub async fn classify_comments(
    comments: &[ScrapedComment],
    classifier: &dyn SentimentClassifier,
) -> Result<Vec<CommentSentiment>> {
    let pb = ProgressBar::new(comments.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Comments [{bar:30}] {pos}/{len} ({eta})")
            .context("Invalid progress template")?,
    );

    let mut results = Vec::with_capacity(comments.len());
    for chunk in comments.chunks(CHUNK) {
        let texts: Vec<String> = chunk.iter().map(|c| c.text.clone()).collect();
        let scored = classifier.classify_batch(&texts).await?;
        if scored.len() != chunk.len() {
            anyhow::bail!(
                "Classifier returned {} results for {} comments",
                scored.len(),
                chunk.len()
            );
        }

        for (comment, result) in chunk.iter().zip(scored) {
            results.push(CommentSentiment {
                user: Some(
                    comment
                        .owner
                        .username
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_USER.to_string()),
                ),
                text: comment.text.clone(),
                sentiment: result.sentiment,
                profile_pic_url: Some(comment.owner.profile_pic_url.clone().unwrap_or_default()),
                confidence: result.confidence,
            });
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    Ok(results)
}
