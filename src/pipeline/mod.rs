// Enrichment pipelines.
//
// Each pipeline is linear: load JSON, classify, shape, write JSON once.

pub mod account;
pub mod comments;

use std::path::Path;

use anyhow::Result;

use crate::instagram::read_json;
use crate::report::models::CommentSentiment;
use crate::report::summary::SentimentSummary;

/// Re-read a comment sentiment file and tally it.
pub fn summarize_file(path: &Path) -> Result<(Vec<CommentSentiment>, SentimentSummary)> {
    let comments: Vec<CommentSentiment> = read_json(path)?;
    let summary = SentimentSummary::from_comments(&comments);
    Ok((comments, summary))
}
