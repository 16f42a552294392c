// Output records — field order and key names are the report format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::summary::SentimentSummary;
use crate::sentiment::traits::Sentiment;

/// The enriched account report written by the account pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReport {
    pub full_name: String,
    pub username: String,
    pub biography: String,
    pub followers_count: i64,
    pub follows_count: i64,
    pub posts_count: i64,
    pub profile_pic_url: Option<String>,
    pub is_bot: bool,
    /// 0-100
    pub bot_confidence_score: f64,
    pub biography_sentiment: ScoredSentiment,
    pub total_likes: i64,
    pub total_comments: i64,
    pub latest_posts: Vec<LatestPost>,
    pub sentiment_response: Vec<PostSentiment>,
}

/// A label with the classifier's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredSentiment {
    pub sentiment: Sentiment,
    pub score: f64,
}

/// One post in the report, with its caption sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPost {
    pub id: Option<Value>,
    // all lower-case, unlike the scraper's shortCode
    pub shortcode: Option<String>,
    pub display_url: Option<String>,
    pub alt: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub taken_at_timestamp: Option<Value>,
    pub caption_sentiment: Sentiment,
}

/// Comment sentiment for one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSentiment {
    pub post_url: Option<String>,
    pub comments: Vec<CommentSentiment>,
    pub summary: SentimentSummary,
}

/// A classified comment. Shared by both pipelines, hence snake_case
/// `profile_pic_url` next to camelCase elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentSentiment {
    pub user: Option<String>,
    pub text: String,
    pub sentiment: Sentiment,
    pub profile_pic_url: Option<String>,
    pub confidence: f64,
}
