// Per-post sentiment tallies.

use serde::{Deserialize, Serialize};

use super::models::CommentSentiment;
use crate::sentiment::traits::Sentiment;

/// Count of comments per sentiment class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

impl SentimentSummary {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn from_comments(comments: &[CommentSentiment]) -> Self {
        let mut summary = Self::default();
        for comment in comments {
            summary.record(comment.sentiment);
        }
        summary
    }

    pub fn total(&self) -> u32 {
        self.positive + self.negative + self.neutral
    }

    /// Share of a class as a percentage of all counted comments.
    pub fn percent(&self, sentiment: Sentiment) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let count = match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        };
        count as f64 / total as f64 * 100.0
    }
}

impl std::ops::AddAssign for SentimentSummary {
    fn add_assign(&mut self, other: Self) {
        self.positive += other.positive;
        self.negative += other.negative;
        self.neutral += other.neutral;
    }
}
