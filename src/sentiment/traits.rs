// Sentiment classifier trait and the three-way label it produces.

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The normalized sentiment of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result of classifying a single piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    /// Probability of the chosen class, 0.0 to 1.0
    pub confidence: f64,
}

/// Trait for classifying text sentiment. Async because inference is pushed
/// onto a blocking thread so the runtime stays free.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify a single text.
    async fn classify(&self, text: &str) -> Result<SentimentResult>;

    /// Classify multiple texts, returning results in the same order.
    /// Default implementation calls classify sequentially — the ONNX
    /// classifier overrides it with real batching.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<SentimentResult>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text).await?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_serializes_lowercase() {
        let json = serde_json::to_string(&Sentiment::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        let back: Sentiment = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(back, Sentiment::Negative);
    }

    #[test]
    fn test_display_matches_as_str() {
        for s in [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive] {
            assert_eq!(s.to_string(), s.as_str());
        }
    }
}
