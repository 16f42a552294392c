// Bot detector trait and its verdict.

use anyhow::Result;

use super::features::ProfileFeatures;

/// Outcome of bot classification for one profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotVerdict {
    pub is_bot: bool,
    /// Probability of the bot class scaled to 0-100
    pub confidence: f64,
}

impl BotVerdict {
    /// Build a verdict from the classifier's label and its positive-class
    /// probability (0-1). Out-of-range or NaN probabilities are clamped.
    pub fn new(is_bot: bool, probability: f64) -> Self {
        let confidence = if probability.is_nan() {
            0.0
        } else {
            (probability * 100.0).clamp(0.0, 100.0)
        };
        Self { is_bot, confidence }
    }
}

/// Trait for scoring how likely a profile is to be automated.
/// Synchronous: a single eleven-column row is cheap to score.
pub trait BotDetector: Send + Sync {
    fn detect(&self, features: &ProfileFeatures) -> Result<BotVerdict>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_scaled_to_percent() {
        let v = BotVerdict::new(true, 0.873);
        assert!((v.confidence - 87.3).abs() < 1e-9);
        assert!(v.is_bot);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(BotVerdict::new(true, 1.2).confidence, 100.0);
        assert_eq!(BotVerdict::new(false, -0.1).confidence, 0.0);
        assert_eq!(BotVerdict::new(false, f64::NAN).confidence, 0.0);
    }
}
