// Label handling for the text classifier.
//
// The model emits raw logits, one per class. The class order comes from
// id2label in the model's config.json; HuggingFace exports without names
// use LABEL_0..LABEL_2. The canonical mapping is:
//   LABEL_0 -> negative, LABEL_1 -> neutral, LABEL_2 -> positive
// Anything else is rejected rather than guessed.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::traits::{Sentiment, SentimentResult};

/// Labels assumed when the model ships without a config.json.
pub const DEFAULT_LABELS: [&str; 3] = ["LABEL_0", "LABEL_1", "LABEL_2"];

/// Map a model label to a sentiment. Accepts the generic LABEL_n codes and
/// human-readable names (case-insensitive).
pub fn sentiment_from_label(label: &str) -> Option<Sentiment> {
    match label.trim().to_ascii_lowercase().as_str() {
        "label_0" | "negative" | "neg" => Some(Sentiment::Negative),
        "label_1" | "neutral" | "neu" => Some(Sentiment::Neutral),
        "label_2" | "positive" | "pos" => Some(Sentiment::Positive),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Ordered class labels for a model: index i is the label of logit i.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    sentiments: Vec<Sentiment>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            sentiments: vec![Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive],
        }
    }
}

impl LabelSet {
    /// Build from ordered label strings, failing on any label outside the
    /// canonical mapping.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        if labels.is_empty() {
            anyhow::bail!("Model declares no output labels");
        }
        let sentiments = labels
            .iter()
            .map(|l| {
                sentiment_from_label(l.as_ref()).ok_or_else(|| {
                    anyhow::anyhow!("Unrecognized sentiment label {:?}", l.as_ref())
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sentiments })
    }

    /// Parse id2label out of a HuggingFace config.json body.
    pub fn from_config_json(json: &str) -> Result<Self> {
        let config: ModelConfig =
            serde_json::from_str(json).context("Failed to parse model config.json")?;
        if config.id2label.is_empty() {
            return Self::from_labels(&DEFAULT_LABELS);
        }

        let mut indexed = config
            .id2label
            .into_iter()
            .map(|(id, label)| {
                id.parse::<usize>()
                    .map(|i| (i, label))
                    .with_context(|| format!("Non-numeric id2label key {id:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(i, _)| *i);

        // Keys must be exactly 0..n so logit i lines up with label i
        for (expected, (i, _)) in indexed.iter().enumerate() {
            if *i != expected {
                anyhow::bail!("id2label is missing class index {expected}");
            }
        }

        let labels: Vec<String> = indexed.into_iter().map(|(_, l)| l).collect();
        Self::from_labels(&labels)
    }

    /// Load from `config.json` in the model directory, or fall back to the
    /// default LABEL_0..LABEL_2 ordering when the file is absent.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let path = model_dir.join("config.json");
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_config_json(&json)
    }

    pub fn len(&self) -> usize {
        self.sentiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentiments.is_empty()
    }

    /// Turn one row of logits into a result: softmax, then arg-max.
    pub fn decode(&self, logits: &[f32]) -> Result<SentimentResult> {
        if logits.len() != self.sentiments.len() {
            anyhow::bail!(
                "Model returned {} logits but {} labels are configured",
                logits.len(),
                self.sentiments.len()
            );
        }
        let probs = softmax(logits);
        let (index, confidence) = argmax(&probs)
            .ok_or_else(|| anyhow::anyhow!("Model returned no usable scores"))?;
        Ok(SentimentResult {
            sentiment: self.sentiments[index],
            confidence,
        })
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits
        .iter()
        .map(|&x| x as f64)
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&x| (x as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index and value of the largest finite entry. Ties go to the lower index.
pub fn argmax(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
}
