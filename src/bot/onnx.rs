// Local ONNX bot classifier.
//
// The classifier is a scikit-learn model exported with skl2onnx using
// `options={"zipmap": False}`, so it exposes:
//   input  "float_input"   [1, 11] f32 (standardized features)
//   output 0 "label"         [1]     i64
//   output 1 "probabilities" [1, 2]  f32
// The scaler lives beside it as JSON (see scaler.rs).

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use super::features::{ProfileFeatures, FEATURE_COUNT};
use super::scaler::StandardScaler;
use super::traits::{BotDetector, BotVerdict};

/// Default file names inside `<model_dir>/bot/`.
pub const MODEL_FILE: &str = "bot_detection_model.onnx";
pub const SCALER_FILE: &str = "bot_detection_scaler.json";

/// Input name skl2onnx assigns for a float feature matrix.
const INPUT_NAME: &str = "float_input";

/// Scaler + classifier pair loaded from disk.
pub struct OnnxBotDetector {
    session: Mutex<Session>,
    scaler: StandardScaler,
}

impl OnnxBotDetector {
    /// Load the classifier and scaler. Both files must exist.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("Bot detection model not found: {}", model_path.display());
        }
        if !scaler_path.exists() {
            anyhow::bail!("Bot detection scaler not found: {}", scaler_path.display());
        }

        let scaler = StandardScaler::load(scaler_path)?;

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!(
                    "Failed to load bot detection model from {}",
                    model_path.display()
                )
            })?;

        debug!("Loaded bot detection model from {}", model_path.display());

        Ok(Self {
            session: Mutex::new(session),
            scaler,
        })
    }
}

impl BotDetector for OnnxBotDetector {
    fn detect(&self, features: &ProfileFeatures) -> Result<BotVerdict> {
        let scaled = self.scaler.transform(&features.to_array());
        let row: Vec<f32> = scaled.iter().map(|&v| v as f32).collect();

        let input = Tensor::from_array(([1i64, FEATURE_COUNT as i64], row))
            .context("Failed to create feature tensor")?;

        let (label, probabilities) = {
            let mut session = self
                .session
                .lock()
                .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

            let outputs = session
                .run(ort::inputs! { INPUT_NAME => input })
                .context("Bot detection inference failed")?;

            let (_shape, labels) = outputs[0]
                .try_extract_tensor::<i64>()
                .context("Failed to extract label tensor")?;
            let (_shape, probs) = outputs[1]
                .try_extract_tensor::<f32>()
                .context("Failed to extract probability tensor")?;

            (labels.first().copied(), probs.to_vec())
        };

        let verdict = verdict_from_outputs(label, &probabilities)?;
        debug!(
            is_bot = verdict.is_bot,
            confidence = verdict.confidence,
            "Scored profile for bot likelihood"
        );
        Ok(verdict)
    }
}

/// Combine the classifier outputs into a verdict. The bot class is index 1
/// of the probability row.
fn verdict_from_outputs(label: Option<i64>, probabilities: &[f32]) -> Result<BotVerdict> {
    let label = label.ok_or_else(|| anyhow::anyhow!("Classifier returned no label"))?;
    if probabilities.len() < 2 {
        anyhow::bail!(
            "Expected two class probabilities, got {}",
            probabilities.len()
        );
    }
    Ok(BotVerdict::new(label == 1, probabilities[1] as f64))
}
