// Standard scaler for the bot classifier features.
//
// Parameters are exported from the fitted scikit-learn `StandardScaler`
// (`mean_` and `scale_`) as JSON:
//
// ```json
// { "feature_names": ["profile_pic", ...], "mean": [...], "scale": [...] }
// ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::features::{FEATURE_COUNT, FEATURE_NAMES};

/// Z-score standardization with fixed, pre-fitted parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Optional column names, checked against FEATURE_NAMES when present
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Per-feature means
    pub mean: Vec<f64>,
    /// Per-feature standard deviations
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Parse and validate scaler parameters from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let scaler: Self = serde_json::from_str(json).context("Invalid scaler JSON")?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load scaler parameters from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Bad scaler file {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            anyhow::bail!(
                "Scaler must have {} means and scales, found {} and {}",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            );
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                anyhow::bail!(
                    "Scaler feature order {:?} does not match expected {:?}",
                    names,
                    FEATURE_NAMES
                );
            }
        }
        Ok(())
    }

    /// Standardize one row: (x - mean) / scale. A zero scale leaves the
    /// centered value unscaled, as scikit-learn does for constant columns.
    pub fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, value) in row.iter().enumerate() {
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            out[i] = (value - self.mean[i]) / scale;
        }
        out
    }
}
