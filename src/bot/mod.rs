// Bot-likelihood scoring for a scraped profile.
//
// Profile attributes are turned into an eleven-feature vector, standardized
// with the scaler fitted alongside the classifier, and scored by a tabular
// classifier exported to ONNX. The BotDetector trait keeps the pipelines
// independent of the runtime.

pub mod features;
pub mod onnx;
pub mod scaler;
pub mod traits;
