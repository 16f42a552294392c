// Sentiment classification — trait-based abstraction over the text model.
//
// The SentimentClassifier trait defines the interface. OnnxSentimentClassifier
// runs the pretrained three-class model locally; tests swap in fakes without
// touching the pipelines.

pub mod download;
pub mod labels;
pub mod onnx;
pub mod traits;
