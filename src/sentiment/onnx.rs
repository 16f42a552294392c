// Local ONNX sentiment classifier.
//
// Runs a pretrained three-class BERT text classifier (ONNX export of the
// HuggingFace model) on the local CPU. Every text is truncated to the same
// token limit, whichever pipeline it came from.
//
// Output: one logit per class, softmaxed and mapped through LabelSet.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::download::{SENTIMENT_MODEL_FILE, SENTIMENT_TOKENIZER_FILE};
use super::labels::LabelSet;
use super::traits::{SentimentClassifier, SentimentResult};

/// Local ONNX-based sentiment classifier. Holds the model session and
/// tokenizer behind Arc so inference can be moved to spawn_blocking.
pub struct OnnxSentimentClassifier {
    // ort::Session::run takes &mut self, hence the Mutex
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    labels: Arc<LabelSet>,
    batch_size: usize,
}

impl OnnxSentimentClassifier {
    /// Load the ONNX model, tokenizer and label config from `model_dir`.
    ///
    /// Expects `model.onnx` and `tokenizer.json`; `config.json` is optional.
    /// Inputs longer than `max_tokens` are truncated.
    pub fn load(model_dir: &Path, max_tokens: usize, batch_size: usize) -> Result<Self> {
        let model_path = model_dir.join(SENTIMENT_MODEL_FILE);
        let tokenizer_path = model_dir.join(SENTIMENT_TOKENIZER_FILE);

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nRun `sentiscope download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}\nRun `sentiscope download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_tokens,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        let labels = LabelSet::load(model_dir)?;

        debug!(
            labels = labels.len(),
            max_tokens,
            "Loaded ONNX sentiment model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            labels: Arc::new(labels),
            batch_size: batch_size.max(1),
        })
    }
}

#[async_trait]
impl SentimentClassifier for OnnxSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        let mut results = self.classify_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Classifier returned no result"))
    }

    /// Batched inference: texts are split into chunks of `batch_size`, each
    /// chunk is one forward pass. All CPU-bound work runs on a blocking thread.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<SentimentResult>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let labels = Arc::clone(&self.labels);
        let batch_size = self.batch_size;
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut results = Vec::with_capacity(texts.len());
            for chunk in texts.chunks(batch_size) {
                results.extend(classify_sync(&session, &tokenizer, &labels, chunk)?);
            }
            Ok(results)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Synchronous classification of one chunk: tokenize, pad, run, decode.
fn classify_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    labels: &LabelSet,
    texts: &[String],
) -> Result<Vec<SentimentResult>> {
    let encodings: Vec<_> = texts
        .iter()
        .map(|t| {
            tokenizer
                .encode(t.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);

    // An empty string still yields [CLS] [SEP]; zero means a broken tokenizer
    if max_len == 0 {
        anyhow::bail!("Tokenizer produced no tokens");
    }

    let pad_id = tokenizer.get_padding().map(|p| p.pad_id).unwrap_or(0) as i64;

    // BERT inputs, right-padded to max_len. Shape: [batch_size, max_len]
    let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut token_type_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

    for enc in &encodings {
        let seq_len = enc.get_ids().len();

        input_ids_flat.extend(enc.get_ids().iter().map(|&id| id as i64));
        attention_mask_flat.extend(enc.get_attention_mask().iter().map(|&m| m as i64));
        token_type_ids_flat.extend(enc.get_type_ids().iter().map(|&t| t as i64));

        let pad_len = max_len - seq_len;
        input_ids_flat.extend(std::iter::repeat_n(pad_id, pad_len));
        attention_mask_flat.extend(std::iter::repeat_n(0i64, pad_len));
        token_type_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
    }

    let shape = [batch_size as i64, max_len as i64];

    let input_ids_tensor =
        Tensor::from_array((shape, input_ids_flat)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat))
        .context("Failed to create attention_mask tensor")?;
    let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids_flat))
        .context("Failed to create token_type_ids tensor")?;

    let logits = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
            .context("Sentiment ONNX inference failed")?;

        // Output shape: [batch_size, num_labels] raw logits
        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract logits tensor")?;

        data.to_vec()
    };

    decode_rows(labels, &logits, texts)
}

/// Split a flat [batch, num_labels] logits buffer into per-text results.
fn decode_rows(labels: &LabelSet, logits: &[f32], texts: &[String]) -> Result<Vec<SentimentResult>> {
    let width = labels.len();
    if logits.len() != width * texts.len() {
        anyhow::bail!(
            "Expected {} logits for {} texts, model returned {}",
            width * texts.len(),
            texts.len(),
            logits.len()
        );
    }

    let mut results = Vec::with_capacity(texts.len());
    for (row, text) in logits.chunks(width).zip(texts) {
        let result = labels.decode(row)?;
        debug!(
            sentiment = %result.sentiment,
            confidence = result.confidence,
            text_preview = %crate::output::truncate_chars(text, 50),
            "Classified text"
        );
        results.push(result);
    }
    Ok(results)
}
