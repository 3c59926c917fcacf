//! In-process model oracle.
//!
//! A [`SequenceScorer`] produces one raw logit per label. This module owns
//! the logit to probability transform: every label goes through its own
//! sigmoid (multi-label output), never a softmax across labels.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use super::error::ClassifyError;
use super::types::{AnalysisRequest, EmotionScore};
use super::EmotionOracle;

/// A sequence-classification model that yields raw logits.
///
/// Model objects are not assumed safe for concurrent use; [`LocalOracle`]
/// serializes calls behind a mutex.
pub trait SequenceScorer: Send {
    /// Human-readable backend identifier (e.g. "xlm-roberta").
    fn backend_id(&self) -> &str;

    /// Label names indexed by logit position.
    fn labels(&self) -> &[String];

    /// Score `text`, truncated to `max_length` tokens.
    fn logits(&mut self, text: &str, max_length: usize) -> anyhow::Result<Vec<f32>>;
}

/// Logistic sigmoid.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Pair logits with labels, converting each through the sigmoid.
pub fn logits_to_scores(labels: &[String], logits: &[f32]) -> Result<Vec<EmotionScore>, ClassifyError> {
    if labels.len() != logits.len() {
        return Err(ClassifyError::Oracle(format!(
            "Model produced {} logits for {} labels",
            logits.len(),
            labels.len()
        )));
    }
    Ok(labels
        .iter()
        .zip(logits)
        .map(|(label, &logit)| EmotionScore::new(label.clone(), sigmoid(logit)))
        .collect())
}

/// Read the ordered label set from a model `config.json` (`id2label`).
pub fn labels_from_config(config_json: &str) -> anyhow::Result<Vec<String>> {
    let config: serde_json::Value = serde_json::from_str(config_json)
        .map_err(|e| anyhow::anyhow!("Failed to parse model config: {}", e))?;
    let id2label = config
        .get("id2label")
        .and_then(|v| v.as_object())
        .ok_or_else(|| anyhow::anyhow!("Model config missing id2label mapping"))?;

    let mut entries: Vec<(usize, String)> = Vec::with_capacity(id2label.len());
    for (key, value) in id2label {
        let idx: usize = key
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid label id in model config: {}", key))?;
        let label = value
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Label {} is not a string", key))?;
        entries.push((idx, label.to_string()));
    }
    entries.sort_by_key(|(idx, _)| *idx);

    if entries.is_empty() {
        anyhow::bail!("id2label is empty");
    }
    if entries.iter().enumerate().any(|(pos, (idx, _))| pos != *idx) {
        anyhow::bail!("id2label ids are not contiguous from 0");
    }
    Ok(entries.into_iter().map(|(_, label)| label).collect())
}

/// Oracle backed by a model loaded into this process.
pub struct LocalOracle {
    scorer: Arc<Mutex<Box<dyn SequenceScorer>>>,
    backend_id: String,
}

impl LocalOracle {
    pub fn new(scorer: Box<dyn SequenceScorer>) -> Self {
        let backend_id = scorer.backend_id().to_string();
        Self {
            scorer: Arc::new(Mutex::new(scorer)),
            backend_id,
        }
    }

    /// Load the bundled XLM-RoBERTa scorer for a hub model id or directory.
    #[cfg(feature = "local-model")]
    pub fn from_config(config: &super::ClassifierConfig) -> Result<Self, ClassifyError> {
        let scorer = super::candle_backend::XlmRobertaScorer::load(&config.model)
            .map_err(|e| ClassifyError::Configuration(format!("Failed to load model: {:#}", e)))?;
        Ok(Self::new(Box::new(scorer)))
    }

    #[cfg(not(feature = "local-model"))]
    pub fn from_config(_config: &super::ClassifierConfig) -> Result<Self, ClassifyError> {
        Err(ClassifyError::Configuration(
            "Local mode requires building with the `local-model` feature".to_string(),
        ))
    }
}

#[async_trait]
impl EmotionOracle for LocalOracle {
    fn oracle_id(&self) -> &str {
        &self.backend_id
    }

    async fn score(&self, request: &AnalysisRequest) -> Result<Vec<EmotionScore>, ClassifyError> {
        let scorer = Arc::clone(&self.scorer);
        let text = request.text.clone();
        let max_length = request.max_length;

        // Inference is CPU bound; keep it off the async workers
        tokio::task::spawn_blocking(move || {
            let mut guard = scorer
                .lock()
                .map_err(|_| ClassifyError::Oracle("Model lock poisoned".to_string()))?;
            let logits = guard
                .logits(&text, max_length)
                .map_err(|e| ClassifyError::Oracle(format!("Inference failed: {:#}", e)))?;
            debug!("{} produced {} logits", guard.backend_id(), logits.len());
            logits_to_scores(guard.labels(), &logits)
        })
        .await
        .map_err(|e| ClassifyError::Oracle(format!("Inference task failed: {}", e)))?
    }
}
