//! XLM-RoBERTa sequence classifier on candle.
//!
//! Loads a go-emotions style checkpoint either from a local directory or
//! from the HuggingFace Hub (cached under `~/.cache/huggingface/hub/`).
//! A directory must contain `config.json`, `tokenizer.json` and
//! `model.safetensors`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{
    Config as XLMRobertaConfig, XLMRobertaForSequenceClassification,
};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

use super::local::{labels_from_config, SequenceScorer};

/// Paths to the three files a checkpoint needs.
struct ModelFiles {
    config_path: PathBuf,
    tokenizer_path: PathBuf,
    weights_path: PathBuf,
}

impl ModelFiles {
    fn from_dir(dir: &Path) -> Result<Self> {
        let files = Self {
            config_path: dir.join("config.json"),
            tokenizer_path: dir.join("tokenizer.json"),
            weights_path: dir.join("model.safetensors"),
        };
        for path in [&files.config_path, &files.tokenizer_path, &files.weights_path] {
            if !path.exists() {
                anyhow::bail!("{} not found", path.display());
            }
        }
        Ok(files)
    }

    fn download(repo_id: &str) -> Result<Self> {
        let api = hf_hub::api::sync::Api::new().context("Failed to initialize HuggingFace Hub API")?;
        let repo = api.model(repo_id.to_string());
        Ok(Self {
            config_path: repo.get("config.json").context("Failed to download config.json")?,
            tokenizer_path: repo
                .get("tokenizer.json")
                .context("Failed to download tokenizer.json")?,
            weights_path: repo
                .get("model.safetensors")
                .context("Failed to download model.safetensors")?,
        })
    }
}

/// Multi-label emotion classifier running on the CPU.
pub struct XlmRobertaScorer {
    model: XLMRobertaForSequenceClassification,
    tokenizer: Tokenizer,
    device: Device,
    labels: Vec<String>,
    truncation: Option<usize>,
}

impl XlmRobertaScorer {
    /// Load from a model directory, or from the Hub when `model` is not a directory.
    pub fn load(model: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(model);
        let dir = Path::new(&*expanded);
        let files = if dir.is_dir() {
            info!("Loading emotion model from {}", dir.display());
            ModelFiles::from_dir(dir)?
        } else {
            info!("Fetching emotion model {} from the HuggingFace Hub", model);
            ModelFiles::download(model)?
        };
        Self::from_files(&files)
    }

    fn from_files(files: &ModelFiles) -> Result<Self> {
        let device = Device::Cpu;

        let config_str =
            std::fs::read_to_string(&files.config_path).context("Failed to read model config")?;
        let config: XLMRobertaConfig =
            serde_json::from_str(&config_str).context("Failed to parse XLM-RoBERTa config")?;
        let labels = labels_from_config(&config_str)?;

        let tokenizer = Tokenizer::from_file(&files.tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        // SAFETY: mmap'd safetensors file, valid while the file is not modified.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&files.weights_path], DType::F32, &device)
                .context("Failed to load model weights")?
        };
        let model = XLMRobertaForSequenceClassification::new(labels.len(), &config, vb)
            .context("Failed to construct XLM-RoBERTa model")?;

        Ok(Self {
            model,
            tokenizer,
            device,
            labels,
            truncation: None,
        })
    }

    fn set_truncation(&mut self, max_length: usize) -> Result<()> {
        if self.truncation == Some(max_length) {
            return Ok(());
        }
        self.tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;
        self.truncation = Some(max_length);
        Ok(())
    }
}

impl SequenceScorer for XlmRobertaScorer {
    fn backend_id(&self) -> &str {
        "xlm-roberta"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn logits(&mut self, text: &str, max_length: usize) -> Result<Vec<f32>> {
        self.set_truncation(max_length)?;

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;
        let input_ids = encoding.get_ids().to_vec();
        let attention_mask = encoding.get_attention_mask().to_vec();
        let seq_len = input_ids.len();

        let input_ids = Tensor::from_vec(input_ids, (1, seq_len), &self.device)?;
        let attention_mask = Tensor::from_vec(attention_mask, (1, seq_len), &self.device)?;
        // XLM-RoBERTa doesn't use token_type_ids
        let token_type_ids = input_ids.zeros_like()?;

        // [1, num_labels]
        let logits = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids)?;

        logits
            .flatten_all()?
            .to_vec1::<f32>()
            .context("Failed to convert logits to Vec")
    }
}
