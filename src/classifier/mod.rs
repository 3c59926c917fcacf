//! Emotion classification adapter.
//!
//! Sends text to an emotion-scoring oracle (a hosted inference endpoint or
//! a model loaded in-process) and normalizes whatever comes back into a
//! ranked top-5 list or a typed failure.

mod cache;
mod config;
mod error;
mod local;
mod remote;
mod types;

#[cfg(feature = "local-model")]
mod candle_backend;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

pub use cache::ResultCache;
pub use config::{ClassifierConfig, ClassifierMode};
pub use error::{ClassifyError, ErrorKind};
pub use local::{labels_from_config, logits_to_scores, sigmoid, LocalOracle, SequenceScorer};
pub use remote::{parse_response, RemoteOracle};
pub use types::{
    AnalysisRequest, AnalysisResult, EmotionScore, RankedEmotionList, DEFAULT_MAX_LENGTH, TOP_N,
};

#[cfg(feature = "local-model")]
pub use candle_backend::XlmRobertaScorer;

/// A source of per-label emotion scores.
///
/// Implementations return the raw, unsorted label list; ranking and
/// truncation happen in [`EmotionClassifier`].
#[async_trait]
pub trait EmotionOracle: Send + Sync {
    /// Human-readable oracle identifier (e.g. "remote", "xlm-roberta").
    fn oracle_id(&self) -> &str;

    /// Score every label the oracle knows for the given text.
    async fn score(&self, request: &AnalysisRequest) -> Result<Vec<EmotionScore>, ClassifyError>;
}

/// Message returned for blank input.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to analyze.";

/// Classifies text into a ranked list of emotions.
///
/// Built once at startup and shared; holds the oracle and the optional
/// result cache.
pub struct EmotionClassifier {
    oracle: Arc<dyn EmotionOracle>,
    cache: Option<ResultCache>,
    max_length: usize,
}

impl EmotionClassifier {
    /// Create a classifier around an existing oracle.
    pub fn new(oracle: Arc<dyn EmotionOracle>, config: &ClassifierConfig) -> Self {
        let cache = ResultCache::new(config.cache_capacity);
        Self {
            oracle,
            cache,
            max_length: config.max_length,
        }
    }

    /// Build the oracle selected by `config.mode` and wrap it.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        let oracle: Arc<dyn EmotionOracle> = match config.mode {
            ClassifierMode::Remote => {
                let oracle = RemoteOracle::new(config)?;
                info!("Using remote emotion oracle at {}", oracle.endpoint());
                Arc::new(oracle)
            }
            ClassifierMode::Local => {
                let oracle = LocalOracle::from_config(config)?;
                info!("Using local emotion model {}", config.model);
                Arc::new(oracle)
            }
        };
        Ok(Self::new(oracle, config))
    }

    pub fn oracle_id(&self) -> &str {
        self.oracle.oracle_id()
    }

    pub fn cache(&self) -> Option<&ResultCache> {
        self.cache.as_ref()
    }

    /// Classify `text` into at most [`TOP_N`] emotions, highest first.
    ///
    /// Blank input is rejected without calling the oracle. Only successful
    /// results are memoized.
    pub async fn classify(&self, text: &str) -> AnalysisResult {
        if text.trim().is_empty() {
            return Err(ClassifyError::Validation(EMPTY_INPUT_MESSAGE.to_string()));
        }

        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(text)) {
            debug!("Cache hit for {} chars of input", text.len());
            return Ok(hit);
        }

        let request = AnalysisRequest::new(text, self.max_length);
        let scores = self.oracle.score(&request).await.map_err(|e| {
            warn!("Emotion oracle {} failed: {} ({})", self.oracle.oracle_id(), e, e.kind());
            e
        })?;
        let ranked = RankedEmotionList::from_scores(scores)?;

        if let Some(cache) = &self.cache {
            cache.insert(text.to_string(), ranked.clone());
        }
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic oracle that counts calls.
    struct StubOracle {
        response: Result<Vec<EmotionScore>, ClassifyError>,
        calls: AtomicUsize,
    }

    impl StubOracle {
        fn returning(pairs: &[(&str, f32)]) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(pairs
                    .iter()
                    .map(|(label, score)| EmotionScore::new(*label, *score))
                    .collect()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(err: ClassifyError) -> Arc<Self> {
            Arc::new(Self {
                response: Err(err),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmotionOracle for StubOracle {
        fn oracle_id(&self) -> &str {
            "stub"
        }

        async fn score(&self, _request: &AnalysisRequest) -> Result<Vec<EmotionScore>, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    fn uncached() -> ClassifierConfig {
        ClassifierConfig::base_default().with_cache_capacity(0)
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_oracle() {
        let oracle = StubOracle::returning(&[("joy", 0.9)]);
        let classifier = EmotionClassifier::new(oracle.clone(), &uncached());

        for text in ["", "   ", "\n\t"] {
            let err = classifier.classify(text).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_ranks_and_truncates() {
        let oracle = StubOracle::returning(&[
            ("neutral", 0.05),
            ("joy", 0.9),
            ("pride", 0.6),
            ("anger", 0.9),
            ("fear", 0.3),
            ("love", 0.2),
            ("relief", 0.1),
        ]);
        let classifier = EmotionClassifier::new(oracle, &uncached());

        let ranked = classifier.classify("I feel proud and happy today!").await.unwrap();
        let labels: Vec<&str> = ranked.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["joy", "anger", "pride", "fear", "love"]);
    }

    #[tokio::test]
    async fn test_identical_text_gives_identical_results() {
        let oracle = StubOracle::returning(&[("joy", 0.8), ("love", 0.4)]);
        let classifier = EmotionClassifier::new(oracle.clone(), &uncached());

        let first = classifier.classify("same text").await.unwrap();
        let second = classifier.classify("same text").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_oracle() {
        let oracle = StubOracle::returning(&[("joy", 0.8)]);
        let config = ClassifierConfig::base_default().with_cache_capacity(8);
        let classifier = EmotionClassifier::new(oracle.clone(), &config);

        classifier.classify("hello").await.unwrap();
        classifier.classify("hello").await.unwrap();
        classifier.classify("hello!").await.unwrap();
        assert_eq!(oracle.calls(), 2);
        assert_eq!(classifier.cache().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let oracle = StubOracle::failing(ClassifyError::Oracle("model loading".to_string()));
        let config = ClassifierConfig::base_default().with_cache_capacity(8);
        let classifier = EmotionClassifier::new(oracle.clone(), &config);

        for _ in 0..2 {
            let err = classifier.classify("hello").await.unwrap_err();
            assert_eq!(err, ClassifyError::Oracle("model loading".to_string()));
        }
        assert_eq!(oracle.calls(), 2);
        assert!(classifier.cache().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_classify_shares_cache() {
        let oracle = StubOracle::returning(&[("joy", 0.8), ("love", 0.4)]);
        let config = ClassifierConfig::base_default().with_cache_capacity(4);
        let classifier = Arc::new(EmotionClassifier::new(oracle.clone(), &config));
        let expected = RankedEmotionList::from_scores(vec![
            EmotionScore::new("joy", 0.8),
            EmotionScore::new("love", 0.4),
        ])
        .unwrap();

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let classifier = Arc::clone(&classifier);
                tokio::spawn(async move { classifier.classify(&format!("text {}", i % 8)).await })
            })
            .collect();

        for handle in handles {
            let ranked = handle.await.unwrap().unwrap();
            assert_eq!(ranked, expected);
        }
        let cache = classifier.cache().unwrap();
        assert!(cache.len() <= 4);
        assert!(!cache.is_empty());
        assert!(oracle.calls() >= 8);
    }

    #[tokio::test]
    async fn test_nan_scores_are_oracle_errors() {
        let oracle = StubOracle::returning(&[("joy", 0.9), ("fear", f32::NAN)]);
        let classifier = EmotionClassifier::new(oracle, &ClassifierConfig::base_default());

        let err = classifier.classify("hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Oracle);
        assert!(classifier.cache().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_oracle_output() {
        let oracle = StubOracle::returning(&[]);
        let classifier = EmotionClassifier::new(oracle, &uncached());
        let err = classifier.classify("hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
    }

    #[test]
    fn test_from_config_requires_token() {
        let config = ClassifierConfig::base_default().with_endpoint("https://example.test/model");
        let err = EmotionClassifier::from_config(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let classifier = EmotionClassifier::new(StubOracle::returning(&[]), &uncached());
        assert!(classifier.cache().is_none());
    }
}
