//! Classifier data types and the ranking step.

use serde::{Deserialize, Serialize};

use super::error::ClassifyError;

/// Number of emotions kept in a ranked result.
pub const TOP_N: usize = 5;

/// Default tokenizer truncation bound for local models.
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// A single label score returned by the oracle.
///
/// Scores are independent per-label probabilities (sigmoid output), so a
/// set of them does not necessarily sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f32,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Text to classify plus the truncation bound for local tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: String,
    pub max_length: usize,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>, max_length: usize) -> Self {
        Self {
            text: text.into(),
            max_length,
        }
    }
}

/// Emotions sorted by descending score, at most [`TOP_N`] entries, never empty.
///
/// Only obtainable through [`RankedEmotionList::from_scores`], which is what
/// keeps the ordering and size invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedEmotionList(Vec<EmotionScore>);

impl RankedEmotionList {
    /// Rank raw oracle scores.
    ///
    /// Sorting is stable, so labels with equal scores keep the order the
    /// oracle returned them in.
    pub fn from_scores(mut scores: Vec<EmotionScore>) -> Result<Self, ClassifyError> {
        if scores.is_empty() {
            return Err(ClassifyError::EmptyResult(
                "Model returned no emotion labels".to_string(),
            ));
        }
        if let Some(bad) = scores.iter().find(|s| !s.score.is_finite()) {
            return Err(ClassifyError::Oracle(format!(
                "Model returned a non-finite score for {}",
                bad.label
            )));
        }
        // All scores are finite, so this is a total order
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        scores.truncate(TOP_N);
        Ok(Self(scores))
    }

    /// Highest scoring emotion.
    pub fn primary(&self) -> &EmotionScore {
        &self.0[0]
    }

    pub fn entries(&self) -> &[EmotionScore] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EmotionScore> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<EmotionScore> {
        self.0
    }
}

impl<'a> IntoIterator for &'a RankedEmotionList {
    type Item = &'a EmotionScore;
    type IntoIter = std::slice::Iter<'a, EmotionScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of a classification: a ranked list or a typed failure.
pub type AnalysisResult = Result<RankedEmotionList, ClassifyError>;
