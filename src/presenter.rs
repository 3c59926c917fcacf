//! Turns classification results into display-ready views.
//!
//! Derives percentages, the primary emotion, a coarse valence bucket and
//! chart data. Pure functions of their inputs; nothing here touches the
//! network or the classifier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::classifier::{AnalysisResult, ErrorKind};

/// Coarse sentiment bucket for an emotion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Valence {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Valence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Valence::Positive => "positive",
            Valence::Negative => "negative",
            Valence::Neutral => "neutral",
        }
    }

    /// Message shown alongside the primary emotion.
    pub fn insight(&self) -> &'static str {
        match self {
            Valence::Positive => "The text carries a predominantly positive tone.",
            Valence::Negative => "The text carries a predominantly negative tone.",
            Valence::Neutral => "The text reads as neutral or mixed in tone.",
        }
    }
}

const POSITIVE_LABELS: &[&str] = &[
    "admiration",
    "amusement",
    "approval",
    "caring",
    "desire",
    "excitement",
    "gratitude",
    "joy",
    "love",
    "optimism",
    "pride",
    "relief",
];

const NEGATIVE_LABELS: &[&str] = &[
    "anger",
    "annoyance",
    "disappointment",
    "disapproval",
    "disgust",
    "embarrassment",
    "fear",
    "grief",
    "nervousness",
    "remorse",
    "sadness",
];

const NEUTRAL_LABELS: &[&str] = &["confusion", "curiosity", "neutral", "realization", "surprise"];

/// Label to valence lookup. Unknown labels are neutral.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValenceTable(HashMap<String, Valence>);

impl ValenceTable {
    /// Empty table; every label reads as neutral.
    pub fn new() -> Self {
        Self::default()
    }

    /// The 28 go-emotions labels.
    pub fn go_emotions() -> Self {
        let mut table = Self::new();
        for (labels, valence) in [
            (POSITIVE_LABELS, Valence::Positive),
            (NEGATIVE_LABELS, Valence::Negative),
            (NEUTRAL_LABELS, Valence::Neutral),
        ] {
            for label in labels {
                table.insert(label, valence);
            }
        }
        table
    }

    /// Add or replace a label. Labels are stored lowercase.
    pub fn insert(&mut self, label: &str, valence: Valence) {
        self.0.insert(label.to_lowercase(), valence);
    }

    /// Overlay entries from another table.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Valence)>,
    {
        for (label, valence) in entries {
            self.insert(&label, valence);
        }
    }

    /// Valence for a label, case-insensitive, neutral when absent.
    pub fn lookup(&self, label: &str) -> Valence {
        self.0
            .get(&label.to_lowercase())
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One emotion ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionRow {
    pub label: String,
    pub score: f32,
    /// `score * 100` rounded to two decimals.
    pub percent: f64,
}

/// Parallel label/value series for a bar chart, in display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Everything a front end needs to render one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PresentationView {
    Success {
        emotions: Vec<EmotionRow>,
        primary: EmotionRow,
        valence: Valence,
        insight: String,
        chart: ChartData,
    },
    Failure {
        kind: ErrorKind,
        message: String,
    },
}

impl PresentationView {
    pub fn is_success(&self) -> bool {
        matches!(self, PresentationView::Success { .. })
    }
}

/// Round a score to a percentage with two decimals.
pub fn to_percent(score: f32) -> f64 {
    (f64::from(score) * 100.0 * 100.0).round() / 100.0
}

/// Build the view for a classification result.
pub fn present(result: &AnalysisResult, valence_table: &ValenceTable) -> PresentationView {
    let ranked = match result {
        Ok(ranked) => ranked,
        Err(e) => {
            return PresentationView::Failure {
                kind: e.kind(),
                message: e.message().to_string(),
            }
        }
    };

    let emotions: Vec<EmotionRow> = ranked
        .iter()
        .map(|e| EmotionRow {
            label: e.label.clone(),
            score: e.score,
            percent: to_percent(e.score),
        })
        .collect();

    let chart = ChartData {
        labels: emotions.iter().map(|r| r.label.clone()).collect(),
        values: emotions.iter().map(|r| r.percent).collect(),
    };

    // RankedEmotionList is never empty
    let primary = emotions[0].clone();
    let valence = valence_table.lookup(&primary.label);

    PresentationView::Success {
        emotions,
        primary,
        valence,
        insight: valence.insight().to_string(),
        chart,
    }
}
