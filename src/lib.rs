//! Multilingual emotion analysis.
//!
//! Text goes through three stages: [`language::LanguageIdentifier`] tags it
//! with a language code, [`classifier::EmotionClassifier`] asks a pretrained
//! go-emotions model for label scores and ranks them, and
//! [`presenter::present`] turns the ranked list into percentages, a valence
//! bucket and chart data. The [`server`] and [`cli`] modules are thin front
//! ends over those three.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod language;
pub mod presenter;
pub mod server;

pub use classifier::{AnalysisResult, ClassifyError, EmotionClassifier, ErrorKind};
pub use config::Config;
pub use language::{LanguageIdentifier, LanguageTag};
pub use presenter::{present, PresentationView, ValenceTable};
