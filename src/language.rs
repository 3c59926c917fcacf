//! Language identification for submitted text.
//!
//! Uses the whatlang crate for trigram-based detection. The detected
//! language is advisory metadata only and never blocks analysis, so
//! [`LanguageIdentifier::identify`] folds every failure into the
//! `"unknown"` sentinel. [`LanguageIdentifier::try_identify`] keeps the
//! failure visible for callers and tests that care.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use whatlang::{Detector, Lang};

/// Sentinel tag used when detection fails.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// An ISO-639-1 style language code, or `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_LANGUAGE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_LANGUAGE
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a language could not be determined.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error("No text to detect a language from")]
    EmptyInput,
    #[error("Language could not be determined")]
    Undetermined,
    #[error("Detection of {code} is unreliable (confidence {confidence:.2})")]
    Unreliable { code: String, confidence: f64 },
}

/// Result of a successful detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageDetection {
    pub tag: LanguageTag,
    pub confidence: f64,
    pub reliable: bool,
}

/// Wraps the language detector.
pub struct LanguageIdentifier {
    detector: Detector,
    require_reliable: bool,
}

impl LanguageIdentifier {
    pub fn new() -> Self {
        Self {
            detector: Detector::new(),
            require_reliable: false,
        }
    }

    /// Treat detections whatlang flags as unreliable as failures.
    pub fn with_require_reliable(mut self, require_reliable: bool) -> Self {
        self.require_reliable = require_reliable;
        self
    }

    /// Detect the language of `text`.
    pub fn try_identify(&self, text: &str) -> Result<LanguageDetection, DetectionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DetectionError::EmptyInput);
        }

        let info = self.detector.detect(text).ok_or(DetectionError::Undetermined)?;
        let code = iso_code(info.lang());

        if self.require_reliable && !info.is_reliable() {
            return Err(DetectionError::Unreliable {
                code: code.to_string(),
                confidence: info.confidence(),
            });
        }

        Ok(LanguageDetection {
            tag: LanguageTag::new(code),
            confidence: info.confidence(),
            reliable: info.is_reliable(),
        })
    }

    /// Detect the language of `text`, or `"unknown"` if that fails.
    pub fn identify(&self, text: &str) -> LanguageTag {
        match self.try_identify(text) {
            Ok(detection) => detection.tag,
            Err(e) => {
                debug!("Language detection fell back to unknown: {}", e);
                LanguageTag::unknown()
            }
        }
    }
}

impl Default for LanguageIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-letter code for common languages, whatlang's three-letter code otherwise.
fn iso_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Fra => "fr",
        Lang::Spa => "es",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Swe => "sv",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Cmn => "zh", // whatlang uses Cmn for Mandarin
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Vie => "vi",
        Lang::Tha => "th",
        Lang::Ind => "id",
        Lang::Pes => "fa",
        // Indian languages
        Lang::Hin => "hi",
        Lang::Ben => "bn",
        Lang::Tam => "ta",
        Lang::Tel => "te",
        Lang::Mar => "mr",
        Lang::Guj => "gu",
        Lang::Kan => "kn",
        Lang::Mal => "ml",
        Lang::Pan => "pa",
        Lang::Urd => "ur",
        Lang::Ori => "or",
        Lang::Nep => "ne",
        Lang::Sin => "si",
        l => l.code(),
    }
}
