//! Configuration management for moodscope using the prefer crate.
//!
//! Config files are discovered by prefer (or given explicitly) and parsed
//! with serde. Each section applies its own environment overrides in its
//! `Default` impl, so a missing file still honours `MOODSCOPE_*` variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::ClassifierConfig;
use crate::language::LanguageIdentifier;
use crate::presenter::{Valence, ValenceTable};

/// Errors while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Language detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Report "unknown" instead of low-confidence guesses
    #[serde(default)]
    pub require_reliable: bool,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            require_reliable: false,
        }
        .with_env_overrides()
    }
}

impl LanguageConfig {
    /// Apply `MOODSCOPE_REQUIRE_RELIABLE_LANGUAGE` ("true"/"1").
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("MOODSCOPE_REQUIRE_RELIABLE_LANGUAGE") {
            self.require_reliable = val.eq_ignore_ascii_case("true") || val == "1";
        }
        self
    }

    pub fn build_identifier(&self) -> LanguageIdentifier {
        LanguageIdentifier::new().with_require_reliable(self.require_reliable)
    }
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    /// Per-label valence overrides on top of the go-emotions table
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub valence: HashMap<String, Valence>,
    /// File this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Automatically discovers moodscope config files; falls back to
    /// defaults with env overrides when none is found or it fails to parse.
    pub async fn load() -> Self {
        match prefer::load("moodscope").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}; using defaults", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        // File values win over defaults, env wins over file
        config.classifier = config.classifier.with_env_overrides();
        config.language = config.language.with_env_overrides();
        Ok(config)
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// go-emotions valence table with the configured overrides applied.
    pub fn valence_table(&self) -> ValenceTable {
        let mut table = ValenceTable::go_emotions();
        table.extend(self.valence.iter().map(|(k, v)| (k.clone(), *v)));
        table
    }

    /// Render the effective configuration as TOML (the API token is never included).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierMode;
    use std::io::Write;

    #[test]
    fn test_parse_toml() {
        let config = Config::parse(
            r#"
            [classifier]
            mode = "remote"
            endpoint = "https://router.example.test/models/go-emotions"
            timeout_secs = 20

            [language]
            require_reliable = true

            [valence]
            surprise = "positive"
            "#,
            "toml",
        )
        .unwrap();
        assert_eq!(config.classifier.mode, ClassifierMode::Remote);
        assert_eq!(config.classifier.timeout_secs, 20);
        assert!(config.language.require_reliable);
        assert_eq!(config.valence_table().lookup("surprise"), Valence::Positive);
        assert_eq!(config.valence_table().lookup("joy"), Valence::Positive);
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let config = Config::parse("classifier:\n  cache_capacity: 3\n", "yml").unwrap();
        assert_eq!(config.classifier.cache_capacity, 3);

        let config = Config::parse(r#"{"valence": {"Curiosity": "positive"}}"#, "json").unwrap();
        assert_eq!(config.valence_table().lookup("curiosity"), Valence::Positive);
    }

    #[test]
    fn test_example_config_parses() {
        let config = Config::parse(include_str!("../moodscope.example.toml"), "toml").unwrap();
        assert_eq!(config.classifier.mode, ClassifierMode::Remote);
        assert!(config.classifier.endpoint.is_some());
        assert!(config.classifier.api_token.is_none());
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("classifier = [", "toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[tokio::test]
    async fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[classifier]\nmax_length = 256").unwrap();

        let config = Config::load_from_path(file.path()).await.unwrap();
        assert_eq!(config.source_path.as_deref(), Some(file.path()));
        assert!(config.classifier.max_length == 256 || std::env::var("MOODSCOPE_MAX_LENGTH").is_ok());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = Config::load_from_path(Path::new("/nonexistent/moodscope.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
