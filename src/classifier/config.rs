//! Classifier configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::DEFAULT_MAX_LENGTH;

/// Where emotion scores come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    /// Hosted inference endpoint (default)
    #[default]
    Remote,
    /// Model weights loaded into this process (feature: local-model)
    Local,
}

impl FromStr for ClassifierMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" | "api" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            other => Err(format!("Unknown classifier mode: {}", other)),
        }
    }
}

impl ClassifierMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierMode::Remote => "remote",
            ClassifierMode::Local => "local",
        }
    }
}

/// Configuration for the emotion classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Remote endpoint or local model
    #[serde(default)]
    pub mode: ClassifierMode,
    /// Full URL of the inference endpoint (remote mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Bearer token for the inference endpoint (remote mode)
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
    /// Hub model id or local model directory (local mode)
    #[serde(default = "default_model")]
    pub model: String,
    /// Tokenizer truncation bound
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Client-side timeout for remote calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum number of memoized results (0 disables the cache)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_model() -> String {
    "AnasAlokla/multilingual_go_emotions_V1.2".to_string()
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl ClassifierConfig {
    /// Defaults without env overrides.
    pub fn base_default() -> Self {
        Self {
            mode: ClassifierMode::default(),
            endpoint: None,
            api_token: None,
            model: default_model(),
            max_length: default_max_length(),
            timeout_secs: default_timeout_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }

    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::base_default()
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `MOODSCOPE_MODE`: "remote" or "local"
    /// - `MOODSCOPE_ENDPOINT`: inference endpoint URL
    /// - `MOODSCOPE_API_TOKEN`: bearer token (falls back to `HF_TOKEN`)
    /// - `MOODSCOPE_MODEL`: hub model id or local model directory
    /// - `MOODSCOPE_MAX_LENGTH`: tokenizer truncation bound
    /// - `MOODSCOPE_TIMEOUT_SECS`: remote call timeout
    /// - `MOODSCOPE_CACHE_CAPACITY`: memoized results kept (0 disables)
    ///
    /// Values already present in a config file are replaced; a token from
    /// the file is kept unless one of the token variables is set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(mode) = env_value("MOODSCOPE_MODE").and_then(|v| v.parse().ok()) {
            self.mode = mode;
        }
        if let Some(endpoint) = env_value("MOODSCOPE_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }
        if let Some(token) = env_value("MOODSCOPE_API_TOKEN").or_else(|| env_value("HF_TOKEN")) {
            self.api_token = Some(token);
        }
        if let Some(model) = env_value("MOODSCOPE_MODEL") {
            self.model = model;
        }
        if let Some(n) = env_value("MOODSCOPE_MAX_LENGTH").and_then(|v| v.parse().ok()) {
            self.max_length = n;
        }
        if let Some(n) = env_value("MOODSCOPE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        if let Some(n) = env_value("MOODSCOPE_CACHE_CAPACITY").and_then(|v| v.parse().ok()) {
            self.cache_capacity = n;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn with_api_token(mut self, token: &str) -> Self {
        self.api_token = Some(token.to_string());
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Token with surrounding whitespace removed, if any is set.
    pub fn token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Read a non-empty environment variable.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_default() {
        let config = ClassifierConfig::base_default();
        assert_eq!(config.mode, ClassifierMode::Remote);
        assert_eq!(config.max_length, 512);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.endpoint.is_none());
        assert!(config.model.contains("go_emotions"));
        assert!(config.is_default());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("LOCAL".parse::<ClassifierMode>(), Ok(ClassifierMode::Local));
        assert_eq!("api".parse::<ClassifierMode>(), Ok(ClassifierMode::Remote));
        assert!("gpu".parse::<ClassifierMode>().is_err());
    }

    #[test]
    fn test_blank_token_is_absent() {
        let config = ClassifierConfig::base_default().with_api_token("   ");
        assert!(config.token().is_none());

        let config = ClassifierConfig::base_default().with_api_token(" hf_abc ");
        assert_eq!(config.token(), Some("hf_abc"));
    }

    #[test]
    fn test_token_never_serialized() {
        let config = ClassifierConfig::base_default()
            .with_endpoint("https://example.test/models/x")
            .with_api_token("hf_secret");
        let toml = toml::to_string(&config).unwrap();
        assert!(!toml.contains("hf_secret"));
        assert!(toml.contains("example.test"));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: ClassifierConfig = toml::from_str(
            r#"
            mode = "local"
            cache_capacity = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, ClassifierMode::Local);
        assert_eq!(config.cache_capacity, 0);
        assert_eq!(config.max_length, 512);
    }
}
