//! Remote inference endpoint client.
//!
//! Posts `{"inputs": text}` with a bearer token and normalizes the several
//! response shapes hosted text-classification endpoints produce.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::config::ClassifierConfig;
use super::error::ClassifyError;
use super::types::{AnalysisRequest, EmotionScore};
use super::EmotionOracle;

/// Inference API request format.
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// `{"error": "...", "estimated_time": 20.0}` returned while a model loads
/// or when the endpoint rejects the input.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Value,
    #[serde(default)]
    estimated_time: Option<f64>,
}

/// Client for a hosted text-classification endpoint.
pub struct RemoteOracle {
    endpoint: String,
    token: String,
    client: Client,
}

impl RemoteOracle {
    /// Create a client from configuration.
    ///
    /// Missing credentials or endpoint are reported here, before any
    /// request is attempted.
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                ClassifyError::Configuration(
                    "No inference endpoint configured (set MOODSCOPE_ENDPOINT)".to_string(),
                )
            })?;
        let token = config.token().ok_or_else(|| {
            ClassifyError::Configuration(
                "No API token configured (set MOODSCOPE_API_TOKEN or HF_TOKEN)".to_string(),
            )
        })?;

        if config.timeout_secs == 0 {
            return Err(ClassifyError::Configuration(
                "timeout_secs must be at least 1".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ClassifyError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmotionOracle for RemoteOracle {
    fn oracle_id(&self) -> &str {
        "remote"
    }

    async fn score(&self, request: &AnalysisRequest) -> Result<Vec<EmotionScore>, ClassifyError> {
        debug!("Posting {} chars to {}", request.text.len(), self.endpoint);
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&InferenceRequest {
                inputs: &request.text,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifyError::Transport(format!("Request timed out: {}", e))
                } else {
                    ClassifyError::Transport(format!("Connection error: {}", e))
                }
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClassifyError::Transport(format!("Failed to read response: {}", e)))?;

        if status != StatusCode::OK {
            warn!("Inference endpoint returned HTTP {}", status);
            return Err(ClassifyError::Transport(format!("HTTP {}: {}", status, body)));
        }

        parse_response(&body)
    }
}

/// Normalize an inference response body into a flat list of scores.
///
/// Shapes are tried in a fixed order: error object, list of lists, flat
/// list. Anything else is rejected as a parse error.
pub fn parse_response(body: &str) -> Result<Vec<EmotionScore>, ClassifyError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ClassifyError::Parse(format!("Response is not valid JSON: {}", e)))?;

    // Only objects have an "error" key
    if value.get("error").is_some() {
        let body: ErrorBody = serde_json::from_value(value).map_err(|_| unrecognized())?;
        if let Some(secs) = body.estimated_time {
            debug!("Model not ready, estimated time {:.1}s", secs);
        }
        let message = match body.error {
            Value::String(s) => s,
            other => other.to_string(),
        };
        return Err(ClassifyError::Oracle(message));
    }

    let nested = match value.as_array() {
        Some(items) => items.first().map_or(false, Value::is_array),
        None => return Err(unrecognized()),
    };

    if nested {
        // One inner list per input; a single input was sent
        let batches: Vec<Vec<EmotionScore>> =
            serde_json::from_value(value).map_err(|_| unrecognized())?;
        Ok(batches.into_iter().next().unwrap_or_default())
    } else {
        serde_json::from_value(value).map_err(|_| unrecognized())
    }
}

fn unrecognized() -> ClassifyError {
    ClassifyError::Parse("Unrecognized response shape".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ErrorKind;

    #[test]
    fn test_parse_nested() {
        let scores = parse_response(
            r#"[[{"label":"joy","score":0.91},{"label":"neutral","score":0.12}]]"#,
        )
        .unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], EmotionScore::new("joy", 0.91));
    }

    #[test]
    fn test_parse_flat() {
        let scores = parse_response(r#"[{"label":"fear","score":0.4}]"#).unwrap();
        assert_eq!(scores, vec![EmotionScore::new("fear", 0.4)]);
    }

    #[test]
    fn test_parse_error_object() {
        let err = parse_response(r#"{"error":"model loading","estimated_time":20.0}"#)
            .unwrap_err();
        assert_eq!(err, ClassifyError::Oracle("model loading".to_string()));

        let err = parse_response(r#"{"error":["bad input"]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Oracle);
        assert!(err.message().contains("bad input"));
    }

    #[test]
    fn test_parse_empty_lists() {
        assert!(parse_response("[]").unwrap().is_empty());
        assert!(parse_response("[[]]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_response("<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_parse_unknown_shape_fails_closed() {
        for body in [
            r#"{"labels":["joy"],"scores":[0.9]}"#,
            r#""joy""#,
            r#"[{"label":"joy"}]"#,
            r#"[[{"label":"joy","score":0.9}], 3]"#,
            r#"{"detail":"not found"}"#,
            "42",
        ] {
            let err = parse_response(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "body: {}", body);
        }
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let config = ClassifierConfig::base_default().with_endpoint("http://127.0.0.1:1/x");
        let err = RemoteOracle::new(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_zero_timeout_is_configuration_error() {
        let mut config = ClassifierConfig::base_default()
            .with_endpoint("http://127.0.0.1:1/x")
            .with_api_token("hf_abc");
        config.timeout_secs = 0;
        let err = RemoteOracle::new(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.message().contains("timeout_secs"));

        config.timeout_secs = 1;
        assert!(RemoteOracle::new(&config).is_ok());
    }

    #[test]
    fn test_missing_endpoint_is_configuration_error() {
        let config = ClassifierConfig::base_default().with_api_token("hf_abc");
        let err = RemoteOracle::new(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
