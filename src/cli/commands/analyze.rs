//! Emotion analysis command.

use console::style;
use tokio::io::AsyncReadExt;

use crate::classifier::{AnalysisResult, ClassifyError, EmotionClassifier, EMPTY_INPUT_MESSAGE};
use crate::config::Config;
use crate::language::LanguageTag;
use crate::presenter::{present, PresentationView, Valence};
use crate::server::AnalyzeResponse;

const BAR_WIDTH: usize = 30;

/// Classify one piece of text and print the ranked emotions.
pub async fn cmd_analyze(config: &Config, text: Option<String>, json: bool) -> anyhow::Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let (language, result) = analyze_text(config, &text).await?;
    let view = present(&result, &config.valence_table());

    if json {
        let response = AnalyzeResponse {
            language,
            result: view,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return match response.result {
            PresentationView::Success { .. } => Ok(()),
            PresentationView::Failure { kind, message } => {
                Err(anyhow::anyhow!("{}: {}", kind, message))
            }
        };
    }

    println!(
        "{} Detected language: {}",
        style("→").cyan(),
        style(language.as_str().to_uppercase()).bold()
    );

    match view {
        PresentationView::Failure { kind, message } => {
            eprintln!("{} {}: {}", style("✗").red(), kind, message);
            Err(anyhow::anyhow!("Analysis failed"))
        }
        PresentationView::Success {
            emotions,
            primary,
            valence,
            insight,
            ..
        } => {
            println!("\n{}", style("Top Emotions").bold());
            println!("{}", "-".repeat(50));
            for row in &emotions {
                println!(
                    "  {:<16} {} {:>6.2}%",
                    row.label,
                    style(render_bar(row.percent, BAR_WIDTH)).cyan(),
                    row.percent
                );
            }
            println!(
                "\n{} Primary emotion: {} ({:.2}%)",
                style("✓").green(),
                style(&primary.label).bold(),
                primary.percent
            );
            let insight = match valence {
                Valence::Positive => style(insight).green(),
                Valence::Negative => style(insight).red(),
                Valence::Neutral => style(insight).dim(),
            };
            println!("  {}", insight);
            Ok(())
        }
    }
}

/// Detect the language and classify `text`.
///
/// Blank input is rejected before any oracle is built, so it reports a
/// validation error even when the classifier is not configured.
async fn analyze_text(config: &Config, text: &str) -> anyhow::Result<(LanguageTag, AnalysisResult)> {
    let language = config.language.build_identifier().identify(text);
    if text.trim().is_empty() {
        let err = ClassifyError::Validation(EMPTY_INPUT_MESSAGE.to_string());
        return Ok((language, Err(err)));
    }

    let classifier = EmotionClassifier::from_config(&config.classifier)?;
    let result = classifier.classify(text).await;
    Ok((language, result))
}

/// Fixed-width text progress bar for a percentage.
fn render_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifierConfig, ErrorKind};

    fn unconfigured() -> Config {
        Config {
            classifier: ClassifierConfig::base_default(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_validation_error_without_credentials() {
        for text in ["", "\n", "   \t"] {
            let (language, result) = analyze_text(&unconfigured(), text).await.unwrap();
            assert!(language.is_unknown());
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_for_real_text() {
        let err = analyze_text(&unconfigured(), "I am thrilled").await.unwrap_err();
        assert!(err.to_string().contains("API token") || err.to_string().contains("endpoint"));
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0.0, 10), "░░░░░░░░░░");
        assert_eq!(render_bar(50.0, 10), "█████░░░░░");
        assert_eq!(render_bar(100.0, 10), "██████████");
        assert_eq!(render_bar(140.0, 4), "████");
    }
}
