//! Language detection command.

use console::style;

use crate::config::Config;

pub fn cmd_detect(config: &Config, text: &str) -> anyhow::Result<()> {
    let identifier = config.language.build_identifier();

    match identifier.try_identify(text) {
        Ok(detection) => {
            let reliability = if detection.reliable {
                style("reliable").green()
            } else {
                style("unreliable").yellow()
            };
            println!(
                "{} {}",
                style(detection.tag.as_str()).bold(),
                style(format!(
                    "(confidence {:.2}, {})",
                    detection.confidence, reliability
                ))
                .dim()
            );
        }
        Err(e) => {
            println!(
                "{} {}",
                style(crate::language::UNKNOWN_LANGUAGE).bold(),
                style(format!("({})", e)).dim()
            );
        }
    }

    Ok(())
}
