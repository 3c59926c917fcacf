//! Configuration display command.

use console::style;

use crate::config::Config;

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults and environment".to_string());
    eprintln!("{} Source: {}", style("→").dim(), source);

    let token = if config.classifier.token().is_some() {
        style("set").green()
    } else {
        style("not set").yellow()
    };
    eprintln!("{} API token: {}", style("→").dim(), token);

    print!("{}", config.to_toml()?);
    Ok(())
}
