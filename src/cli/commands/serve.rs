//! Web server command.

use console::style;

use crate::config::Config;
use crate::server::AppState;

/// Start the web server.
pub async fn cmd_serve(config: &Config, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    let state = match AppState::from_config(config) {
        Ok(state) => {
            println!(
                "  {} Emotion oracle ready ({})",
                style("✓").green(),
                state.classifier.oracle_id()
            );
            state
        }
        Err(e) => {
            eprintln!("  {} {}", style("✗").red(), e);
            return Err(e);
        }
    };

    println!(
        "{} Starting moodscope at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(state, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if bind.trim().is_empty() {
        anyhow::bail!("Bind address is empty");
    }

    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    Ok((bind.to_string(), 3030))
}
