//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod config_cmd;
mod detect;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "moodscope")]
#[command(about = "Multilingual emotion analysis")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "MOODSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the language and emotions of a piece of text
    Analyze {
        /// Text to analyze (reads stdin when omitted)
        text: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detect the language of a piece of text
    Detect {
        /// Text to inspect
        text: String,
    },

    /// Start the web interface
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3030)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },

    /// Show the effective configuration
    Config,
}

/// Load the config named on the command line, or discover one.
async fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Ok(Config::load_from_path(&path).await?)
        }
        None => Ok(Config::load().await),
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config).await?;

    match cli.command {
        Commands::Analyze { text, json } => analyze::cmd_analyze(&config, text, json).await,
        Commands::Detect { text } => detect::cmd_detect(&config, &text),
        Commands::Serve { bind } => serve::cmd_serve(&config, &bind).await,
        Commands::Config => config_cmd::cmd_config_show(&config),
    }
}
