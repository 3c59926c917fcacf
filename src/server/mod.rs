//! Web interface for emotion analysis.
//!
//! A single form page that renders the ranked emotions, plus a JSON API
//! for programmatic callers.

mod assets;
mod handlers;
mod routes;
mod templates;

pub use handlers::{status_for, AnalyzeResponse};
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::classifier::EmotionClassifier;
use crate::config::Config;
use crate::language::LanguageIdentifier;
use crate::presenter::ValenceTable;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<EmotionClassifier>,
    pub identifier: Arc<LanguageIdentifier>,
    pub valence: Arc<ValenceTable>,
}

impl AppState {
    pub fn new(
        classifier: EmotionClassifier,
        identifier: LanguageIdentifier,
        valence: ValenceTable,
    ) -> Self {
        Self {
            classifier: Arc::new(classifier),
            identifier: Arc::new(identifier),
            valence: Arc::new(valence),
        }
    }

    /// Build the classifier and helpers described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let classifier = EmotionClassifier::from_config(&config.classifier)?;
        Ok(Self::new(
            classifier,
            config.language.build_identifier(),
            config.valence_table(),
        ))
    }
}

/// Start the web server.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
