//! HTTP request handlers for the web server.

use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::assets;
use super::templates::{self, Notice};
use super::AppState;
use crate::classifier::{ErrorKind, EMPTY_INPUT_MESSAGE};
use crate::language::LanguageTag;
use crate::presenter::{present, PresentationView};

/// Body of both the HTML form and the JSON API.
#[derive(Debug, Deserialize)]
pub struct AnalyzeInput {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub language: LanguageTag,
    pub result: PresentationView,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub oracle: String,
    pub cached: usize,
}

/// HTTP status for a failed analysis.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Transport | ErrorKind::Parse | ErrorKind::Oracle | ErrorKind::EmptyResult => {
            StatusCode::BAD_GATEWAY
        }
    }
}

async fn analyze(state: &AppState, text: &str) -> AnalyzeResponse {
    let language = state.identifier.identify(text);
    let result = state.classifier.classify(text).await;
    AnalyzeResponse {
        language,
        result: present(&result, &state.valence),
    }
}

/// Empty form.
pub async fn index() -> impl IntoResponse {
    Html(templates::index_page("", None, None))
}

/// Form submission.
pub async fn analyze_form(
    State(state): State<AppState>,
    Form(input): Form<AnalyzeInput>,
) -> impl IntoResponse {
    if input.text.trim().is_empty() {
        let notice = Notice {
            class: "warning",
            message: EMPTY_INPUT_MESSAGE,
        };
        return Html(templates::index_page(&input.text, Some(notice), None));
    }

    let response = analyze(&state, &input.text).await;
    let results = templates::results_section(&response.language, &response.result);
    Html(templates::index_page(&input.text, None, Some(&results)))
}

/// JSON analysis endpoint.
pub async fn api_analyze(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeInput>,
) -> Response {
    let response = analyze(&state, &input.text).await;
    let status = match &response.result {
        PresentationView::Success { .. } => StatusCode::OK,
        PresentationView::Failure { kind, .. } => status_for(*kind),
    };
    (status, Json(response)).into_response()
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        oracle: state.classifier.oracle_id().to_string(),
        cached: state.classifier.cache().map(|c| c.len()).unwrap_or(0),
    })
}

pub async fn serve_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorKind::Configuration),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        for kind in [
            ErrorKind::Transport,
            ErrorKind::Parse,
            ErrorKind::Oracle,
            ErrorKind::EmptyResult,
        ] {
            assert_eq!(status_for(kind), StatusCode::BAD_GATEWAY);
        }
    }
}
