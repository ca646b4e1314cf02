//! Response mapping.
//!
//! # Responsibilities
//! - Turn forwarding outcomes into client responses
//! - Map forwarding errors to HTTP status codes
//!
//! # Design Decisions
//! - Upstream error statuses are relayed verbatim with an empty body
//! - Upstream 404 renders the standard not-found page
//! - Internal failures never leak upstream detail to the client

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::couch::{ForwardError, Outcome};
use crate::render::TemplateEngine;

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        match self {
            ForwardError::Configuration(_) | ForwardError::Decode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            ForwardError::Transport(_) => StatusCode::BAD_GATEWAY.into_response(),
        }
    }
}

/// Build the client response for a forwarding outcome.
pub fn outcome_response(engine: &TemplateEngine, outcome: Outcome, path: &str) -> Response {
    match outcome {
        Outcome::Render(result) => match engine.render(&result) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!(template = %e.template, error = %e.source, "Template rendering failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        Outcome::NotFound => not_found(engine, path),
        Outcome::UpstreamStatus(status) => status.into_response(),
    }
}

/// The standard not-found page.
pub fn not_found(engine: &TemplateEngine, path: &str) -> Response {
    match engine.render_not_found(path) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render not-found page");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateConfig;
    use crate::couch::ConfigurationError;

    #[test]
    fn test_error_statuses() {
        let response = ForwardError::Configuration(ConfigurationError::MissingBaseUrl).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_status_is_relayed() {
        let engine = TemplateEngine::new(&TemplateConfig::default());
        let response = outcome_response(&engine, Outcome::UpstreamStatus(StatusCode::CONFLICT), "/show/a");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_outcome() {
        let engine = TemplateEngine::new(&TemplateConfig::default());
        let response = outcome_response(&engine, Outcome::NotFound, "/show/a");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
