//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every route can resolve a base URL and design document
//! - Validate addresses and URLs
//! - Detect conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::couch::{DocType, RequestOptions};
use crate::routing::router::route_path;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' is not a valid URL")]
    InvalidUrl { field: String, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("route '{path}' needs a couch_url or couch.default_url")]
    MissingBaseUrl { path: String },

    #[error("route '{path}' needs a design_doc or couch.default_design_doc")]
    MissingDesignDoc { path: String },

    #[error("route path '{0}' must start with '/' and must not end with '/'")]
    InvalidRoutePath(String),

    #[error("route path '{0}' must not contain '{{', '}}' or '*'")]
    ReservedRouteSyntax(String),

    #[error("route path '{0}' is registered more than once")]
    DuplicateRoute(String),

    #[error("no routes configured")]
    NoRoutes,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if let Some(url) = &config.couch.default_url {
        check_base_url("couch.default_url", url, &mut errors);
    }

    let mut routes: Vec<(String, &RequestOptions)> = Vec::new();
    let relaying = RequestOptions::relaying();
    if config.default_routes {
        for doc_type in DocType::ALL {
            routes.push((format!("/{}", doc_type), &relaying));
        }
    }
    for route in &config.routes {
        if !route.path.starts_with('/') || route.path.ends_with('/') {
            errors.push(ValidationError::InvalidRoutePath(route.path.clone()));
            continue;
        }
        if route.path.contains(&['{', '}', '*'][..]) {
            errors.push(ValidationError::ReservedRouteSyntax(route.path.clone()));
            continue;
        }
        if let Some(url) = &route.options.couch_url {
            check_base_url(&format!("route '{}' couch_url", route.path), url, &mut errors);
        }
        routes.push((route.path.clone(), &route.options));
    }

    if routes.is_empty() && errors.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut seen = HashSet::new();
    for (path, options) in routes {
        if !seen.insert(route_path(&path)) {
            errors.push(ValidationError::DuplicateRoute(path.clone()));
        }
        if is_unset(&options.couch_url) && is_unset(&config.couch.default_url) {
            errors.push(ValidationError::MissingBaseUrl { path: path.clone() });
        }
        if is_unset(&options.design_doc) && is_unset(&config.couch.default_design_doc) {
            errors.push(ValidationError::MissingDesignDoc { path });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

/// Bare database names are accepted; anything with a `/` must be a URL.
fn check_base_url(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if !value.contains('/') {
        return;
    }
    let valid = url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CouchConfig, RouteConfig};

    fn configured() -> RelayConfig {
        RelayConfig {
            couch: CouchConfig {
                default_url: Some("mydb".into()),
                default_design_doc: Some("myapp".into()),
            },
            ..RelayConfig::default()
        }
    }

    fn route(path: &str, options: RequestOptions) -> RouteConfig {
        RouteConfig {
            path: path.into(),
            doc_type: DocType::Show,
            options,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&configured()).is_ok());
    }

    #[test]
    fn test_missing_defaults_are_reported_per_route() {
        let errors = validate_config(&RelayConfig::default()).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingBaseUrl { path: "/list".into() }));
        assert!(errors.contains(&ValidationError::MissingDesignDoc { path: "/view".into() }));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_route_overrides_satisfy_requirements() {
        let mut config = RelayConfig {
            default_routes: false,
            ..RelayConfig::default()
        };
        config.routes.push(route(
            "/articles",
            RequestOptions {
                couch_url: Some("http://couch:5984/news".into()),
                design_doc: Some("site".into()),
                ..RequestOptions::default()
            },
        ));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = configured();
        config.listener.bind_address = "localhost".into();
        config.timeouts.request_secs = 0;
        config.couch.default_url = Some("ftp://couch/db".into());
        config.routes.push(route("articles/", RequestOptions::default()));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::InvalidRoutePath("articles/".into())));
    }

    #[test]
    fn test_router_syntax_in_route_path() {
        let mut config = configured();
        config.routes.push(route("/{*rest}", RequestOptions::default()));
        config.routes.push(route("/{x}", RequestOptions::default()));
        config.routes.push(route("/docs*", RequestOptions::default()));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ReservedRouteSyntax("/{*rest}".into()),
                ValidationError::ReservedRouteSyntax("/{x}".into()),
                ValidationError::ReservedRouteSyntax("/docs*".into()),
            ]
        );
    }

    #[test]
    fn test_duplicate_routes() {
        let mut config = configured();
        config.routes.push(route("/show", RequestOptions::default()));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DuplicateRoute("/show".into())]);
    }

    #[test]
    fn test_no_routes() {
        let config = RelayConfig {
            default_routes: false,
            ..configured()
        };
        assert_eq!(validate_config(&config).unwrap_err(), vec![ValidationError::NoRoutes]);
    }
}
