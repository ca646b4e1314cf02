//! Route entry generation.
//!
//! # Responsibilities
//! - Produce one route entry per design-document type
//! - Turn configured routes into entries with their own options
//!
//! # Design Decisions
//! - Entries are immutable after startup
//! - Generated routes relay query strings and leave every other option unset
//! - The trailing wildcard captures the rest of the path, slashes included

use crate::config::RelayConfig;
use crate::couch::{DocType, RequestOptions};

/// A path pattern bound to a design-document type and its default options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// axum path pattern, e.g. `/show/{*name}`.
    pub pattern: String,
    pub doc_type: DocType,
    pub options: RequestOptions,
}

/// Build the pattern capturing everything after `prefix` as `name`.
pub fn route_path(prefix: &str) -> String {
    format!("{}/{{*name}}", prefix.trim_end_matches('/'))
}

/// Generate one relaying route entry per type, matching `/<type>/<name>`.
pub fn generate_routes(types: &[DocType]) -> Vec<RouteEntry> {
    types
        .iter()
        .map(|doc_type| RouteEntry {
            pattern: route_path(&format!("/{}", doc_type)),
            doc_type: *doc_type,
            options: RequestOptions::relaying(),
        })
        .collect()
}

/// All route entries for a configuration: the generated `list`, `show` and
/// `view` routes (unless disabled) followed by the configured ones.
pub fn routes_from_config(config: &RelayConfig) -> Vec<RouteEntry> {
    let mut entries = if config.default_routes {
        generate_routes(&DocType::ALL)
    } else {
        Vec::new()
    };
    entries.extend(config.routes.iter().map(|route| RouteEntry {
        pattern: route_path(&route.path),
        doc_type: route.doc_type,
        options: route.options.clone(),
    }));
    entries
}
