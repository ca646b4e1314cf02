//! Target URL resolution.
//!
//! Builds `<base>/_design/<doc>/_<type>/<name>` from per-call overrides and
//! the configured defaults. Pure: no I/O, no global state.

use crate::config::CouchConfig;
use crate::couch::types::{ConfigurationError, DEFAULT_COUCH_HOST};

/// Resolve the CouchDB URL for a design-document function.
///
/// `doc_type` may be given with or without its leading underscore, and
/// `design_doc` with or without the `_design/` prefix. A base URL without
/// any `/` is taken as a database name on the local CouchDB host.
pub fn resolve_url(
    doc_type: &str,
    name: &str,
    couch_url: Option<&str>,
    design_doc: Option<&str>,
    defaults: &CouchConfig,
) -> Result<String, ConfigurationError> {
    let base = non_empty(couch_url)
        .or_else(|| non_empty(defaults.default_url.as_deref()))
        .ok_or(ConfigurationError::MissingBaseUrl)?;
    let base = if base.contains('/') {
        base.to_string()
    } else {
        format!("{}/{}", DEFAULT_COUCH_HOST, base)
    };

    let design_doc = non_empty(design_doc)
        .or_else(|| non_empty(defaults.default_design_doc.as_deref()))
        .ok_or(ConfigurationError::MissingDesignDoc)?;
    let design_doc = if design_doc.contains('/') {
        design_doc.to_string()
    } else {
        format!("_design/{}", design_doc)
    };

    let doc_type = if doc_type.starts_with('_') {
        doc_type.to_string()
    } else {
        format!("_{}", doc_type)
    };

    Ok([base.as_str(), design_doc.as_str(), doc_type.as_str(), name].join("/"))
}

/// Append the inbound query string when relaying is enabled.
pub fn with_query(url: String, relay_query_params: bool, query: Option<&str>) -> String {
    match query {
        Some(query) if relay_query_params && !query.is_empty() => format!("{}?{}", url, query),
        _ => url,
    }
}

/// Re-escape the characters that would end the path of the outbound URL.
///
/// Inbound names arrive percent-decoded; `/` is kept so nested list and view
/// names still map onto CouchDB path segments.
pub fn escape_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '?' => escaped.push_str("%3F"),
            '#' => escaped.push_str("%23"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
