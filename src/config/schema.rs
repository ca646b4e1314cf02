//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::couch::{DocType, RequestOptions};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// CouchDB defaults used when a route does not override them.
    pub couch: CouchConfig,

    /// Template lookup settings.
    pub templates: TemplateConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Register the generated `list`, `show` and `view` routes.
    pub default_routes: bool,

    /// Additional routes with their own options.
    pub routes: Vec<RouteConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            couch: CouchConfig::default(),
            templates: TemplateConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            default_routes: true,
            routes: Vec::new(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Process-wide CouchDB defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CouchConfig {
    /// Base URL (e.g., "http://couch:5984/blog") or a bare database name,
    /// which is served from the local CouchDB.
    pub default_url: Option<String>,

    /// Design document name, with or without `_design/`.
    pub default_design_doc: Option<String>,
}

/// Template lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory searched before the built-in templates.
    pub directory: Option<PathBuf>,

    /// Prefix of the default `<namespace>/<type>.html` template names.
    pub namespace: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            directory: None,
            namespace: "couchdb".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "couch_relay=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// An extra route forwarding `<path>/<name>` to one design-document type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path prefix (e.g., "/articles"); the name is captured after it.
    pub path: String,

    /// Design-document function type.
    pub doc_type: DocType,

    /// Options applied to every request on this route.
    #[serde(flatten)]
    pub options: RequestOptions,
}
