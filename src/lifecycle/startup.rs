//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Start the metrics exporter when enabled
//! - Bind the listener and build the server
//!
//! # Design Decisions
//! - Fail fast: a missing CouchDB default is reported before traffic arrives

use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{read_config_file, validate_config, ConfigError, RelayConfig};
use crate::http::HttpServer;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read the configuration at `path`, or the defaults when absent.
///
/// Validation is left to [`prepare`], so callers may adjust the result first.
pub fn read_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    match path {
        Some(path) => read_config_file(path),
        None => Ok(RelayConfig::default()),
    }
}

/// Validate `config`, bind its listener and build the server.
pub async fn prepare(config: RelayConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        default_url = ?config.couch.default_url,
        default_design_doc = ?config.couch.default_design_doc,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok((HttpServer::new(config), listener))
}
