//! Upstream HTTP client.
//!
//! A thin wrapper over `reqwest::Client`. The inner client pools connections
//! behind an `Arc`, so one `CouchClient` is built at startup and cloned into
//! every forwarder; clones are safe to use concurrently.

use std::time::Instant;

use axum::body::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::observability::metrics;

/// Status, headers and body of one upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
pub struct CouchClient {
    http: reqwest::Client,
}

impl CouchClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Issue a single GET and buffer the response.
    pub async fn get(&self, url: &str, doc_type: &str) -> Result<UpstreamResponse, reqwest::Error> {
        let start = Instant::now();
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream(doc_type, None, start);
                return Err(e);
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        metrics::record_upstream(doc_type, Some(status.as_u16()), start);

        Ok(UpstreamResponse { status, headers, body })
    }
}

impl Default for CouchClient {
    fn default() -> Self {
        Self::new()
    }
}
