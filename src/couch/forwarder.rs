//! Request forwarding to CouchDB design-document functions.
//!
//! # Data Flow
//! ```text
//! name + RequestOptions + inbound query
//!     → url.rs (resolve target, relay query)
//!     → client.rs (single GET)
//!     → status: 200 → decode.rs → RenderResult
//!               404 → NotFound
//!               *   → UpstreamStatus
//! ```

use std::sync::Arc;

use reqwest::StatusCode;

use crate::config::CouchConfig;
use crate::couch::client::{CouchClient, UpstreamResponse};
use crate::couch::decode::decode_body;
use crate::couch::types::{DocType, ForwardError, RequestOptions};
use crate::couch::url::{escape_name, resolve_url, with_query};
use crate::render::{RenderContext, RenderResult, ResponseMeta};

/// Result of forwarding one request.
#[derive(Debug)]
pub enum Outcome {
    /// Upstream answered 200; render the template.
    Render(RenderResult),
    /// Upstream answered 404.
    NotFound,
    /// Upstream answered any other status; relayed with an empty body.
    UpstreamStatus(StatusCode),
}

/// Forwards requests for one design-document type.
#[derive(Debug, Clone)]
pub struct Forwarder {
    doc_type: DocType,
    client: CouchClient,
    defaults: Arc<CouchConfig>,
    template_namespace: String,
}

impl Forwarder {
    pub fn new(
        doc_type: DocType,
        client: CouchClient,
        defaults: Arc<CouchConfig>,
        template_namespace: impl Into<String>,
    ) -> Self {
        Self {
            doc_type,
            client,
            defaults,
            template_namespace: template_namespace.into(),
        }
    }

    pub fn doc_type(&self) -> DocType {
        self.doc_type
    }

    /// Build the outbound URL for `name`, including any relayed query.
    pub fn target_url(
        &self,
        name: &str,
        options: &RequestOptions,
        query: Option<&str>,
    ) -> Result<String, ForwardError> {
        let url = resolve_url(
            self.doc_type.as_str(),
            &escape_name(name),
            options.couch_url.as_deref(),
            options.design_doc.as_deref(),
            &self.defaults,
        )?;
        Ok(with_query(url, options.relay_query_params, query))
    }

    /// Forward `name` to CouchDB and classify the response.
    pub async fn handle(
        &self,
        name: &str,
        options: &RequestOptions,
        query: Option<&str>,
    ) -> Result<Outcome, ForwardError> {
        let url = self.target_url(name, options, query)?;
        tracing::debug!(doc_type = %self.doc_type, name = %name, url = %url, "Forwarding to CouchDB");

        let response = self.client.get(&url, self.doc_type.as_str()).await?;
        match response.status {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                tracing::debug!(doc_type = %self.doc_type, name = %name, "CouchDB returned 404");
                return Ok(Outcome::NotFound);
            }
            status => {
                tracing::warn!(doc_type = %self.doc_type, name = %name, status = %status, "CouchDB returned an error status");
                return Ok(Outcome::UpstreamStatus(status));
            }
        }

        Ok(Outcome::Render(self.render_result(response, options)?))
    }

    fn render_result(
        &self,
        response: UpstreamResponse,
        options: &RequestOptions,
    ) -> Result<RenderResult, ForwardError> {
        let meta = ResponseMeta::from_upstream(response.status, &response.headers);
        let content_type = response.content_type().map(str::to_owned);
        let body = decode_body(content_type.as_deref(), response.body)?;

        let template_name = match options.template_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.default_template(),
        };

        Ok(RenderResult {
            template_name,
            context: RenderContext { response: meta, body },
        })
    }

    fn default_template(&self) -> String {
        format!("{}/{}.html", self.template_namespace, self.doc_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use serde_json::json;

    fn forwarder(doc_type: DocType) -> Forwarder {
        let defaults = CouchConfig {
            default_url: Some("mydb".into()),
            default_design_doc: Some("myapp".into()),
        };
        Forwarder::new(doc_type, CouchClient::new(), Arc::new(defaults), "couchdb")
    }

    fn ok_response(content_type: &'static str, body: &'static str) -> UpstreamResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        UpstreamResponse {
            status: StatusCode::OK,
            headers,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_target_url_relays_query() {
        let f = forwarder(DocType::View);
        let url = f.target_url("by_date", &RequestOptions::relaying(), Some("x=1&y=2")).unwrap();
        assert_eq!(url, "http://127.0.0.1:5984/mydb/_design/myapp/_view/by_date?x=1&y=2");

        let url = f.target_url("by_date", &RequestOptions::default(), Some("x=1&y=2")).unwrap();
        assert!(!url.contains('?'));
    }

    #[test]
    fn test_target_url_keeps_name_in_path() {
        let f = forwarder(DocType::Show);
        let url = f.target_url("a?b", &RequestOptions::relaying(), Some("x=1")).unwrap();
        assert_eq!(url, "http://127.0.0.1:5984/mydb/_design/myapp/_show/a%3Fb?x=1");
    }

    #[test]
    fn test_target_url_propagates_configuration_error() {
        let f = Forwarder::new(DocType::Show, CouchClient::new(), Arc::new(CouchConfig::default()), "couchdb");
        let err = f.target_url("a", &RequestOptions::default(), None).unwrap_err();
        assert!(matches!(err, ForwardError::Configuration(_)));
    }

    #[test]
    fn test_default_template_name() {
        let f = forwarder(DocType::Show);
        let result = f.render_result(ok_response("text/plain", "{\"a\": 1}"), &RequestOptions::default()).unwrap();
        assert_eq!(result.template_name, "couchdb/show.html");
        assert_eq!(result.context.body.as_json(), Some(&json!({"a": 1})));
        assert_eq!(result.context.response.status, 200);
    }

    #[test]
    fn test_template_override() {
        let f = forwarder(DocType::List);
        let options = RequestOptions {
            template_name: Some("blog/index.html".into()),
            ..RequestOptions::default()
        };
        let result = f.render_result(ok_response("text/html", "<p>hi</p>"), &options).unwrap();
        assert_eq!(result.template_name, "blog/index.html");
        assert_eq!(result.context.body.as_text().as_deref(), Some("<p>hi</p>"));
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        let f = forwarder(DocType::View);
        let err = f.render_result(ok_response("text/plain", "{\"rows\": ["), &RequestOptions::default()).unwrap_err();
        assert!(matches!(err, ForwardError::Decode(_)));
    }
}
