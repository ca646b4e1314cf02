//! Design-document types, request options and error definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default CouchDB host used when a base URL is a bare database name.
pub const DEFAULT_COUCH_HOST: &str = "http://127.0.0.1:5984";

/// The kind of design-document function a request is forwarded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    List,
    Show,
    View,
}

impl DocType {
    /// All design-document types, in route registration order.
    pub const ALL: [DocType; 3] = [DocType::List, DocType::Show, DocType::View];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::List => "list",
            DocType::Show => "show",
            DocType::View => "view",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = UnknownDocType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('_').unwrap_or(s) {
            "list" => Ok(DocType::List),
            "show" => Ok(DocType::Show),
            "view" => Ok(DocType::View),
            _ => Err(UnknownDocType(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown design document type '{0}' (expected list, show or view)")]
pub struct UnknownDocType(pub String);

/// Per-call options for a forwarded request.
///
/// Unset fields fall back to the configured defaults when the target URL is
/// resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestOptions {
    /// CouchDB base URL, or a bare database name.
    pub couch_url: Option<String>,

    /// Design document name, with or without the `_design/` prefix.
    pub design_doc: Option<String>,

    /// Template used to render a successful response.
    pub template_name: Option<String>,

    /// Forward the inbound query string to CouchDB.
    pub relay_query_params: bool,
}

impl RequestOptions {
    /// Options attached to the generated `list`/`show`/`view` routes.
    pub fn relaying() -> Self {
        Self {
            relay_query_params: true,
            ..Self::default()
        }
    }
}

/// A base URL or design document could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("missing base URL: provide a couch_url or set couch.default_url")]
    MissingBaseUrl,

    #[error("missing design document: provide a design_doc or set couch.default_design_doc")]
    MissingDesignDoc,
}

/// A `text/plain` body looked like JSON but could not be parsed.
#[derive(Debug, Error)]
#[error("malformed JSON body: {0}")]
pub struct BodyDecodeError(#[from] pub serde_json::Error);

/// Errors that abort a forwarded request.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Decode(#[from] BodyDecodeError),

    /// CouchDB could not be reached or the response could not be read.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
