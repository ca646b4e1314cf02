//! Values handed to templates.

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Serialize;

use crate::couch::DecodedBody;

/// Template name plus the context it is rendered with.
#[derive(Debug, Clone, Serialize)]
pub struct RenderResult {
    pub template_name: String,
    pub context: RenderContext,
}

/// Exposed to templates as `response` and `body`.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub response: ResponseMeta,
    pub body: DecodedBody,
}

/// Upstream status and headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseMeta {
    pub status: u16,
    /// Lowercased header names; repeated headers joined with `", "`.
    pub headers: BTreeMap<String, String>,
}

impl ResponseMeta {
    pub fn from_upstream(status: StatusCode, headers: &HeaderMap) -> Self {
        let mut map: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            let value = String::from_utf8_lossy(value.as_bytes());
            match map.get_mut(name.as_str()) {
                Some(existing) => {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
                None => {
                    map.insert(name.as_str().to_string(), value.into_owned());
                }
            }
        }
        Self {
            status: status.as_u16(),
            headers: map,
        }
    }
}
