//! Response body decoding.
//!
//! CouchDB answers JSON requests with `Content-Type: text/plain`, so such
//! bodies are parsed as JSON when they look like JSON. Show and list
//! functions may also emit plain prose with the same content type; those
//! bodies are kept as-is.

use axum::body::Bytes;
use serde::{Serialize, Serializer};

use crate::couch::types::BodyDecodeError;

/// Body handed to the template.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// Body as received (not `text/plain`, or not JSON).
    Raw(Bytes),
    /// Parsed JSON value.
    Structured(serde_json::Value),
}

impl DecodedBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            DecodedBody::Structured(value) => Some(value),
            DecodedBody::Raw(_) => None,
        }
    }

    /// Raw body as text, replacing invalid UTF-8.
    pub fn as_text(&self) -> Option<String> {
        match self {
            DecodedBody::Raw(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            DecodedBody::Structured(_) => None,
        }
    }
}

impl Serialize for DecodedBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedBody::Raw(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
            DecodedBody::Structured(value) => value.serialize(serializer),
        }
    }
}

/// Outcome of attempting to read a body as JSON.
#[derive(Debug)]
pub enum JsonOutcome {
    Parsed(serde_json::Value),
    /// No JSON value starts at the beginning of the input.
    NotStructuredData,
    /// The input starts like JSON but does not parse.
    MalformedStructuredData(serde_json::Error),
}

/// Classify and parse `input` as JSON.
pub fn parse_json(input: &[u8]) -> JsonOutcome {
    if !starts_like_json(input) {
        return JsonOutcome::NotStructuredData;
    }
    match serde_json::from_slice(input) {
        Ok(value) => JsonOutcome::Parsed(value),
        Err(e) => JsonOutcome::MalformedStructuredData(e),
    }
}

/// Decode an upstream body according to its content type.
pub fn decode_body(content_type: Option<&str>, body: Bytes) -> Result<DecodedBody, BodyDecodeError> {
    if !is_plain_text(content_type) {
        return Ok(DecodedBody::Raw(body));
    }
    match parse_json(&body) {
        JsonOutcome::Parsed(value) => Ok(DecodedBody::Structured(value)),
        JsonOutcome::NotStructuredData => Ok(DecodedBody::Raw(body)),
        JsonOutcome::MalformedStructuredData(e) => Err(BodyDecodeError(e)),
    }
}

fn is_plain_text(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim() == "text/plain")
        .unwrap_or(false)
}

/// True when a JSON value could be scanned at the first non-whitespace byte.
///
/// `NaN`, `Infinity` and `-Infinity` are not JSON and have no `Value`
/// representation, so bodies starting with them are kept raw.
fn starts_like_json(input: &[u8]) -> bool {
    let start = match input.iter().position(|b| !b.is_ascii_whitespace()) {
        Some(i) => &input[i..],
        None => return false,
    };
    match start[0] {
        b'{' | b'[' | b'"' | b'0'..=b'9' => true,
        b'-' => start.get(1).is_some_and(u8::is_ascii_digit),
        b't' => start.starts_with(b"true"),
        b'f' => start.starts_with(b"false"),
        b'n' => start.starts_with(b"null"),
        _ => false,
    }
}
