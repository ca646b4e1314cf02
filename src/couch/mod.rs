//! CouchDB forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Route Entry (doc type + default options)
//!     → forwarder.rs (one Forwarder per doc type)
//!     → url.rs (resolve target URL)
//!     → client.rs (single upstream GET)
//!     → decode.rs (text/plain JSON sniffing)
//!     → RenderResult / NotFound / UpstreamStatus
//! ```
//!
//! # Design Decisions
//! - URL resolution is pure and independent of request handling
//! - Defaults come from an explicit `CouchConfig`, never global state
//! - Exactly one upstream call per request, no retries

pub mod client;
pub mod decode;
pub mod forwarder;
pub mod types;
pub mod url;

pub use client::{CouchClient, UpstreamResponse};
pub use decode::DecodedBody;
pub use forwarder::{Forwarder, Outcome};
pub use types::{
    BodyDecodeError, ConfigurationError, DocType, ForwardError, RequestOptions, DEFAULT_COUCH_HOST,
};
pub use url::resolve_url;
