//! CouchDB design-document relay.
//!
//! Forwards `GET /list/<name>`, `/show/<name>` and `/view/<name>` to the
//! matching `_list`, `_show` and `_view` functions of a CouchDB design
//! document and renders the answer through a template.

pub mod config;
pub mod couch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod routing;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
