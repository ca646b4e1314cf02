//! Template rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder → RenderResult { template_name, context: { response, body } }
//!     → engine.rs (resolve template: user directory, then built-ins)
//!     → HTML response body
//! ```

pub mod context;
pub mod engine;

pub use context::{RenderContext, RenderResult, ResponseMeta};
pub use engine::{RenderError, TemplateEngine};
