//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Missing CouchDB defaults are caught here, before the first request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, read_config_file, ConfigError};
pub use schema::{
    CouchConfig, ListenerConfig, ObservabilityConfig, RelayConfig, RouteConfig, TemplateConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
