//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     DocType::ALL + RouteConfig[]
//!     → router.rs (RouteEntry per type / configured route)
//!     → http/server.rs registers each entry with the axum Router
//!
//! Incoming Request (path)
//!     → axum matches `/<type>/{*name}`
//!     → Forwarder for that entry's type
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Matching is delegated to axum; entries only describe patterns and options

pub mod router;

pub use router::{generate_routes, route_path, routes_from_config, RouteEntry};
