//! Kiroween Server: REST endpoints for the generated CRUD apps.
//!
//! [`build_router`] wires repositories, services and controllers for the
//! resource kinds of the configured [`AppProfile`]; `main` only loads
//! configuration, connects to the store and serves the router.

pub mod app;
pub mod config;
pub mod http;

pub use app::build_router;
pub use config::{AppProfile, ConfigError, ServerConfig};
