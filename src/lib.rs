//! Control-plane API server library.
//!
//! Configuration assembly for the server: defaults, command-line flags,
//! validation, and the startup sequence that ties them together.

pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigBuilder, ConfigError, ServerConfig, ValidationError};
