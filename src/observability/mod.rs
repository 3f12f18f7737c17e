//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//! ```
//!
//! # Design Decisions
//! - Structured logging with key/value fields
//! - Subscriber is installed once at process start

pub mod logging;
