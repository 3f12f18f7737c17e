//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Parse flags → Init logging → Validate config → Hand off to server
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then logging, then subsystems
//! - Fail fast: an invalid configuration stops the process

pub mod startup;
