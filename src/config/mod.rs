//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! compiled-in defaults (schema.rs, leader id from identity.rs)
//!     → flags.rs (one flag per setting, defaults displayed)
//!     → builder.rs (parse args, materialize a new ServerConfig)
//!     → validation.rs (semantic checks, all violations collected)
//!     → ServerConfig (validated, treated as immutable)
//!     → handed to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once validated; nothing re-parses at runtime
//! - Every field has a default so an empty command line is valid
//! - Validation separates syntactic (clap) from semantic checks

pub mod builder;
pub mod flags;
pub mod identity;
pub mod schema;
pub mod validation;

pub use builder::{ConfigBuilder, ConfigError};
pub use flags::{register_flags, FlagKind, FlagSpec, Setting};
pub use identity::{IdGenerator, UuidGenerator};
pub use schema::{
    default_config, DatastoreConfig, DatastoreType, LeaderConfig, PluginConfig, ServerConfig,
};
pub use validation::{validate_config, ValidationError};
