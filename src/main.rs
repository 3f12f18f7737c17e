//! Control-plane API server (v1)
//!
//! # Startup Overview
//!
//! ```text
//!     argv
//!      │
//!      ▼
//!  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!  │ flag parsing │───▶│   logging    │───▶│  validation  │──▶ exit 1 on violations
//!  │  (defaults + │    │    init      │    │ (all errors) │
//!  │  overrides)  │    └──────────────┘    └──────┬───────┘
//!  └──────────────┘                               │
//!                                                 ▼
//!                                      ┌────────────────────┐
//!                                      │ ServerConfig       │
//!                                      │ (read-only from    │
//!                                      │  here on)          │
//!                                      └────────────────────┘
//! ```

use std::process::ExitCode;

use apiserver::config::{ConfigBuilder, ConfigError};
use apiserver::lifecycle::startup;
use apiserver::observability::logging::init_logging;

fn main() -> ExitCode {
    let builder = ConfigBuilder::new();
    let launch = match startup::parse_args(&builder, std::env::args_os()) {
        Ok(launch) => launch,
        // prints usage, --help and --version output
        Err(ConfigError::Flags(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(launch.options.log_level);
    tracing::info!("apiserver v{} starting", env!("CARGO_PKG_VERSION"));

    if startup::check(&launch.config).is_err() {
        tracing::error!("Configuration rejected, exiting");
        return ExitCode::FAILURE;
    }

    if let Some(format) = launch.options.print_config {
        return match startup::render(&launch.config, format) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to print configuration");
                ExitCode::FAILURE
            }
        };
    }

    startup::log_summary(&launch.config);
    tracing::info!("Configuration accepted");
    ExitCode::SUCCESS
}
