//! Startup orchestration.
//!
//! # Responsibilities
//! - Parse the command line into a configuration and launcher options
//! - Validate configuration and report every violation
//! - Log the accepted configuration before subsystems start
//!
//! # Design Decisions
//! - Fail fast: any invalid setting is fatal
//! - Launcher flags (log level, config printing) never reach ServerConfig

use std::ffi::OsString;

use clap::{value_parser, Arg, ArgMatches, Command, ValueEnum};
use humantime::format_duration;
use tracing::Level;

use crate::config::{ConfigBuilder, ConfigError, ServerConfig};

const LOG_LEVEL: &str = "log-level";
const PRINT_CONFIG: &str = "print-config";

/// Output format for `--print-config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Toml,
    Json,
}

/// Options that steer the launcher itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub log_level: Level,
    pub print_config: Option<OutputFormat>,
}

/// Result of parsing the process command line.
#[derive(Debug, Clone)]
pub struct Startup {
    pub config: ServerConfig,
    pub options: LaunchOptions,
}

/// Full command line of the server: configuration flags plus launcher flags.
pub fn command(builder: &ConfigBuilder) -> Command {
    builder
        .register(
            Command::new("apiserver")
                .about("Control-plane API server")
                .version(env!("CARGO_PKG_VERSION")),
        )
        .arg(
            Arg::new(LOG_LEVEL)
                .long(LOG_LEVEL)
                .value_name("level")
                .default_value("info")
                .value_parser(value_parser!(Level))
                .help("Log level (trace, debug, info, warn, error). RUST_LOG overrides it."),
        )
        .arg(
            Arg::new(PRINT_CONFIG)
                .long(PRINT_CONFIG)
                .value_name("format")
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("toml")
                .value_parser(value_parser!(OutputFormat))
                .help("Print the effective configuration and exit."),
        )
}

/// Parse `args` (including the program name).
pub fn parse_args<I, T>(builder: &ConfigBuilder, args: I) -> Result<Startup, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(builder).try_get_matches_from(args)?;
    Ok(Startup {
        config: builder.from_matches(&matches),
        options: launch_options(&matches),
    })
}

fn launch_options(matches: &ArgMatches) -> LaunchOptions {
    LaunchOptions {
        log_level: matches
            .get_one::<Level>(LOG_LEVEL)
            .copied()
            .unwrap_or(Level::INFO),
        print_config: matches.get_one::<OutputFormat>(PRINT_CONFIG).copied(),
    }
}

/// Validate `config`, logging each violation.
pub fn check(config: &ServerConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }

    for err in &errors {
        tracing::error!(field = err.field(), "{}", err);
    }
    Err(ConfigError::Validation(errors))
}

/// Log the accepted configuration.
pub fn log_summary(config: &ServerConfig) {
    tracing::info!(
        bind_addr = %config.bind_addr,
        metric_path = %config.metric_path,
        datastore = %config.datastore.r#type,
        leader_id = %config.leader.id,
        lock_name = %config.leader.lock_name,
        lease = %format_duration(config.leader.duration),
        addon_cache = %format_duration(config.addon_cache_time),
        kube_qps = config.kube_qps,
        kube_burst = config.kube_burst,
        exit_on_lost_leader = config.exit_on_lost_leader,
        "Configuration loaded"
    );
    tracing::debug!(
        plugin_paths = ?config.plugin.search_paths().collect::<Vec<_>>(),
        "Plugin search order"
    );

    if !burst_matches_qps(config) {
        tracing::warn!(
            kube_qps = config.kube_qps,
            kube_burst = config.kube_burst,
            "kube-api-burst is usually set to kube-api-qps * 3"
        );
    }
}

fn burst_matches_qps(config: &ServerConfig) -> bool {
    (f64::from(config.kube_burst) - config.kube_qps * 3.0).abs() < 1.0
}

/// Render `config` in the requested format.
pub fn render(config: &ServerConfig, format: OutputFormat) -> Result<String, ConfigError> {
    match format {
        OutputFormat::Toml => Ok(toml::to_string_pretty(config)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
    }
}
