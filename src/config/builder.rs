//! Assembling a configuration from defaults and command-line flags.

use std::ffi::OsString;

use clap::{ArgMatches, Command};
use thiserror::Error;

use crate::config::flags::{apply_matches, register_flags};
use crate::config::identity::IdGenerator;
use crate::config::schema::ServerConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration assembly.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed flag syntax or a value of the wrong type.
    #[error("flag error: {0}")]
    Flags(#[from] clap::Error),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("failed to render configuration as TOML: {0}")]
    RenderToml(#[from] toml::ser::Error),

    #[error("failed to render configuration as JSON: {0}")]
    RenderJson(#[from] serde_json::Error),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a [`ServerConfig`] from a defaults snapshot and parsed flags.
///
/// The defaults are fixed at construction; each parse materializes a new
/// configuration instead of mutating shared state.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    defaults: ServerConfig,
}

impl ConfigBuilder {
    /// Builder over freshly generated defaults.
    pub fn new() -> Self {
        Self::with_defaults(ServerConfig::default())
    }

    /// Builder over defaults whose leader identity comes from `ids`.
    pub fn with_id_generator(ids: &dyn IdGenerator) -> Self {
        Self::with_defaults(ServerConfig::with_id_generator(ids))
    }

    pub fn with_defaults(defaults: ServerConfig) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ServerConfig {
        &self.defaults
    }

    /// Register all configuration flags on `command`.
    pub fn register(&self, command: Command) -> Command {
        register_flags(command, &self.defaults)
    }

    /// A standalone command carrying only the configuration flags.
    pub fn command(&self) -> Command {
        self.register(Command::new("apiserver"))
    }

    /// Materialize the configuration selected by `matches`.
    pub fn from_matches(&self, matches: &ArgMatches) -> ServerConfig {
        apply_matches(&self.defaults, matches)
    }

    /// Parse `args` (including the program name) and materialize the
    /// resulting configuration. The result is not validated.
    pub fn parse_from<I, T>(&self, args: I) -> Result<ServerConfig, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args)?;
        Ok(self.from_matches(&matches))
    }

    /// Parse and validate in one step.
    pub fn build_from<I, T>(&self, args: I) -> Result<ServerConfig, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = self.parse_from(args)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ConfigBuilder {
        ConfigBuilder::with_id_generator(&|| "holder-a".to_string())
    }

    #[test]
    fn test_parse_without_flags_returns_defaults() {
        let builder = builder();
        let cfg = builder.parse_from(["apiserver"]).unwrap();
        assert_eq!(&cfg, builder.defaults());
    }

    #[test]
    fn test_build_reports_all_violations() {
        let err = builder()
            .build_from([
                "apiserver",
                "--datastore-type",
                "sqlite",
                "--metrics-path=",
            ])
            .unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validation_error_display_joins_messages() {
        let err = ConfigError::Validation(vec![
            ValidationError::UnsupportedDatastore { value: "sqlite".into() },
            ValidationError::Empty { field: "id" },
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: not support datastore type sqlite, id must not be empty"
        );
    }

    #[test]
    fn test_render_errors_keep_their_source() {
        let json_err = serde_json::from_str::<ServerConfig>("{").unwrap_err();
        let err = ConfigError::from(json_err);
        assert!(matches!(err, ConfigError::RenderJson(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_flag_errors_surface_as_config_errors() {
        let err = builder()
            .parse_from(["apiserver", "--no-such-flag"])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Flags(_)));
    }
}
