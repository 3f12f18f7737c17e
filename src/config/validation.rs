//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (the flag layer handles syntax)
//! - Check the datastore selector and the settings its driver needs
//! - Validate value ranges (durations > 0, qps/burst > 0)
//! - Validate the bind address shape
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is handed to any subsystem
//! - Burst ≈ 3 × QPS is a recommendation only and is never reported here

use thiserror::Error;

use crate::config::schema::{DatastoreType, ServerConfig};

/// A configuration field holding a value outside its accepted domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("not support datastore type {value}")]
    UnsupportedDatastore { value: String },

    #[error("{field} is required when the datastore type is {datastore}")]
    MissingForDatastore {
        field: &'static str,
        datastore: DatastoreType,
    },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: String },

    #[error("{field} '{value}' is not a host:port address")]
    InvalidAddress { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field, matching its flag where one exists.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnsupportedDatastore { .. } => "datastore-type",
            Self::MissingForDatastore { field, .. }
            | Self::Empty { field }
            | Self::NotPositive { field, .. }
            | Self::InvalidAddress { field, .. } => *field,
        }
    }
}

/// Validate a fully populated configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl ServerConfig {
    /// Collect every violated constraint. An empty list means the
    /// configuration is accepted.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        check_datastore(self, &mut errors);
        check_bind_addr(&self.bind_addr, &mut errors);

        if self.metric_path.is_empty() {
            errors.push(ValidationError::Empty { field: "metrics-path" });
        }

        if self.leader.id.is_empty() {
            errors.push(ValidationError::Empty { field: "id" });
        }
        if self.leader.lock_name.is_empty() {
            errors.push(ValidationError::Empty { field: "lock-name" });
        }
        if self.leader.duration.is_zero() {
            errors.push(ValidationError::NotPositive {
                field: "duration",
                value: "0s".to_string(),
            });
        }
        if self.addon_cache_time.is_zero() {
            errors.push(ValidationError::NotPositive {
                field: "addon-cache-duration",
                value: "0s".to_string(),
            });
        }

        // NaN fails the comparison as well
        if !(self.kube_qps.is_finite() && self.kube_qps > 0.0) {
            errors.push(ValidationError::NotPositive {
                field: "kube-api-qps",
                value: self.kube_qps.to_string(),
            });
        }
        if self.kube_burst == 0 {
            errors.push(ValidationError::NotPositive {
                field: "kube-api-burst",
                value: self.kube_burst.to_string(),
            });
        }

        errors
    }
}

fn check_datastore(config: &ServerConfig, errors: &mut Vec<ValidationError>) {
    let datastore = &config.datastore;
    let kind = match datastore.kind() {
        Ok(kind) => kind,
        Err(unknown) => {
            errors.push(ValidationError::UnsupportedDatastore { value: unknown.0 });
            return;
        }
    };

    match kind {
        DatastoreType::KubeApi => {}
        DatastoreType::MongoDb | DatastoreType::Postgres => {
            if datastore.url.is_empty() {
                errors.push(ValidationError::MissingForDatastore {
                    field: "datastore-url",
                    datastore: kind,
                });
            }
            if datastore.database.is_empty() {
                errors.push(ValidationError::MissingForDatastore {
                    field: "datastore-database",
                    datastore: kind,
                });
            }
        }
    }
}

fn check_bind_addr(addr: &str, errors: &mut Vec<ValidationError>) {
    if addr.is_empty() {
        errors.push(ValidationError::Empty { field: "bind-addr" });
        return;
    }

    // an empty host binds every interface
    let well_formed = addr
        .rsplit_once(':')
        .map(|(_, port)| port.parse::<u16>().is_ok())
        .unwrap_or(false);
    if !well_formed {
        errors.push(ValidationError::InvalidAddress {
            field: "bind-addr",
            value: addr.to_string(),
        });
    }
}
