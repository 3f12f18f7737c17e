//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the API
//! server together with its compiled-in defaults. All types derive Serde
//! traits so the effective configuration can be rendered.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::identity::{IdGenerator, UuidGenerator};

/// Root configuration for the API server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the HTTP APIs are served on (e.g., "0.0.0.0:8000").
    pub bind_addr: String,

    /// Path the metrics are exposed under.
    pub metric_path: String,

    /// Metadata storage settings.
    pub datastore: DatastoreConfig,

    /// Leader election settings.
    pub leader: LeaderConfig,

    /// Interval between two addon cache refreshes.
    #[serde(with = "humantime_serde")]
    pub addon_cache_time: Duration,

    /// Turns off the system statistic cron job.
    pub disable_statistic_cron_job: bool,

    /// Burst for kube clients. Recommended value is `kube_qps * 3`.
    pub kube_burst: u32,

    /// QPS for kube clients.
    pub kube_qps: f64,

    /// Workflow version required by the controller. Opaque to the server.
    pub workflow_version: String,

    /// Plugin directories.
    pub plugin: PluginConfig,

    /// URL of the dex server.
    pub dex_server_url: String,

    /// Exit the process when leadership is lost.
    pub exit_on_lost_leader: bool,
}

impl ServerConfig {
    /// Build the default configuration, drawing the leader identity from
    /// `ids`.
    pub fn with_id_generator(ids: &dyn IdGenerator) -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            metric_path: "/metrics".to_string(),
            datastore: DatastoreConfig::default(),
            leader: LeaderConfig {
                id: ids.generate(),
                lock_name: "apiserver-lock".to_string(),
                duration: Duration::from_secs(5),
            },
            addon_cache_time: Duration::from_secs(10 * 60),
            disable_statistic_cron_job: false,
            kube_burst: 300,
            kube_qps: 100.0,
            workflow_version: String::new(),
            plugin: PluginConfig::default(),
            dex_server_url: "http://dex.vela-system:5556".to_string(),
            exit_on_lost_leader: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_id_generator(&UuidGenerator)
    }
}

/// Returns a fresh default configuration with a newly generated leader id.
pub fn default_config() -> ServerConfig {
    ServerConfig::default()
}

/// Metadata storage configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatastoreConfig {
    /// Driver selector as supplied by the operator. See [`DatastoreConfig::kind`].
    pub r#type: String,

    /// Database name. Used by the mongodb and postgres drivers.
    pub database: String,

    /// Connection string. Used by the mongodb and postgres drivers.
    pub url: String,
}

impl DatastoreConfig {
    /// Resolve the driver selector.
    pub fn kind(&self) -> Result<DatastoreType, UnknownDatastoreType> {
        self.r#type.parse()
    }
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            r#type: DatastoreType::KubeApi.as_str().to_string(),
            database: "kubevela".to_string(),
            url: String::new(),
        }
    }
}

/// Supported storage drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatastoreType {
    KubeApi,
    MongoDb,
    Postgres,
}

impl DatastoreType {
    pub const ALL: [DatastoreType; 3] = [Self::KubeApi, Self::MongoDb, Self::Postgres];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KubeApi => "kubeapi",
            Self::MongoDb => "mongodb",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for DatastoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selector that names no supported driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not support datastore type {0}")]
pub struct UnknownDatastoreType(pub String);

impl FromStr for DatastoreType {
    type Err = UnknownDatastoreType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownDatastoreType(s.to_string()))
    }
}

/// Leader election configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LeaderConfig {
    /// Holder identity, unique per process.
    pub id: String,

    /// Lease lock resource name shared by all peers.
    pub lock_name: String,

    /// Lease TTL.
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}

/// Plugin directory configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PluginConfig {
    /// Directory holding the built-in plugins.
    pub core_plugin_path: String,

    /// Additional plugin directories, lowest precedence first.
    pub custom_plugin_path: Vec<String>,
}

impl PluginConfig {
    /// All plugin directories in ascending override precedence: the core
    /// path, then each custom path in the order given.
    pub fn search_paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.core_plugin_path.as_str())
            .chain(self.custom_plugin_path.iter().map(String::as_str))
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            core_plugin_path: "core-plugins".to_string(),
            custom_plugin_path: vec!["plugins".to_string()],
        }
    }
}
