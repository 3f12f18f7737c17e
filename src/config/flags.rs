//! Command-line flag table.
//!
//! Every bindable field of [`ServerConfig`] is a [`Setting`]. The table is
//! turned into clap arguments by [`register_flags`], and parsed values are
//! materialized into a new configuration by [`apply_matches`]. The
//! defaults configuration supplies the displayed default for each flag and
//! is never mutated.

use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use humantime::{format_duration, parse_duration};

use crate::config::schema::ServerConfig;

/// Value shape of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    String,
    /// Repeatable; order of occurrence is preserved.
    StringArray,
    Bool,
    Int,
    Float,
    Duration,
}

/// A bindable configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    BindAddr,
    MetricPath,
    DatastoreType,
    DatastoreDatabase,
    DatastoreUrl,
    LeaderId,
    LockName,
    LeaseDuration,
    AddonCacheTime,
    DisableStatisticCronJob,
    KubeQps,
    KubeBurst,
    WorkflowVersion,
    DexServerUrl,
    CorePluginPath,
    CustomPluginPath,
    ExitOnLostLeader,
}

impl Setting {
    pub const ALL: [Setting; 17] = [
        Self::BindAddr,
        Self::MetricPath,
        Self::DatastoreType,
        Self::DatastoreDatabase,
        Self::DatastoreUrl,
        Self::LeaderId,
        Self::LockName,
        Self::LeaseDuration,
        Self::AddonCacheTime,
        Self::DisableStatisticCronJob,
        Self::KubeQps,
        Self::KubeBurst,
        Self::WorkflowVersion,
        Self::DexServerUrl,
        Self::CorePluginPath,
        Self::CustomPluginPath,
        Self::ExitOnLostLeader,
    ];

    /// Long flag name, also used as the clap argument id.
    pub fn flag(self) -> &'static str {
        match self {
            Self::BindAddr => "bind-addr",
            Self::MetricPath => "metrics-path",
            Self::DatastoreType => "datastore-type",
            Self::DatastoreDatabase => "datastore-database",
            Self::DatastoreUrl => "datastore-url",
            Self::LeaderId => "id",
            Self::LockName => "lock-name",
            Self::LeaseDuration => "duration",
            Self::AddonCacheTime => "addon-cache-duration",
            Self::DisableStatisticCronJob => "disable-statistic-cronJob",
            Self::KubeQps => "kube-api-qps",
            Self::KubeBurst => "kube-api-burst",
            Self::WorkflowVersion => "workflow-version",
            Self::DexServerUrl => "dex-server",
            Self::CorePluginPath => "core-plugin-path",
            Self::CustomPluginPath => "plugin-path",
            Self::ExitOnLostLeader => "exit-on-lost-leader",
        }
    }

    pub fn kind(self) -> FlagKind {
        match self {
            Self::LeaseDuration | Self::AddonCacheTime => FlagKind::Duration,
            Self::DisableStatisticCronJob | Self::ExitOnLostLeader => FlagKind::Bool,
            Self::KubeQps => FlagKind::Float,
            Self::KubeBurst => FlagKind::Int,
            Self::CustomPluginPath => FlagKind::StringArray,
            Self::BindAddr
            | Self::MetricPath
            | Self::DatastoreType
            | Self::DatastoreDatabase
            | Self::DatastoreUrl
            | Self::LeaderId
            | Self::LockName
            | Self::WorkflowVersion
            | Self::DexServerUrl
            | Self::CorePluginPath => FlagKind::String,
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Self::BindAddr => "The bind address used to serve the http APIs.",
            Self::MetricPath => "The path to expose the metrics.",
            Self::DatastoreType => {
                "Metadata storage driver type, support kubeapi, mongodb and postgres."
            }
            Self::DatastoreDatabase => {
                "Metadata storage database name, takes effect when the storage driver is mongodb or postgres."
            }
            Self::DatastoreUrl => {
                "Metadata storage database url, takes effect when the storage driver is mongodb or postgres."
            }
            Self::LeaderId => "The holder identity name.",
            Self::LockName => "The lease lock resource name.",
            Self::LeaseDuration => "The lease lock duration.",
            Self::AddonCacheTime => "How long between two addon cache operations.",
            Self::DisableStatisticCronJob => {
                "Close the system statistic info calculating cronJob."
            }
            Self::KubeQps => {
                "The qps for kube clients. Low qps may lead to low throughput. High qps may give stress to api-server."
            }
            Self::KubeBurst => "The burst for kube clients. Recommend setting it qps*3.",
            Self::WorkflowVersion => {
                "The version of workflow to meet controller requirement."
            }
            Self::DexServerUrl => "The URL of the dex server.",
            Self::CorePluginPath => "The path of the core plugin directory.",
            Self::CustomPluginPath => {
                "The path of a plugin directory. Repeatable; later paths take precedence."
            }
            Self::ExitOnLostLeader => {
                "Exit the process if this server lost the leader election."
            }
        }
    }

    /// Default value(s) shown for this flag, rendered from `defaults`.
    pub fn default_values(self, defaults: &ServerConfig) -> Vec<String> {
        let single = match self {
            Self::BindAddr => defaults.bind_addr.clone(),
            Self::MetricPath => defaults.metric_path.clone(),
            Self::DatastoreType => defaults.datastore.r#type.clone(),
            Self::DatastoreDatabase => defaults.datastore.database.clone(),
            Self::DatastoreUrl => defaults.datastore.url.clone(),
            Self::LeaderId => defaults.leader.id.clone(),
            Self::LockName => defaults.leader.lock_name.clone(),
            Self::LeaseDuration => format_duration(defaults.leader.duration).to_string(),
            Self::AddonCacheTime => format_duration(defaults.addon_cache_time).to_string(),
            Self::DisableStatisticCronJob => defaults.disable_statistic_cron_job.to_string(),
            Self::KubeQps => defaults.kube_qps.to_string(),
            Self::KubeBurst => defaults.kube_burst.to_string(),
            Self::WorkflowVersion => defaults.workflow_version.clone(),
            Self::DexServerUrl => defaults.dex_server_url.clone(),
            Self::CorePluginPath => defaults.plugin.core_plugin_path.clone(),
            Self::CustomPluginPath => return defaults.plugin.custom_plugin_path.clone(),
            Self::ExitOnLostLeader => defaults.exit_on_lost_leader.to_string(),
        };
        vec![single]
    }

    /// Write the parsed value of this flag into `config`.
    fn apply(self, config: &mut ServerConfig, matches: &ArgMatches) {
        let id = self.flag();
        match self {
            Self::BindAddr => set(&mut config.bind_addr, matches, id),
            Self::MetricPath => set(&mut config.metric_path, matches, id),
            Self::DatastoreType => set(&mut config.datastore.r#type, matches, id),
            Self::DatastoreDatabase => set(&mut config.datastore.database, matches, id),
            Self::DatastoreUrl => set(&mut config.datastore.url, matches, id),
            Self::LeaderId => set(&mut config.leader.id, matches, id),
            Self::LockName => set(&mut config.leader.lock_name, matches, id),
            Self::LeaseDuration => set(&mut config.leader.duration, matches, id),
            Self::AddonCacheTime => set(&mut config.addon_cache_time, matches, id),
            Self::DisableStatisticCronJob => {
                set(&mut config.disable_statistic_cron_job, matches, id)
            }
            Self::KubeQps => set(&mut config.kube_qps, matches, id),
            Self::KubeBurst => set(&mut config.kube_burst, matches, id),
            Self::WorkflowVersion => set(&mut config.workflow_version, matches, id),
            Self::DexServerUrl => set(&mut config.dex_server_url, matches, id),
            Self::CorePluginPath => set(&mut config.plugin.core_plugin_path, matches, id),
            Self::CustomPluginPath => {
                if let Some(paths) = matches.get_many::<String>(id) {
                    config.plugin.custom_plugin_path = paths.cloned().collect();
                }
            }
            Self::ExitOnLostLeader => set(&mut config.exit_on_lost_leader, matches, id),
        }
    }
}

fn set<T>(slot: &mut T, matches: &ArgMatches, id: &str)
where
    T: Clone + Send + Sync + 'static,
{
    if let Some(value) = matches.get_one::<T>(id) {
        *slot = value.clone();
    }
}

/// One row of the flag table.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    pub setting: Setting,
    pub name: &'static str,
    pub kind: FlagKind,
    pub defaults: Vec<String>,
    pub help: &'static str,
}

impl FlagSpec {
    /// Build the clap argument for this row.
    pub fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name).long(self.name).help(self.help);
        match self.kind {
            FlagKind::String => arg
                .value_name("string")
                .action(ArgAction::Set)
                .default_value(self.defaults.concat()),
            FlagKind::StringArray => arg
                .value_name("path")
                .action(ArgAction::Append)
                .default_values(self.defaults.clone()),
            FlagKind::Bool => arg
                .value_name("bool")
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(value_parser!(bool))
                .default_value(self.defaults.concat()),
            FlagKind::Int => arg
                .value_name("int")
                .action(ArgAction::Set)
                .value_parser(value_parser!(u32))
                .default_value(self.defaults.concat()),
            FlagKind::Float => arg
                .value_name("float")
                .action(ArgAction::Set)
                .value_parser(value_parser!(f64))
                .default_value(self.defaults.concat()),
            FlagKind::Duration => arg
                .value_name("duration")
                .action(ArgAction::Set)
                .value_parser(parse_duration)
                .default_value(self.defaults.concat()),
        }
    }
}

/// Declare every setting as a (name, kind, default, help) row.
pub fn flag_table(defaults: &ServerConfig) -> Vec<FlagSpec> {
    Setting::ALL
        .into_iter()
        .map(|setting| FlagSpec {
            setting,
            name: setting.flag(),
            kind: setting.kind(),
            defaults: setting.default_values(defaults),
            help: setting.help(),
        })
        .collect()
}

/// Register one flag per setting on `command`, displaying the values of
/// `defaults` as flag defaults.
pub fn register_flags(command: Command, defaults: &ServerConfig) -> Command {
    flag_table(defaults)
        .iter()
        .fold(command, |command, flag| command.arg(flag.to_arg()))
}

/// Materialize a new configuration: `defaults` with every flag given on
/// the command line applied on top.
pub fn apply_matches(defaults: &ServerConfig, matches: &ArgMatches) -> ServerConfig {
    let mut config = defaults.clone();
    for setting in Setting::ALL {
        if matches.value_source(setting.flag()) == Some(ValueSource::CommandLine) {
            setting.apply(&mut config, matches);
        }
    }
    config
}
