//! End-to-end tests: defaults → flags → validation.

use std::time::Duration;

use apiserver::config::{
    default_config, validate_config, ConfigBuilder, ConfigError, DatastoreType, ServerConfig,
    ValidationError,
};
use apiserver::lifecycle::startup::{self, OutputFormat};

mod common;

use common::SequenceIds;

fn parse(args: &[&str]) -> ServerConfig {
    let builder = ConfigBuilder::with_id_generator(&SequenceIds::default());
    builder
        .parse_from(std::iter::once("apiserver").chain(args.iter().copied()))
        .unwrap()
}

#[test]
fn test_default_config_is_valid() {
    assert!(default_config().validate().is_empty());
    assert!(validate_config(&ServerConfig::default()).is_ok());
}

#[test]
fn test_default_leader_ids_never_collide() {
    let ids: std::collections::HashSet<String> =
        (0..64).map(|_| default_config().leader.id).collect();
    assert_eq!(ids.len(), 64);
}

#[test]
fn test_injected_ids_are_deterministic() {
    let ids = SequenceIds::default();
    assert_eq!(ServerConfig::with_id_generator(&ids).leader.id, "holder-0");
    assert_eq!(ServerConfig::with_id_generator(&ids).leader.id, "holder-1");
}

#[test]
fn test_kubeapi_scenario() {
    let cfg = parse(&["--datastore-type", "kubeapi"]);
    assert_eq!(cfg.datastore.kind(), Ok(DatastoreType::KubeApi));
    assert!(cfg.validate().is_empty());
}

#[test]
fn test_sqlite_scenario() {
    let cfg = parse(&["--datastore-type", "sqlite"]);
    let errors = cfg.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("sqlite"));
}

#[test]
fn test_sqlite_with_wildcard_bind_addr() {
    let cfg = parse(&["--bind-addr=:8000", "--datastore-type", "sqlite"]);
    let errors = cfg.validate();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field(), "datastore-type");
}

#[test]
fn test_qps_burst_scenario() {
    let cfg = parse(&["--kube-api-qps", "50", "--kube-api-burst", "150"]);
    assert_eq!(cfg.kube_qps, 50.0);
    assert_eq!(cfg.kube_burst, 150);
    assert!(cfg.validate().is_empty());
}

#[test]
fn test_override_wins_over_default() {
    let cfg = parse(&[
        "--id",
        "primary",
        "--lock-name",
        "velaux-lock",
        "--duration=30s",
        "--dex-server",
        "https://dex.example.com",
    ]);
    assert_eq!(cfg.leader.id, "primary");
    assert_eq!(cfg.leader.lock_name, "velaux-lock");
    assert_eq!(cfg.leader.duration, Duration::from_secs(30));
    assert_eq!(cfg.dex_server_url, "https://dex.example.com");
}

#[test]
fn test_plugin_paths_preserve_order() {
    let cfg = parse(&[
        "--plugin-path",
        "/opt/plugins/base",
        "--plugin-path",
        "/opt/plugins/team",
        "--plugin-path",
        "/opt/plugins/local",
    ]);
    assert_eq!(
        cfg.plugin.custom_plugin_path,
        ["/opt/plugins/base", "/opt/plugins/team", "/opt/plugins/local"]
    );
    let order: Vec<&str> = cfg.plugin.search_paths().collect();
    assert_eq!(
        order,
        ["core-plugins", "/opt/plugins/base", "/opt/plugins/team", "/opt/plugins/local"]
    );
}

#[test]
fn test_external_datastore_requires_url() {
    let builder = ConfigBuilder::with_id_generator(&SequenceIds::default());
    let err = builder
        .build_from(["apiserver", "--datastore-type", "mongodb"])
        .unwrap_err();
    match err {
        ConfigError::Validation(errors) => assert_eq!(
            errors,
            [ValidationError::MissingForDatastore {
                field: "datastore-url",
                datastore: DatastoreType::MongoDb,
            }]
        ),
        other => panic!("unexpected error: {other}"),
    }

    let cfg = builder
        .build_from([
            "apiserver",
            "--datastore-type",
            "postgres",
            "--datastore-url",
            "postgres://vela@db:5432",
        ])
        .unwrap();
    assert_eq!(cfg.datastore.database, "kubevela");
}

#[test]
fn test_full_command_line_renders() {
    let builder = ConfigBuilder::with_id_generator(&SequenceIds::default());
    let launch = startup::parse_args(
        &builder,
        ["apiserver", "--print-config=json", "--bind-addr", "127.0.0.1:8001"],
    )
    .unwrap();
    assert_eq!(launch.options.print_config, Some(OutputFormat::Json));
    assert!(startup::check(&launch.config).is_ok());

    let text = startup::render(&launch.config, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["bind_addr"], "127.0.0.1:8001");
    assert_eq!(value["addon_cache_time"], "10m");
}
