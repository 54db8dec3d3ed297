//! Configuration round-trips and defaults.

use probex::config::{Config, TargetConfig};
use tempfile::TempDir;

#[test]
fn test_round_trips_through_a_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");

    let mut config = Config::default();
    config.set_target(
        "web-a",
        TargetConfig::direct("203.0.113.7", "admin")
            .with_port(2222)
            .with_ssh_key("~/.ssh/deploy_ed25519"),
    );
    config.set_target(
        "mig-member",
        TargetConfig::tunneled("cloudcli ssh {name} --zone {zone} --command {command}")
            .with_zone("europe-west1-b"),
    );

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("nope.yml")).unwrap();
    assert!(config.is_empty());
    assert_eq!(config.defaults.retry.max_attempts, 3);
    assert_eq!(config.defaults.retry.delay_secs, 20);
    assert_eq!(config.defaults.poll.interval_secs, 5);
    assert_eq!(config.defaults.poll.deadline_secs, 120);
}

#[test]
fn test_malformed_yaml_fails_with_suggestions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(&path, "targets: [not: a: map]").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Suggestions"));
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("config.yml");

    let mut config = Config::default();
    config.set_target("web-a", TargetConfig::direct("h", "u"));
    config.save_to(&path).unwrap();

    assert!(path.exists());
    let loaded = Config::load_from(&path).unwrap();
    assert!(loaded.get_target("web-a").is_some());
}

#[test]
fn test_partial_defaults_keep_the_rest() {
    let yaml = "defaults:\n  retry:\n    max_attempts: 7\n";
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.defaults.retry.max_attempts, 7);
    assert_eq!(config.defaults.retry.delay_secs, 20);
    assert_eq!(config.defaults.poll.interval_secs, 5);
}
