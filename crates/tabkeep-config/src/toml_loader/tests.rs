//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_tabkeep_config.toml"));
    assert!(matches!(
        result.unwrap_err(),
        tabkeep_common::ConfigError::ParseError(_)
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[back_guard]
blocked_domains = "poe.com，example.org"

[keep_alive]
screen_off_timeout = "5"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.back_guard.domains(), vec!["poe.com", "example.org"]);
    assert_eq!(config.keep_alive.screen_off_minutes(), 5);
    // Defaults preserved
    assert_eq!(config.tabs.inactivity_threshold_secs, 60);
    assert_eq!(config.browser.home_page, "https://www.google.com");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    assert!(matches!(
        load_from_path(&path).unwrap_err(),
        tabkeep_common::ConfigError::ParseError(_)
    ));
}

#[test]
fn out_of_range_values_are_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[back_guard]\nrequired_presses = 50\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.back_guard.required_presses, 50);
}

#[test]
fn load_or_default_survives_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[tabs]\nsweep_interval_secs = \"ten\"\n").unwrap();

    let config = load_or_default(Some(&path));
    assert_eq!(config.tabs.sweep_interval_secs, 10);
}

#[test]
fn load_or_default_creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = load_or_default(Some(&path));
    assert!(path.exists());
    assert_eq!(config, crate::TabkeepConfig::default());
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tabkeep").join("config.toml");

    assert!(ensure_default_config(&path).unwrap());
    let config = load_from_path(&path).unwrap();
    assert_eq!(config, crate::TabkeepConfig::default());
}

#[test]
fn existing_config_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[tabs]\nsweep_interval_secs = 30\n").unwrap();

    assert!(!ensure_default_config(&path).unwrap());
    assert_eq!(load_from_path(&path).unwrap().tabs.sweep_interval_secs, 30);
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("tabkeep"));
        assert!(path_str.ends_with("config.toml"));
    }
}
