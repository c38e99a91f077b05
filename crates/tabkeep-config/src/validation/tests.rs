//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    assert!(validate(&TabkeepConfig::default()).is_ok());
}

#[test]
fn catches_zero_sweep_interval() {
    let mut config = TabkeepConfig::default();
    config.tabs.sweep_interval_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("tabs.sweep_interval_secs"));
}

#[test]
fn catches_grace_period_too_long() {
    let mut config = TabkeepConfig::default();
    config.keep_alive.grace_period_secs = 7200;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("keep_alive.grace_period_secs"));
}

#[test]
fn catches_back_guard_ranges() {
    let mut config = TabkeepConfig::default();
    config.back_guard.required_presses = 0;
    config.back_guard.window_ms = 50;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("back_guard.required_presses"));
    assert!(err.contains("back_guard.window_ms"));
}

#[test]
fn catches_bad_home_page() {
    let mut config = TabkeepConfig::default();
    config.browser.home_page = "not a url".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("browser.home_page"));
}

#[test]
fn unparseable_screen_off_timeout_is_not_a_validation_error() {
    let mut config = TabkeepConfig::default();
    config.keep_alive.screen_off_timeout = "later".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_screen_off_timeout_too_long() {
    let mut config = TabkeepConfig::default();
    config.keep_alive.screen_off_timeout = "200000000000000000".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("keep_alive.screen_off_timeout"));
}

#[test]
fn disabled_screen_off_timeout_validates() {
    let mut config = TabkeepConfig::default();
    config.keep_alive.screen_off_timeout = "-1".into();
    assert!(validate(&config).is_ok());
}
