//! Per-section validators.

use crate::schema::{TabkeepConfig, MAX_SCREEN_OFF_MINUTES};

use super::helpers::validate_range;

pub(crate) fn validate_tabs(errors: &mut Vec<String>, config: &TabkeepConfig) {
    validate_range(
        errors,
        "tabs.sweep_interval_secs",
        config.tabs.sweep_interval_secs,
        1,
        3600,
    );
    validate_range(
        errors,
        "tabs.inactivity_threshold_secs",
        config.tabs.inactivity_threshold_secs,
        1,
        86400,
    );
}

pub(crate) fn validate_keep_alive(errors: &mut Vec<String>, config: &TabkeepConfig) {
    validate_range(
        errors,
        "keep_alive.grace_period_secs",
        config.keep_alive.grace_period_secs,
        0,
        3600,
    );
    let minutes = config.keep_alive.screen_off_minutes();
    if minutes > 0 {
        validate_range(
            errors,
            "keep_alive.screen_off_timeout",
            minutes,
            1,
            MAX_SCREEN_OFF_MINUTES,
        );
    }
}

pub(crate) fn validate_back_guard(errors: &mut Vec<String>, config: &TabkeepConfig) {
    validate_range(
        errors,
        "back_guard.required_presses",
        config.back_guard.required_presses,
        1,
        10,
    );
    validate_range(
        errors,
        "back_guard.window_ms",
        config.back_guard.window_ms,
        100,
        10_000,
    );
}

pub(crate) fn validate_browser(errors: &mut Vec<String>, config: &TabkeepConfig) {
    if url::Url::parse(&config.browser.home_page).is_err() {
        errors.push(format!(
            "browser.home_page = {:?} is not a valid URL",
            config.browser.home_page
        ));
    }
}
