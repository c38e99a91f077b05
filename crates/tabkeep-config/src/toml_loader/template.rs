//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Tabkeep Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[browser]
# home_page = "https://www.google.com"
# restore_last_page = false     # reopen the last visited page in the first tab
# restore_tabs = true           # restore the saved tab set at startup

[keep_alive]
# screen_off_timeout = "30"     # minutes; "0" or negative disables force release
# enable_wakelock_log = false   # write acquire/release events to wakelock_logs.txt
# grace_period_secs = 120       # 0-3600, delay before stopping the service
# request_battery_exemption = true

[tabs]
# sweep_interval_secs = 10      # 1-3600
# inactivity_threshold_secs = 60  # 1-86400

[back_guard]
# blocked_domains = ""          # e.g. "poe.com, chat.example.org"
# required_presses = 3          # 1-10
# window_ms = 2000              # 100-10000

[logging]
# level = "INFO"                # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
