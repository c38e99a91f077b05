//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod helpers;
mod sections;

#[cfg(test)]
mod tests;

use crate::schema::TabkeepConfig;
use tabkeep_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TabkeepConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_tabs(&mut errors, config);
    sections::validate_keep_alive(&mut errors, config);
    sections::validate_back_guard(&mut errors, config);
    sections::validate_browser(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
