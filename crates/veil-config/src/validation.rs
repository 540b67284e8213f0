//! Full configuration validation.
//!
//! Validates numeric ranges, color formats and the log level. Each section
//! has its own check; this orchestrator calls them all and collects errors
//! into a single `ConfigError`.

mod helpers;
mod sections;

#[cfg(test)]
mod tests;

use crate::schema::VeilConfig;
use veil_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &VeilConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_window(&mut errors, config);
    sections::validate_blur(&mut errors, config);
    sections::validate_background(&mut errors, config);
    sections::validate_logging(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
