//! Veil configuration system.
//!
//! TOML-based configuration with full validation. All config sections use
//! sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BackgroundConfig, BlurConfig, BlurMaskMode, LoggingConfig, VeilConfig, WindowConfig,
    CONFIG_SCHEMA_VERSION,
};

use std::path::Path;
use veil_common::ConfigError;

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default path is created with a commented template when missing.
/// An explicit path that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<VeilConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &VeilConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
