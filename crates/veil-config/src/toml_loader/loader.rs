//! Config file resolution, loading and first-run creation.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use veil_common::ConfigError;

use super::template::default_config_toml;
use crate::schema::VeilConfig;
use crate::validation;

/// Overrides the directory holding `config.toml`.
pub const CONFIG_HOME_VAR: &str = "VEIL_CONFIG_HOME";

const CONFIG_FILE: &str = "config.toml";

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. A file that parses but fails
/// validation is replaced by the default config with a warning.
pub fn load_from_path(path: &Path) -> Result<VeilConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };

    let config: VeilConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!("{}: {e}", path.display());
        warn!("falling back to default config");
        return Ok(VeilConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load from [`default_config_path`], writing the commented template first
/// when no file exists yet.
pub fn load_default() -> Result<VeilConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(VeilConfig::default())
        }
        result => result,
    }
}

/// `$VEIL_CONFIG_HOME/config.toml` when set, else
/// `<platform config dir>/veil/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_HOME_VAR), dirs::config_dir())
}

pub(super) fn resolve_config_path(
    home_override: Option<OsString>,
    platform_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(home) = home_override.filter(|home| !home.is_empty()) {
        return Ok(PathBuf::from(home).join(CONFIG_FILE));
    }
    let dir = platform_dir.ok_or_else(|| {
        ConfigError::ParseError(format!(
            "could not determine config directory; set {CONFIG_HOME_VAR}"
        ))
    })?;
    Ok(dir.join("veil").join(CONFIG_FILE))
}

/// Write the commented default config to `path`. An existing file is left
/// untouched.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |e: std::io::Error| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("{} already exists, keeping it", path.display());
            return Ok(());
        }
        Err(e) => return Err(write_error(e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(write_error)?;

    info!("created default config at {}", path.display());
    Ok(())
}
