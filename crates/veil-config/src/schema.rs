//! Configuration schema types for Veil.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults below.

mod background;
mod blur;
mod logging;
mod window;

pub use background::*;
pub use blur::*;
pub use logging::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Veil.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VeilConfig {
    pub window: WindowConfig,
    pub blur: BlurConfig,
    pub background: BackgroundConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: VeilConfig = toml::from_str("").unwrap();
        assert_eq!(config, VeilConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_fields() {
        let config: VeilConfig = toml::from_str(
            r#"
[blur]
radius = 8
"#,
        )
        .unwrap();
        assert_eq!(config.blur.radius, 8);
        assert!((config.blur.sigma - 15.0).abs() < f64::EPSILON);
        assert!(config.blur.enabled);
        assert_eq!(config.window, WindowConfig::default());
    }
}
