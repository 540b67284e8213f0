use serde::{Deserialize, Serialize};

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: [&str; 4] = ["DEBUG", "INFO", "WARNING", "ERROR"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `DEBUG`, `INFO`, `WARNING`, `ERROR`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".into(),
        }
    }
}

impl LoggingConfig {
    /// The level as a `tracing` filter directive scoped to veil crates.
    pub fn filter_directive(&self) -> String {
        let level = match self.level.to_ascii_uppercase().as_str() {
            "DEBUG" => "debug",
            "WARNING" | "WARN" => "warn",
            "ERROR" => "error",
            _ => "info",
        };
        format!("veil={level},veil_renderer={level},veil_config={level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_directive_maps_levels() {
        let mut config = LoggingConfig::default();
        assert!(config.filter_directive().starts_with("veil=info"));
        config.level = "WARNING".into();
        assert!(config.filter_directive().starts_with("veil=warn"));
        config.level = "debug".into();
        assert!(config.filter_directive().contains("veil_renderer=debug"));
    }
}
