//! Procedural background pattern drawn into the scene target.

use serde::{Deserialize, Serialize};

/// Animated checkerboard colors and cell size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Hex color (`#rrggbb` or `#rrggbbaa`).
    pub primary: String,
    pub secondary: String,
    /// Checker cell edge in pixels (valid range: 4-512).
    pub cell_size: u32,
    /// Scroll speed in cells per second (valid range: 0.0-10.0).
    pub animation_speed: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            primary: "#1e1e2e".into(),
            secondary: "#cba6f7".into(),
            cell_size: 48,
            animation_speed: 0.5,
        }
    }
}
