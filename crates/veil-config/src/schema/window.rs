//! Window and GL context settings.

use serde::{Deserialize, Serialize};

/// Initial window size and GL surface options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in physical pixels (valid range: 64-8192).
    pub width: u32,
    /// Initial inner height in physical pixels (valid range: 64-8192).
    pub height: u32,
    /// Wait for vertical blank on swap.
    pub vsync: bool,
    /// Request a debug GL context.
    pub gl_debug: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Veil".into(),
            width: 1280,
            height: 720,
            vsync: true,
            gl_debug: false,
        }
    }
}
