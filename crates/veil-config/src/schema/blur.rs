//! Post-process blur settings.

use serde::{Deserialize, Serialize};

/// Which part of the frame the blur is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurMaskMode {
    /// Blur the whole frame.
    None,
    /// Restrict to the left half by drawing a half-width quad.
    #[default]
    Vertex,
    /// Restrict to the left half with a stencil mask.
    Stencil,
}

impl BlurMaskMode {
    /// Next mode in the `none -> vertex -> stencil` cycle.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Vertex,
            Self::Vertex => Self::Stencil,
            Self::Stencil => Self::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    pub enabled: bool,
    /// Kernel radius in texels (valid range: 1-62). Odd values round up.
    pub radius: u32,
    /// Gaussian standard deviation (valid range: 0.1-100.0).
    pub sigma: f64,
    pub mask: BlurMaskMode,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 30,
            sigma: 15.0,
            mask: BlurMaskMode::Vertex,
        }
    }
}
