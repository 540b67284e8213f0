use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size2D {
    pub width: u32,
    pub height: u32,
}

impl Size2D {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when neither dimension exceeds `other`.
    pub fn fits_within(&self, other: Size2D) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    /// Size of mip level `level`, never smaller than 1x1.
    pub fn mip(&self, level: u32) -> Size2D {
        let shift = level.min(31);
        Size2D {
            width: (self.width >> shift).max(1),
            height: (self.height >> shift).max(1),
        }
    }

    /// Number of levels in a complete mip chain down to 1x1.
    pub fn full_mip_chain(&self) -> u32 {
        let largest = self.width.max(self.height).max(1);
        u32::BITS - largest.leading_zeros()
    }
}

impl fmt::Display for Size2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel rectangle with a bottom-left origin (GL window coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_size(size: Size2D) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn max_x(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn max_y(&self) -> i32 {
        self.y + self.height as i32
    }
}
