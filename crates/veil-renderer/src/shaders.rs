//! GLSL sources, embedded at compile time.
//!
//! Every `uniform` is declared on its own line.

pub const FULLSCREEN_QUAD_VERT: &str = include_str!("shaders/fullscreen_quad.vert");
/// Left half of the target only.
pub const HALF_SCREEN_QUAD_VERT: &str = include_str!("shaders/half_screen_quad.vert");
pub const GAUSSIAN_BLUR_FRAG: &str = include_str!("shaders/gaussian_blur.frag");
pub const STENCIL_MASK_FRAG: &str = include_str!("shaders/stencil_mask.frag");
pub const BACKGROUND_FRAG: &str = include_str!("shaders/background.frag");
pub const PRESENT_FRAG: &str = include_str!("shaders/present.frag");
