use veil_common::Color;
use veil_config::BackgroundConfig;

use crate::context::GpuContext;
use crate::error::GlResult;
use crate::gl::Capability;
use crate::program::{ShaderProgram, ShaderSources, UniformKey};
use crate::shaders::{BACKGROUND_FRAG, FULLSCREEN_QUAD_VERT};

const PRIMARY: UniformKey = UniformKey::new("uPrimary");
const SECONDARY: UniformKey = UniformKey::new("uSecondary");
const CELL_SIZE: UniformKey = UniformKey::new("uCellSize");
const TIME: UniformKey = UniformKey::new("uTime");

const FALLBACK_PRIMARY: Color = Color::from_rgba(0x1e, 0x1e, 0x2e, 0xff);
const FALLBACK_SECONDARY: Color = Color::from_rgba(0xcb, 0xa6, 0xf7, 0xff);

/// Scrolling checkerboard drawn behind everything else.
pub struct BackgroundPass {
    program: ShaderProgram,
    primary: [f32; 4],
    secondary: [f32; 4],
    cell_size: f32,
    animation_speed: f32,
}

impl BackgroundPass {
    pub fn from_config(ctx: &GpuContext, config: &BackgroundConfig) -> GlResult<Self> {
        let program = ShaderProgram::new(
            ctx,
            ShaderSources::new(FULLSCREEN_QUAD_VERT, BACKGROUND_FRAG),
        )?;
        Ok(Self {
            program,
            primary: Color::from_hex(&config.primary)
                .unwrap_or(FALLBACK_PRIMARY)
                .to_f32(),
            secondary: Color::from_hex(&config.secondary)
                .unwrap_or(FALLBACK_SECONDARY)
                .to_f32(),
            cell_size: config.cell_size as f32,
            animation_speed: config.animation_speed as f32,
        })
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// Fill the bound framebuffer. Depth testing is off for the draw.
    pub fn draw(&self, ctx: &GpuContext, elapsed: f32) -> GlResult<()> {
        ctx.disable(Capability::DepthTest);
        self.program.bind();
        self.program.set_uniform_vector4(PRIMARY, self.primary)?;
        self.program.set_uniform_vector4(SECONDARY, self.secondary)?;
        self.program.set_uniform_float(CELL_SIZE, self.cell_size)?;
        self.program
            .set_uniform_float(TIME, elapsed * self.animation_speed)?;
        ctx.draw_quad();
        ctx.enable(Capability::DepthTest);
        Ok(())
    }
}
