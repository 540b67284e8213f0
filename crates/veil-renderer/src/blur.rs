//! Two-pass separable Gaussian blur.
//!
//! The horizontal pass samples the source image and writes the engine's own
//! intermediate image; the vertical pass samples that image and writes the
//! destination framebuffer. The masked variants restrict the result to the
//! left half of the target, either with half-width geometry or with a
//! stencil mask.

mod kernel;
mod settings;

#[cfg(test)]
mod tests;

pub use kernel::{gaussian_weights, BlurKernel, KernelTap, MAX_KERNEL_TAPS};
pub use settings::BlurConfiguration;

use tracing::{debug, info};
use veil_common::Size2D;
use veil_config::BlurMaskMode;

use crate::context::GpuContext;
use crate::error::{GlError, GlResult};
use crate::framebuffer::{ColorAttachment, Framebuffer};
use crate::gl::{Capability, ClearMask, CompareFunc, StencilOp, TextureFormat};
use crate::program::{ShaderProgram, ShaderSources, UniformKey};
use crate::shaders::{
    FULLSCREEN_QUAD_VERT, GAUSSIAN_BLUR_FRAG, HALF_SCREEN_QUAD_VERT, STENCIL_MASK_FRAG,
};
use crate::texture::{Renderbuffer, Texture};

const RENDER_TARGET_SIZE: UniformKey = UniformKey::new("uRenderTargetSize");
const KERNEL_WEIGHTS: UniformKey = UniformKey::new("uKernelWeights[0]");
const TEXTURE_OFFSETS: UniformKey = UniformKey::new("uTextureOffsets[0]");
const KERNEL_SIZE: UniformKey = UniformKey::new("uKernelSize");
const BLUR_DIRECTION: UniformKey = UniformKey::new("uBlurDirection");
const TEXTURE: UniformKey = UniformKey::new("uTexture");

/// Largest radius whose reduced kernel fits the shader's tap arrays.
const MAX_BLUR_RADIUS: u32 = 2 * (MAX_KERNEL_TAPS as u32 - 1);

const STENCIL_REFERENCE: i32 = 1;
const STENCIL_ALL_BITS: u32 = 0xFF;

/// Region of the destination the blur writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlurMask {
    /// Whole frame.
    None,
    /// Left half, by half-width geometry.
    #[default]
    Vertex,
    /// Left half, by stencil test.
    Stencil,
}

impl From<BlurMaskMode> for BlurMask {
    fn from(mode: BlurMaskMode) -> Self {
        match mode {
            BlurMaskMode::None => Self::None,
            BlurMaskMode::Vertex => Self::Vertex,
            BlurMaskMode::Stencil => Self::Stencil,
        }
    }
}

pub struct SeparableBlur {
    full_screen: ShaderProgram,
    half_screen: ShaderProgram,
    stencil_mask: ShaderProgram,
    framebuffer: Framebuffer,
    intermediate: Texture,
    depth_stencil: Renderbuffer,
    kernel: BlurKernel,
    requested: Option<BlurConfiguration>,
    recomputations: u32,
}

impl SeparableBlur {
    pub fn new(ctx: &mut GpuContext, size: Size2D) -> GlResult<Self> {
        let full_screen = ShaderProgram::new(
            ctx,
            ShaderSources::new(FULLSCREEN_QUAD_VERT, GAUSSIAN_BLUR_FRAG),
        )?;
        let half_screen = ShaderProgram::new(
            ctx,
            ShaderSources::new(HALF_SCREEN_QUAD_VERT, GAUSSIAN_BLUR_FRAG),
        )?;
        let stencil_mask = ShaderProgram::new(
            ctx,
            ShaderSources::new(HALF_SCREEN_QUAD_VERT, STENCIL_MASK_FRAG),
        )?;

        let mut framebuffer = Framebuffer::new(ctx, size)?;
        let intermediate = Texture::new_2d(ctx, TextureFormat::Rgba8, size)?;
        let depth_stencil = Renderbuffer::new_depth_stencil(ctx, size)?;
        framebuffer.attach_color_texture(&intermediate, 0, ColorAttachment::Automatic)?;
        framebuffer.attach_depth_stencil_renderbuffer(&depth_stencil)?;

        info!(%size, "blur engine ready");
        Ok(Self {
            full_screen,
            half_screen,
            stencil_mask,
            framebuffer,
            intermediate,
            depth_stencil,
            kernel: BlurKernel::default(),
            requested: None,
            recomputations: 0,
        })
    }

    pub fn size(&self) -> Size2D {
        self.framebuffer.size()
    }

    pub fn intermediate_framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn intermediate_image(&self) -> &Texture {
        &self.intermediate
    }

    pub fn depth_stencil(&self) -> &Renderbuffer {
        &self.depth_stencil
    }

    /// Most recently computed kernel.
    pub fn kernel(&self) -> &BlurKernel {
        &self.kernel
    }

    /// How many times the kernel has been rebuilt.
    pub fn kernel_recomputations(&self) -> u32 {
        self.recomputations
    }

    /// Rebuild the kernel unless `config` equals the last request.
    pub fn compute_kernel(&mut self, config: &BlurConfiguration) -> GlResult<&BlurKernel> {
        if config.radius == 0 {
            return Err(GlError::InvalidArgument(
                "blur radius must be greater than 0".into(),
            ));
        }
        if !config.sigma.is_finite() || config.sigma <= 0.0 {
            return Err(GlError::InvalidArgument(format!(
                "blur sigma must be positive and finite, got {}",
                config.sigma
            )));
        }
        if config.radius > MAX_BLUR_RADIUS {
            return Err(GlError::InvalidArgument(format!(
                "blur radius {} needs more than {MAX_KERNEL_TAPS} taps, at most {MAX_BLUR_RADIUS} supported",
                config.radius
            )));
        }

        if self.requested.as_ref() != Some(config) {
            self.kernel = BlurKernel::build(config);
            self.requested = Some(*config);
            self.recomputations += 1;
            debug!(
                radius = config.radius,
                sigma = config.sigma,
                taps = self.kernel.len(),
                "computed blur kernel"
            );
        }
        Ok(&self.kernel)
    }

    /// Blur the whole of `image` into `destination`.
    pub fn blur(
        &mut self,
        ctx: &mut GpuContext,
        image: &Texture,
        destination: &Framebuffer,
        config: &BlurConfiguration,
    ) -> GlResult<()> {
        self.compute_kernel(config)?;
        self.run_passes(ctx, &self.full_screen, image, destination)
    }

    /// Blur only the left half, using half-width geometry.
    pub fn blur_with_vertex_mask(
        &mut self,
        ctx: &mut GpuContext,
        image: &Texture,
        destination: &Framebuffer,
        config: &BlurConfiguration,
    ) -> GlResult<()> {
        self.compute_kernel(config)?;
        ctx.disable(Capability::DepthTest);
        let result = self.run_passes(ctx, &self.half_screen, image, destination);
        ctx.enable(Capability::DepthTest);
        result
    }

    /// Blur only the left half, clipping full-screen passes with a stencil
    /// mask written into both framebuffers.
    pub fn blur_with_stencil_mask(
        &mut self,
        ctx: &mut GpuContext,
        image: &Texture,
        destination: &Framebuffer,
        config: &BlurConfiguration,
    ) -> GlResult<()> {
        self.compute_kernel(config)?;
        ctx.disable(Capability::DepthTest);
        ctx.enable(Capability::StencilTest);

        ctx.set_stencil_mask(STENCIL_ALL_BITS);
        ctx.set_stencil_func(CompareFunc::Always, STENCIL_REFERENCE, STENCIL_ALL_BITS);
        ctx.set_stencil_op(StencilOp::Keep, StencilOp::Keep, StencilOp::Replace);
        ctx.set_color_writes(false);
        self.stencil_mask.bind();
        for target in [&self.framebuffer, destination] {
            target.clear(ClearMask::STENCIL);
            ctx.draw_quad();
        }
        ctx.set_color_writes(true);

        ctx.set_stencil_func(CompareFunc::Equal, STENCIL_REFERENCE, STENCIL_ALL_BITS);
        ctx.set_stencil_mask(0x00);
        let result = self.run_passes(ctx, &self.full_screen, image, destination);

        ctx.set_stencil_mask(STENCIL_ALL_BITS);
        ctx.disable(Capability::StencilTest);
        ctx.enable(Capability::DepthTest);
        result
    }

    /// Dispatch on `mask`.
    pub fn apply(
        &mut self,
        ctx: &mut GpuContext,
        image: &Texture,
        destination: &Framebuffer,
        mask: BlurMask,
        config: &BlurConfiguration,
    ) -> GlResult<()> {
        match mask {
            BlurMask::None => self.blur(ctx, image, destination, config),
            BlurMask::Vertex => self.blur_with_vertex_mask(ctx, image, destination, config),
            BlurMask::Stencil => self.blur_with_stencil_mask(ctx, image, destination, config),
        }
    }

    fn run_passes(
        &self,
        ctx: &mut GpuContext,
        program: &ShaderProgram,
        image: &Texture,
        destination: &Framebuffer,
    ) -> GlResult<()> {
        let size = image.size();
        program.bind();
        program.set_uniform_vector2(
            RENDER_TARGET_SIZE,
            [size.width as f32, size.height as f32],
        )?;
        program.set_uniform_float_array(KERNEL_WEIGHTS, self.kernel.weights())?;
        program.set_uniform_float_array(TEXTURE_OFFSETS, self.kernel.offsets())?;
        program.set_uniform_integer(KERNEL_SIZE, self.kernel.len() as i32)?;

        program.set_uniform_vector2(BLUR_DIRECTION, [1.0, 0.0])?;
        program.with_sampler_scope(ctx.texture_units_mut(), |scope| {
            scope.set_texture(TEXTURE, image, None)
        })?;
        self.framebuffer.bind();
        ctx.draw_quad();

        program.set_uniform_vector2(BLUR_DIRECTION, [0.0, 1.0])?;
        program.with_sampler_scope(ctx.texture_units_mut(), |scope| {
            scope.set_texture(TEXTURE, &self.intermediate, None)
        })?;
        destination.bind();
        ctx.draw_quad();
        Ok(())
    }
}

impl std::fmt::Debug for SeparableBlur {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeparableBlur")
            .field("size", &self.size())
            .field("requested", &self.requested)
            .field("taps", &self.kernel.len())
            .finish()
    }
}
