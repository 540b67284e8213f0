//! Frame orchestration: background, optional blur, present.

mod background;
mod frame;


pub use background::BackgroundPass;

use tracing::info;
use veil_common::Size2D;
use veil_config::VeilConfig;

use crate::blur::{BlurConfiguration, BlurMask, SeparableBlur};
use crate::context::GpuContext;
use crate::error::{GlError, GlResult};
use crate::framebuffer::{ColorAttachment, Framebuffer};
use crate::gl::TextureFormat;
use crate::program::{ShaderProgram, ShaderSources};
use crate::shaders::{FULLSCREEN_QUAD_VERT, PRESENT_FRAG};
use crate::texture::{Renderbuffer, Texture};

// ---------------------------------------------------------------------------
// SceneTarget
// ---------------------------------------------------------------------------

/// Off-screen framebuffer the frame is composed in.
struct SceneTarget {
    framebuffer: Framebuffer,
    color: Texture,
    _depth_stencil: Renderbuffer,
}

impl SceneTarget {
    fn new(ctx: &mut GpuContext, size: Size2D) -> GlResult<Self> {
        let color = Texture::new_2d(ctx, TextureFormat::Rgba8, size)?;
        let depth_stencil = Renderbuffer::new_depth_stencil(ctx, size)?;
        let mut framebuffer = Framebuffer::new(ctx, size)?;
        framebuffer.attach_depth_stencil_renderbuffer(&depth_stencil)?;
        framebuffer.attach_color_texture(&color, 0, ColorAttachment::Automatic)?;
        Ok(Self {
            framebuffer,
            color,
            _depth_stencil: depth_stencil,
        })
    }
}

// ---------------------------------------------------------------------------
// FrameRenderer
// ---------------------------------------------------------------------------

pub struct FrameRenderer {
    size: Size2D,
    scene: SceneTarget,
    background: BackgroundPass,
    present: ShaderProgram,
    blur: SeparableBlur,
    blur_enabled: bool,
    mask: BlurMask,
    blur_config: BlurConfiguration,
    frames: u64,
}

impl FrameRenderer {
    pub fn new(ctx: &mut GpuContext, size: Size2D, config: &VeilConfig) -> GlResult<Self> {
        if size.is_empty() {
            return Err(GlError::InvalidArgument(format!(
                "render size {size} must be non-zero"
            )));
        }
        let background = BackgroundPass::from_config(ctx, &config.background)?;
        let present = ShaderProgram::new(
            ctx,
            ShaderSources::new(FULLSCREEN_QUAD_VERT, PRESENT_FRAG),
        )?;
        let scene = SceneTarget::new(ctx, size)?;
        let blur = SeparableBlur::new(ctx, size)?;

        info!(
            %size,
            blur = config.blur.enabled,
            mask = ?config.blur.mask,
            "frame renderer ready"
        );
        Ok(Self {
            size,
            scene,
            background,
            present,
            blur,
            blur_enabled: config.blur.enabled,
            mask: config.blur.mask.into(),
            blur_config: BlurConfiguration::from(&config.blur),
            frames: 0,
        })
    }

    pub fn size(&self) -> Size2D {
        self.size
    }

    /// Rebuild the size-dependent targets. Empty sizes (minimized windows)
    /// are ignored.
    pub fn resize(&mut self, ctx: &mut GpuContext, size: Size2D) -> GlResult<()> {
        if size.is_empty() || size == self.size {
            return Ok(());
        }
        // Nothing is replaced unless every target builds.
        let scene = SceneTarget::new(ctx, size)?;
        let blur = SeparableBlur::new(ctx, size)?;
        self.scene = scene;
        self.blur = blur;
        self.size = size;
        info!(%size, "resized render targets");
        Ok(())
    }

    pub fn is_blur_enabled(&self) -> bool {
        self.blur_enabled
    }

    pub fn set_blur_enabled(&mut self, enabled: bool) {
        self.blur_enabled = enabled;
    }

    pub fn mask(&self) -> BlurMask {
        self.mask
    }

    /// Advance to the next mask mode and return it.
    pub fn cycle_mask(&mut self) -> BlurMask {
        self.mask = match self.mask {
            BlurMask::None => BlurMask::Vertex,
            BlurMask::Vertex => BlurMask::Stencil,
            BlurMask::Stencil => BlurMask::None,
        };
        self.mask
    }

    pub fn blur_configuration(&self) -> BlurConfiguration {
        self.blur_config
    }

    pub fn set_blur_configuration(&mut self, config: BlurConfiguration) {
        self.blur_config = config;
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn blur_engine(&self) -> &SeparableBlur {
        &self.blur
    }

    pub fn scene_framebuffer(&self) -> &Framebuffer {
        &self.scene.framebuffer
    }
}
