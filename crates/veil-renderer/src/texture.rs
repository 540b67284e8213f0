//! Textures, samplers and renderbuffers.

use tracing::debug;
use veil_common::Size2D;

use crate::context::GpuContext;
use crate::error::{GlError, GlResult};
use crate::gl::{
    Filter, GlHandle, GlName, ObjectKey, ObjectKind, RenderbufferFormat, TextureFormat,
    TextureParameter, TextureTarget, Wrap,
};
use crate::texture_units::TextureUnitCache;

// =============================================================================
// Texture
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub target: TextureTarget,
    pub format: TextureFormat,
    pub size: Size2D,
    pub mip_levels: u32,
    /// Array layers; 1 for plain 2D textures.
    pub layers: u32,
}

/// Immutable-storage texture.
#[derive(Debug)]
pub struct Texture {
    handle: GlHandle,
    desc: TextureDescriptor,
}

impl Texture {
    pub fn new(ctx: &mut GpuContext, desc: TextureDescriptor) -> GlResult<Self> {
        if desc.size.is_empty() {
            return Err(GlError::InvalidArgument(format!(
                "texture size {} must be non-zero",
                desc.size
            )));
        }
        let full_chain = desc.size.full_mip_chain();
        if desc.mip_levels == 0 || desc.mip_levels > full_chain {
            return Err(GlError::InvalidArgument(format!(
                "{} mip levels requested for a {} texture (1..={full_chain} allowed)",
                desc.mip_levels, desc.size
            )));
        }
        match desc.target {
            TextureTarget::Texture2D if desc.layers != 1 => {
                return Err(GlError::InvalidArgument(
                    "2D textures have exactly one layer".into(),
                ));
            }
            TextureTarget::Texture2DArray if desc.layers == 0 => {
                return Err(GlError::InvalidArgument(
                    "array textures need at least one layer".into(),
                ));
            }
            _ => {}
        }

        let handle = GlHandle::create(ctx.gl(), ObjectKind::Texture)?;
        let texture = Self { handle, desc };
        ctx.texture_units_mut().bind_texture_to_active_unit(&texture);

        let gl = ctx.gl();
        let Size2D { width, height } = desc.size;
        match desc.target {
            TextureTarget::Texture2D => {
                gl.tex_storage_2d(desc.target, desc.mip_levels, desc.format, width, height)
            }
            TextureTarget::Texture2DArray => gl.tex_storage_3d(
                desc.target,
                desc.mip_levels,
                desc.format,
                width,
                height,
                desc.layers,
            ),
        }
        let min_filter = if desc.mip_levels > 1 {
            Filter::LinearMipmapLinear
        } else {
            Filter::Linear
        };
        gl.tex_parameter(desc.target, TextureParameter::MinFilter(min_filter));
        gl.tex_parameter(desc.target, TextureParameter::MagFilter(Filter::Linear));
        gl.tex_parameter(desc.target, TextureParameter::WrapS(Wrap::ClampToEdge));
        gl.tex_parameter(desc.target, TextureParameter::WrapT(Wrap::ClampToEdge));
        gl.tex_parameter(
            desc.target,
            TextureParameter::MaxLevel(desc.mip_levels - 1),
        );

        debug!(
            texture = %texture.key(),
            size = %desc.size,
            format = ?desc.format,
            mips = desc.mip_levels,
            layers = desc.layers,
            "created texture"
        );
        Ok(texture)
    }

    /// Single-level 2D texture.
    pub fn new_2d(ctx: &mut GpuContext, format: TextureFormat, size: Size2D) -> GlResult<Self> {
        Self::new(
            ctx,
            TextureDescriptor {
                target: TextureTarget::Texture2D,
                format,
                size,
                mip_levels: 1,
                layers: 1,
            },
        )
    }

    /// 2D texture with a complete mip chain.
    pub fn new_2d_mipmapped(
        ctx: &mut GpuContext,
        format: TextureFormat,
        size: Size2D,
    ) -> GlResult<Self> {
        Self::new(
            ctx,
            TextureDescriptor {
                target: TextureTarget::Texture2D,
                format,
                size,
                mip_levels: size.full_mip_chain().max(1),
                layers: 1,
            },
        )
    }

    pub fn new_2d_array(
        ctx: &mut GpuContext,
        format: TextureFormat,
        size: Size2D,
        layers: u32,
    ) -> GlResult<Self> {
        Self::new(
            ctx,
            TextureDescriptor {
                target: TextureTarget::Texture2DArray,
                format,
                size,
                mip_levels: 1,
                layers,
            },
        )
    }

    pub fn name(&self) -> GlName {
        self.handle.name()
    }

    pub fn key(&self) -> ObjectKey {
        self.handle.key()
    }

    pub fn target(&self) -> TextureTarget {
        self.desc.target
    }

    pub fn format(&self) -> TextureFormat {
        self.desc.format
    }

    pub fn size(&self) -> Size2D {
        self.desc.size
    }

    pub fn mip_levels(&self) -> u32 {
        self.desc.mip_levels
    }

    pub fn layers(&self) -> u32 {
        self.desc.layers
    }

    pub fn has_mip(&self, level: u32) -> bool {
        level < self.desc.mip_levels
    }

    pub fn mip_size(&self, level: u32) -> Size2D {
        self.desc.size.mip(level)
    }

    /// Regenerate levels 1.. from level 0.
    pub fn generate_mipmaps(&self, units: &mut TextureUnitCache) {
        units.bind_texture_to_active_unit(self);
        self.handle.gl().generate_mipmap(self.desc.target);
    }
}

// =============================================================================
// Sampler
// =============================================================================

/// Sampler object overriding a texture's own filtering on one unit.
#[derive(Debug)]
pub struct Sampler {
    handle: GlHandle,
}

impl Sampler {
    pub fn new(ctx: &GpuContext, filter: Filter, wrap: Wrap) -> GlResult<Self> {
        let handle = GlHandle::create(ctx.gl(), ObjectKind::Sampler)?;
        let gl = ctx.gl();
        let name = handle.name();
        gl.sampler_parameter(name, TextureParameter::MinFilter(filter));
        let mag = match filter {
            Filter::LinearMipmapLinear => Filter::Linear,
            other => other,
        };
        gl.sampler_parameter(name, TextureParameter::MagFilter(mag));
        gl.sampler_parameter(name, TextureParameter::WrapS(wrap));
        gl.sampler_parameter(name, TextureParameter::WrapT(wrap));
        Ok(Self { handle })
    }

    pub fn linear_clamp(ctx: &GpuContext) -> GlResult<Self> {
        Self::new(ctx, Filter::Linear, Wrap::ClampToEdge)
    }

    pub fn nearest_clamp(ctx: &GpuContext) -> GlResult<Self> {
        Self::new(ctx, Filter::Nearest, Wrap::ClampToEdge)
    }

    pub fn name(&self) -> GlName {
        self.handle.name()
    }

    pub fn key(&self) -> ObjectKey {
        self.handle.key()
    }
}

// =============================================================================
// Renderbuffer
// =============================================================================

#[derive(Debug)]
pub struct Renderbuffer {
    handle: GlHandle,
    format: RenderbufferFormat,
    size: Size2D,
}

impl Renderbuffer {
    pub fn new(ctx: &GpuContext, format: RenderbufferFormat, size: Size2D) -> GlResult<Self> {
        if size.is_empty() {
            return Err(GlError::InvalidArgument(format!(
                "renderbuffer size {size} must be non-zero"
            )));
        }
        let handle = GlHandle::create(ctx.gl(), ObjectKind::Renderbuffer)?;
        let gl = ctx.gl();
        gl.bind_renderbuffer(Some(handle.name()));
        gl.renderbuffer_storage(format, size.width, size.height);
        Ok(Self {
            handle,
            format,
            size,
        })
    }

    /// 24-bit depth plus 8-bit stencil.
    pub fn new_depth_stencil(ctx: &GpuContext, size: Size2D) -> GlResult<Self> {
        Self::new(ctx, RenderbufferFormat::Depth24Stencil8, size)
    }

    pub fn name(&self) -> GlName {
        self.handle.name()
    }

    pub fn key(&self) -> ObjectKey {
        self.handle.key()
    }

    pub fn format(&self) -> RenderbufferFormat {
        self.format
    }

    pub fn size(&self) -> Size2D {
        self.size
    }
}
