use std::fmt;

use bitflags::bitflags;
use veil_common::Rect2D;

/// Raw driver object name. Zero is never a live object.
pub type GlName = u32;

// =============================================================================
// Driver enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Texture,
    Sampler,
    Renderbuffer,
    Framebuffer,
    Program,
    Shader,
    VertexArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
        })
    }
}

/// Texture binding point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2D,
    Texture2DArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8,
    Rgba16F,
    R8,
    Depth24,
}

impl TextureFormat {
    pub fn is_depth(self) -> bool {
        matches!(self, Self::Depth24)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderbufferFormat {
    Depth24Stencil8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrap {
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// Texture or sampler parameter write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureParameter {
    MinFilter(Filter),
    MagFilter(Filter),
    WrapS(Wrap),
    WrapT(Wrap),
    MaxLevel(u32),
}

/// Framebuffer attachment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attachment {
    Color(u32),
    Depth,
    DepthStencil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    StencilTest,
    Blend,
    CullFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    Never,
    Always,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    Increment,
    Decrement,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlitFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    Complete,
    /// Driver status enum for anything other than complete.
    Incomplete(u32),
}

bitflags! {
    /// Buffers affected by a clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

// =============================================================================
// Reflection and uniform data
// =============================================================================

/// One entry of the driver's active-uniform list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    /// Name as the driver reports it; arrays end in `[0]`.
    pub name: String,
    /// Array length, 1 for scalars.
    pub size: u32,
    /// GL type enum (`GL_FLOAT_VEC2`, `GL_SAMPLER_2D`, ...).
    pub utype: u32,
}

/// Value written to a uniform location.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
    FloatArray(Vec<f32>),
    IntArray(Vec<i32>),
}

// =============================================================================
// GlBackend
// =============================================================================

/// Every driver entry point the renderer uses.
///
/// Calls map one-to-one onto OpenGL functions and take `&self`; the
/// renderer only ever drives the backend from the thread that owns the
/// context. Creation calls return [`Err`] with the driver's message when
/// the driver refuses to create an object.
pub trait GlBackend {
    // Limits
    fn max_texture_units(&self) -> u32;
    fn max_color_attachments(&self) -> u32;
    fn max_draw_buffers(&self) -> u32;

    // Objects
    fn create_object(&self, kind: ObjectKind) -> Result<GlName, String>;
    fn create_shader(&self, stage: ShaderStage) -> Result<GlName, String>;
    fn delete_object(&self, kind: ObjectKind, name: GlName);

    // Textures
    fn tex_storage_2d(
        &self,
        target: TextureTarget,
        levels: u32,
        format: TextureFormat,
        width: u32,
        height: u32,
    );
    fn tex_storage_3d(
        &self,
        target: TextureTarget,
        levels: u32,
        format: TextureFormat,
        width: u32,
        height: u32,
        depth: u32,
    );
    fn tex_parameter(&self, target: TextureTarget, parameter: TextureParameter);
    fn generate_mipmap(&self, target: TextureTarget);

    // Texture units
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: TextureTarget, texture: Option<GlName>);
    fn bind_sampler(&self, unit: u32, sampler: Option<GlName>);
    fn sampler_parameter(&self, sampler: GlName, parameter: TextureParameter);

    // Shaders and programs
    fn shader_source(&self, shader: GlName, source: &str);
    fn compile_shader(&self, shader: GlName);
    fn shader_compile_status(&self, shader: GlName) -> bool;
    fn shader_info_log(&self, shader: GlName) -> String;
    fn attach_shader(&self, program: GlName, shader: GlName);
    fn detach_shader(&self, program: GlName, shader: GlName);
    fn link_program(&self, program: GlName);
    fn program_link_status(&self, program: GlName) -> bool;
    fn program_info_log(&self, program: GlName) -> String;
    fn use_program(&self, program: Option<GlName>);
    fn active_uniforms(&self, program: GlName) -> Vec<ActiveUniform>;
    fn uniform_location(&self, program: GlName, name: &str) -> Option<u32>;
    fn set_uniform(&self, location: u32, value: &UniformValue);

    // Framebuffers
    fn bind_framebuffer(&self, framebuffer: Option<GlName>);
    fn framebuffer_texture(
        &self,
        attachment: Attachment,
        texture: Option<GlName>,
        level: u32,
        layer: Option<u32>,
    );
    fn framebuffer_renderbuffer(&self, attachment: Attachment, renderbuffer: Option<GlName>);
    /// Empty `slots` selects `GL_NONE`.
    fn draw_buffers(&self, slots: &[u32]);
    fn read_buffer(&self, slot: Option<u32>);
    fn blit_framebuffer(&self, src: Rect2D, dst: Rect2D, filter: BlitFilter);
    fn check_framebuffer_status(&self) -> FramebufferStatus;
    fn clear(&self, mask: ClearMask);
    fn viewport(&self, rect: Rect2D);

    // Renderbuffers
    fn bind_renderbuffer(&self, renderbuffer: Option<GlName>);
    fn renderbuffer_storage(&self, format: RenderbufferFormat, width: u32, height: u32);

    // Fixed-function state
    fn enable(&self, capability: Capability);
    fn disable(&self, capability: Capability);
    fn stencil_func(&self, func: CompareFunc, reference: i32, mask: u32);
    fn stencil_op(&self, stencil_fail: StencilOp, depth_fail: StencilOp, pass: StencilOp);
    fn stencil_mask(&self, mask: u32);
    fn color_mask(&self, r: bool, g: bool, b: bool, a: bool);

    // Drawing
    fn bind_vertex_array(&self, vertex_array: Option<GlName>);
    fn draw_arrays(&self, primitive: Primitive, first: u32, count: u32);
}
