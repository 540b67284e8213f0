//! [`GlBackend`] over a live `glow` context.

use std::num::NonZeroU32;

use glow::HasContext;
use tracing::info;
use veil_common::Rect2D;

use super::backend::*;

/// OpenGL 4.1 core backend.
///
/// All methods assume the wrapped context is current on the calling thread.
pub struct GlowBackend {
    gl: glow::Context,
    max_texture_units: u32,
    max_color_attachments: u32,
    max_draw_buffers: u32,
}

impl GlowBackend {
    pub fn new(gl: glow::Context) -> Self {
        log_driver_info(&gl);
        let (max_texture_units, max_color_attachments, max_draw_buffers) = unsafe {
            (
                gl.get_parameter_i32(glow::MAX_TEXTURE_IMAGE_UNITS).max(1) as u32,
                gl.get_parameter_i32(glow::MAX_COLOR_ATTACHMENTS).max(1) as u32,
                gl.get_parameter_i32(glow::MAX_DRAW_BUFFERS).max(1) as u32,
            )
        };
        info!(
            max_texture_units,
            max_color_attachments, max_draw_buffers, "GL limits"
        );
        Self {
            gl,
            max_texture_units,
            max_color_attachments,
            max_draw_buffers,
        }
    }
}

fn log_driver_info(gl: &glow::Context) {
    fn norm(value: String) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            "<unknown>".to_string()
        } else {
            trimmed.to_string()
        }
    }
    unsafe {
        let vendor = norm(gl.get_parameter_string(glow::VENDOR));
        let renderer = norm(gl.get_parameter_string(glow::RENDERER));
        let version = norm(gl.get_parameter_string(glow::VERSION));
        let glsl = norm(gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION));
        info!("OpenGL driver: {renderer} [{vendor}], {version}, GLSL {glsl}");
    }
}

// =============================================================================
// Enum translation
// =============================================================================

fn nz(name: GlName) -> Option<NonZeroU32> {
    NonZeroU32::new(name)
}

fn texture(name: GlName) -> Option<glow::NativeTexture> {
    nz(name).map(glow::NativeTexture)
}

fn target_enum(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::Texture2DArray => glow::TEXTURE_2D_ARRAY,
    }
}

fn format_enum(format: TextureFormat) -> u32 {
    match format {
        TextureFormat::Rgba8 => glow::RGBA8,
        TextureFormat::Rgba16F => glow::RGBA16F,
        TextureFormat::R8 => glow::R8,
        TextureFormat::Depth24 => glow::DEPTH_COMPONENT24,
    }
}

fn filter_enum(filter: Filter) -> i32 {
    (match filter {
        Filter::Nearest => glow::NEAREST,
        Filter::Linear => glow::LINEAR,
        Filter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }) as i32
}

fn wrap_enum(wrap: Wrap) -> i32 {
    (match wrap {
        Wrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        Wrap::Repeat => glow::REPEAT,
        Wrap::MirroredRepeat => glow::MIRRORED_REPEAT,
    }) as i32
}

fn parameter_pair(parameter: TextureParameter) -> (u32, i32) {
    match parameter {
        TextureParameter::MinFilter(f) => (glow::TEXTURE_MIN_FILTER, filter_enum(f)),
        TextureParameter::MagFilter(f) => (glow::TEXTURE_MAG_FILTER, filter_enum(f)),
        TextureParameter::WrapS(w) => (glow::TEXTURE_WRAP_S, wrap_enum(w)),
        TextureParameter::WrapT(w) => (glow::TEXTURE_WRAP_T, wrap_enum(w)),
        TextureParameter::MaxLevel(level) => (glow::TEXTURE_MAX_LEVEL, level as i32),
    }
}

fn attachment_enum(attachment: Attachment) -> u32 {
    match attachment {
        Attachment::Color(slot) => glow::COLOR_ATTACHMENT0 + slot,
        Attachment::Depth => glow::DEPTH_ATTACHMENT,
        Attachment::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
    }
}

fn capability_enum(capability: Capability) -> u32 {
    match capability {
        Capability::DepthTest => glow::DEPTH_TEST,
        Capability::StencilTest => glow::STENCIL_TEST,
        Capability::Blend => glow::BLEND,
        Capability::CullFace => glow::CULL_FACE,
    }
}

fn compare_enum(func: CompareFunc) -> u32 {
    match func {
        CompareFunc::Never => glow::NEVER,
        CompareFunc::Always => glow::ALWAYS,
        CompareFunc::Equal => glow::EQUAL,
        CompareFunc::NotEqual => glow::NOTEQUAL,
        CompareFunc::Less => glow::LESS,
        CompareFunc::LessEqual => glow::LEQUAL,
        CompareFunc::Greater => glow::GREATER,
        CompareFunc::GreaterEqual => glow::GEQUAL,
    }
}

fn stencil_op_enum(op: StencilOp) -> u32 {
    match op {
        StencilOp::Keep => glow::KEEP,
        StencilOp::Zero => glow::ZERO,
        StencilOp::Replace => glow::REPLACE,
        StencilOp::Increment => glow::INCR,
        StencilOp::Decrement => glow::DECR,
        StencilOp::Invert => glow::INVERT,
    }
}

fn clear_bits(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

fn location(location: u32) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location)
}

// =============================================================================
// GlBackend impl
// =============================================================================

impl GlBackend for GlowBackend {
    fn max_texture_units(&self) -> u32 {
        self.max_texture_units
    }

    fn max_color_attachments(&self) -> u32 {
        self.max_color_attachments
    }

    fn max_draw_buffers(&self) -> u32 {
        self.max_draw_buffers
    }

    fn create_object(&self, kind: ObjectKind) -> Result<GlName, String> {
        unsafe {
            Ok(match kind {
                ObjectKind::Texture => self.gl.create_texture()?.0.get(),
                ObjectKind::Sampler => self.gl.create_sampler()?.0.get(),
                ObjectKind::Renderbuffer => self.gl.create_renderbuffer()?.0.get(),
                ObjectKind::Framebuffer => self.gl.create_framebuffer()?.0.get(),
                ObjectKind::Program => self.gl.create_program()?.0.get(),
                ObjectKind::VertexArray => self.gl.create_vertex_array()?.0.get(),
                ObjectKind::Shader => {
                    return Err("shaders are created with create_shader".into());
                }
            })
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<GlName, String> {
        let stage = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        };
        unsafe { Ok(self.gl.create_shader(stage)?.0.get()) }
    }

    fn delete_object(&self, kind: ObjectKind, name: GlName) {
        let Some(name) = nz(name) else {
            return;
        };
        unsafe {
            match kind {
                ObjectKind::Texture => self.gl.delete_texture(glow::NativeTexture(name)),
                ObjectKind::Sampler => self.gl.delete_sampler(glow::NativeSampler(name)),
                ObjectKind::Renderbuffer => {
                    self.gl.delete_renderbuffer(glow::NativeRenderbuffer(name))
                }
                ObjectKind::Framebuffer => {
                    self.gl.delete_framebuffer(glow::NativeFramebuffer(name))
                }
                ObjectKind::Program => self.gl.delete_program(glow::NativeProgram(name)),
                ObjectKind::Shader => self.gl.delete_shader(glow::NativeShader(name)),
                ObjectKind::VertexArray => {
                    self.gl.delete_vertex_array(glow::NativeVertexArray(name))
                }
            }
        }
    }

    fn tex_storage_2d(
        &self,
        target: TextureTarget,
        levels: u32,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) {
        unsafe {
            self.gl.tex_storage_2d(
                target_enum(target),
                levels as i32,
                format_enum(format),
                width as i32,
                height as i32,
            );
        }
    }

    fn tex_storage_3d(
        &self,
        target: TextureTarget,
        levels: u32,
        format: TextureFormat,
        width: u32,
        height: u32,
        depth: u32,
    ) {
        unsafe {
            self.gl.tex_storage_3d(
                target_enum(target),
                levels as i32,
                format_enum(format),
                width as i32,
                height as i32,
                depth as i32,
            );
        }
    }

    fn tex_parameter(&self, target: TextureTarget, parameter: TextureParameter) {
        let (name, value) = parameter_pair(parameter);
        unsafe { self.gl.tex_parameter_i32(target_enum(target), name, value) }
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        unsafe { self.gl.generate_mipmap(target_enum(target)) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, target: TextureTarget, name: Option<GlName>) {
        unsafe {
            self.gl
                .bind_texture(target_enum(target), name.and_then(texture))
        }
    }

    fn bind_sampler(&self, unit: u32, sampler: Option<GlName>) {
        let sampler = sampler.and_then(nz).map(glow::NativeSampler);
        unsafe { self.gl.bind_sampler(unit, sampler) }
    }

    fn sampler_parameter(&self, sampler: GlName, parameter: TextureParameter) {
        let Some(sampler) = nz(sampler).map(glow::NativeSampler) else {
            return;
        };
        let (name, value) = parameter_pair(parameter);
        unsafe { self.gl.sampler_parameter_i32(sampler, name, value) }
    }

    fn shader_source(&self, shader: GlName, source: &str) {
        if let Some(shader) = nz(shader).map(glow::NativeShader) {
            unsafe { self.gl.shader_source(shader, source) }
        }
    }

    fn compile_shader(&self, shader: GlName) {
        if let Some(shader) = nz(shader).map(glow::NativeShader) {
            unsafe { self.gl.compile_shader(shader) }
        }
    }

    fn shader_compile_status(&self, shader: GlName) -> bool {
        nz(shader)
            .map(glow::NativeShader)
            .is_some_and(|shader| unsafe { self.gl.get_shader_compile_status(shader) })
    }

    fn shader_info_log(&self, shader: GlName) -> String {
        nz(shader)
            .map(glow::NativeShader)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn attach_shader(&self, program: GlName, shader: GlName) {
        if let (Some(p), Some(s)) = (nz(program), nz(shader)) {
            unsafe {
                self.gl
                    .attach_shader(glow::NativeProgram(p), glow::NativeShader(s))
            }
        }
    }

    fn detach_shader(&self, program: GlName, shader: GlName) {
        if let (Some(p), Some(s)) = (nz(program), nz(shader)) {
            unsafe {
                self.gl
                    .detach_shader(glow::NativeProgram(p), glow::NativeShader(s))
            }
        }
    }

    fn link_program(&self, program: GlName) {
        if let Some(program) = nz(program).map(glow::NativeProgram) {
            unsafe { self.gl.link_program(program) }
        }
    }

    fn program_link_status(&self, program: GlName) -> bool {
        nz(program)
            .map(glow::NativeProgram)
            .is_some_and(|program| unsafe { self.gl.get_program_link_status(program) })
    }

    fn program_info_log(&self, program: GlName) -> String {
        nz(program)
            .map(glow::NativeProgram)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<GlName>) {
        let program = program.and_then(nz).map(glow::NativeProgram);
        unsafe { self.gl.use_program(program) }
    }

    fn active_uniforms(&self, program: GlName) -> Vec<ActiveUniform> {
        let Some(program) = nz(program).map(glow::NativeProgram) else {
            return Vec::new();
        };
        unsafe {
            let count = self.gl.get_active_uniforms(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .map(|u| ActiveUniform {
                    name: u.name,
                    size: u.size.max(1) as u32,
                    utype: u.utype,
                })
                .collect()
        }
    }

    fn uniform_location(&self, program: GlName, name: &str) -> Option<u32> {
        let program = nz(program).map(glow::NativeProgram)?;
        unsafe { self.gl.get_uniform_location(program, name) }.map(|l| l.0)
    }

    fn set_uniform(&self, at: u32, value: &UniformValue) {
        let loc = location(at);
        let loc = Some(&loc);
        unsafe {
            match value {
                UniformValue::Float(v) => self.gl.uniform_1_f32(loc, *v),
                UniformValue::Int(v) => self.gl.uniform_1_i32(loc, *v),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(loc, *x, *y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(loc, *x, *y, *z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(loc, *x, *y, *z, *w),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(loc, false, m),
                UniformValue::FloatArray(v) => self.gl.uniform_1_f32_slice(loc, v),
                UniformValue::IntArray(v) => self.gl.uniform_1_i32_slice(loc, v),
            }
        }
    }

    fn bind_framebuffer(&self, framebuffer: Option<GlName>) {
        let framebuffer = framebuffer.and_then(nz).map(glow::NativeFramebuffer);
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer) }
    }

    fn framebuffer_texture(
        &self,
        attachment: Attachment,
        name: Option<GlName>,
        level: u32,
        layer: Option<u32>,
    ) {
        let attachment = attachment_enum(attachment);
        let tex = name.and_then(texture);
        unsafe {
            match layer {
                Some(layer) => self.gl.framebuffer_texture_layer(
                    glow::FRAMEBUFFER,
                    attachment,
                    tex,
                    level as i32,
                    layer as i32,
                ),
                None => self
                    .gl
                    .framebuffer_texture(glow::FRAMEBUFFER, attachment, tex, level as i32),
            }
        }
    }

    fn framebuffer_renderbuffer(&self, attachment: Attachment, renderbuffer: Option<GlName>) {
        let renderbuffer = renderbuffer.and_then(nz).map(glow::NativeRenderbuffer);
        unsafe {
            self.gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                attachment_enum(attachment),
                glow::RENDERBUFFER,
                renderbuffer,
            )
        }
    }

    fn draw_buffers(&self, slots: &[u32]) {
        let buffers: Vec<u32> = if slots.is_empty() {
            vec![glow::NONE]
        } else {
            slots.iter().map(|s| glow::COLOR_ATTACHMENT0 + s).collect()
        };
        unsafe { self.gl.draw_buffers(&buffers) }
    }

    fn read_buffer(&self, slot: Option<u32>) {
        let source = slot.map_or(glow::NONE, |s| glow::COLOR_ATTACHMENT0 + s);
        unsafe { self.gl.read_buffer(source) }
    }

    fn blit_framebuffer(&self, src: Rect2D, dst: Rect2D, filter: BlitFilter) {
        let filter = match filter {
            BlitFilter::Nearest => glow::NEAREST,
            BlitFilter::Linear => glow::LINEAR,
        };
        unsafe {
            self.gl.blit_framebuffer(
                src.x,
                src.y,
                src.max_x(),
                src.max_y(),
                dst.x,
                dst.y,
                dst.max_x(),
                dst.max_y(),
                glow::COLOR_BUFFER_BIT,
                filter,
            )
        }
    }

    fn check_framebuffer_status(&self) -> FramebufferStatus {
        match unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) } {
            glow::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
            other => FramebufferStatus::Incomplete(other),
        }
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_bits(mask)) }
    }

    fn viewport(&self, rect: Rect2D) {
        unsafe {
            self.gl
                .viewport(rect.x, rect.y, rect.width as i32, rect.height as i32)
        }
    }

    fn bind_renderbuffer(&self, renderbuffer: Option<GlName>) {
        let renderbuffer = renderbuffer.and_then(nz).map(glow::NativeRenderbuffer);
        unsafe { self.gl.bind_renderbuffer(glow::RENDERBUFFER, renderbuffer) }
    }

    fn renderbuffer_storage(&self, format: RenderbufferFormat, width: u32, height: u32) {
        let format = match format {
            RenderbufferFormat::Depth24Stencil8 => glow::DEPTH24_STENCIL8,
        };
        unsafe {
            self.gl
                .renderbuffer_storage(glow::RENDERBUFFER, format, width as i32, height as i32)
        }
    }

    fn enable(&self, capability: Capability) {
        unsafe { self.gl.enable(capability_enum(capability)) }
    }

    fn disable(&self, capability: Capability) {
        unsafe { self.gl.disable(capability_enum(capability)) }
    }

    fn stencil_func(&self, func: CompareFunc, reference: i32, mask: u32) {
        unsafe { self.gl.stencil_func(compare_enum(func), reference, mask) }
    }

    fn stencil_op(&self, stencil_fail: StencilOp, depth_fail: StencilOp, pass: StencilOp) {
        unsafe {
            self.gl.stencil_op(
                stencil_op_enum(stencil_fail),
                stencil_op_enum(depth_fail),
                stencil_op_enum(pass),
            )
        }
    }

    fn stencil_mask(&self, mask: u32) {
        unsafe { self.gl.stencil_mask(mask) }
    }

    fn color_mask(&self, r: bool, g: bool, b: bool, a: bool) {
        unsafe { self.gl.color_mask(r, g, b, a) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<GlName>) {
        let vertex_array = vertex_array.and_then(nz).map(glow::NativeVertexArray);
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn draw_arrays(&self, primitive: Primitive, first: u32, count: u32) {
        let mode = match primitive {
            Primitive::Triangles => glow::TRIANGLES,
            Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
        };
        unsafe { self.gl.draw_arrays(mode, first as i32, count as i32) }
    }
}
