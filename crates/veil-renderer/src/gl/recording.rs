//! Headless backend that records driver calls in issue order.
//!
//! Names are handed out sequentially starting at 1. Uniform reflection is
//! emulated by scanning `uniform <type> <name>[N];` declarations of the
//! attached shader sources in attachment order, so tests can assert the
//! exact call stream a real driver would receive.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use veil_common::Rect2D;

use super::backend::*;

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateObject(ObjectKind, GlName),
    CreateShader(ShaderStage, GlName),
    DeleteObject(ObjectKind, GlName),
    TexStorage2D {
        target: TextureTarget,
        levels: u32,
        format: TextureFormat,
        width: u32,
        height: u32,
    },
    TexStorage3D {
        target: TextureTarget,
        levels: u32,
        format: TextureFormat,
        width: u32,
        height: u32,
        depth: u32,
    },
    TexParameter(TextureTarget, TextureParameter),
    GenerateMipmap(TextureTarget),
    ActiveTexture(u32),
    BindTexture(TextureTarget, Option<GlName>),
    BindSampler(u32, Option<GlName>),
    SamplerParameter(GlName, TextureParameter),
    ShaderSource(GlName),
    CompileShader(GlName),
    AttachShader(GlName, GlName),
    DetachShader(GlName, GlName),
    LinkProgram(GlName),
    UseProgram(Option<GlName>),
    SetUniform(u32, UniformValue),
    BindFramebuffer(Option<GlName>),
    FramebufferTexture {
        attachment: Attachment,
        texture: Option<GlName>,
        level: u32,
        layer: Option<u32>,
    },
    FramebufferRenderbuffer(Attachment, Option<GlName>),
    DrawBuffers(Vec<u32>),
    ReadBuffer(Option<u32>),
    BlitFramebuffer {
        src: Rect2D,
        dst: Rect2D,
        filter: BlitFilter,
    },
    Clear(ClearMask),
    Viewport(Rect2D),
    BindRenderbuffer(Option<GlName>),
    RenderbufferStorage {
        format: RenderbufferFormat,
        width: u32,
        height: u32,
    },
    Enable(Capability),
    Disable(Capability),
    StencilFunc(CompareFunc, i32, u32),
    StencilOp(StencilOp, StencilOp, StencilOp),
    StencilMask(u32),
    ColorMask(bool, bool, bool, bool),
    BindVertexArray(Option<GlName>),
    DrawArrays(Primitive, u32, u32),
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    texture_units: u32,
    color_attachments: u32,
    draw_buffers: u32,
}

#[derive(Debug, Default)]
struct ShaderRecord {
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct ProgramRecord {
    attached: Vec<GlName>,
    linked: bool,
    log: String,
    uniforms: Vec<ActiveUniform>,
}

/// Mock driver used by every renderer test.
pub struct RecordingBackend {
    limits: Limits,
    next_name: Cell<GlName>,
    calls: RefCell<Vec<GlCall>>,
    shaders: RefCell<HashMap<GlName, ShaderRecord>>,
    programs: RefCell<HashMap<GlName, ProgramRecord>>,
    fail_create: RefCell<Option<String>>,
    fail_compile: RefCell<Option<String>>,
    fail_link: RefCell<Option<String>>,
    framebuffer_status: Cell<FramebufferStatus>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    /// 16 texture units, 8 color attachments, 8 draw buffers.
    pub fn new() -> Self {
        Self::with_limits(16, 8, 8)
    }

    pub fn with_limits(texture_units: u32, color_attachments: u32, draw_buffers: u32) -> Self {
        Self {
            limits: Limits {
                texture_units,
                color_attachments,
                draw_buffers,
            },
            next_name: Cell::new(1),
            calls: RefCell::new(Vec::new()),
            shaders: RefCell::new(HashMap::new()),
            programs: RefCell::new(HashMap::new()),
            fail_create: RefCell::new(None),
            fail_compile: RefCell::new(None),
            fail_link: RefCell::new(None),
            framebuffer_status: Cell::new(FramebufferStatus::Complete),
        }
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// The next object or shader creation fails with `message`.
    pub fn fail_next_create(&self, message: &str) {
        *self.fail_create.borrow_mut() = Some(message.to_string());
    }

    /// The next shader compilation fails with `log`.
    pub fn fail_next_compile(&self, log: &str) {
        *self.fail_compile.borrow_mut() = Some(log.to_string());
    }

    /// The next program link fails with `log`.
    pub fn fail_next_link(&self, log: &str) {
        *self.fail_link.borrow_mut() = Some(log.to_string());
    }

    pub fn set_framebuffer_status(&self, status: FramebufferStatus) {
        self.framebuffer_status.set(status);
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate_name(&self) -> Result<GlName, String> {
        if let Some(message) = self.fail_create.borrow_mut().take() {
            return Err(message);
        }
        let name = self.next_name.get();
        self.next_name.set(name + 1);
        Ok(name)
    }
}

// =============================================================================
// Uniform declaration scanning
// =============================================================================

fn glsl_type_enum(type_name: &str) -> Option<u32> {
    Some(match type_name {
        "float" => glow::FLOAT,
        "int" => glow::INT,
        "uint" => glow::UNSIGNED_INT,
        "bool" => glow::BOOL,
        "vec2" => glow::FLOAT_VEC2,
        "vec3" => glow::FLOAT_VEC3,
        "vec4" => glow::FLOAT_VEC4,
        "ivec2" => glow::INT_VEC2,
        "ivec3" => glow::INT_VEC3,
        "ivec4" => glow::INT_VEC4,
        "mat3" => glow::FLOAT_MAT3,
        "mat4" => glow::FLOAT_MAT4,
        "sampler2D" => glow::SAMPLER_2D,
        "sampler3D" => glow::SAMPLER_3D,
        "samplerCube" => glow::SAMPLER_CUBE,
        "sampler2DShadow" => glow::SAMPLER_2D_SHADOW,
        "sampler2DArray" => glow::SAMPLER_2D_ARRAY,
        "isampler2D" => glow::INT_SAMPLER_2D,
        "usampler2D" => glow::UNSIGNED_INT_SAMPLER_2D,
        _ => return None,
    })
}

/// Parse `uniform <type> <name>[N];` lines the way a driver reports them.
fn scan_uniforms(source: &str, out: &mut Vec<ActiveUniform>) {
    for line in source.lines() {
        let Some(rest) = line.trim().strip_prefix("uniform ") else {
            continue;
        };
        let mut parts = rest.split_whitespace();
        let (Some(type_name), Some(declarator)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Some(utype) = glsl_type_enum(type_name) else {
            continue;
        };
        let declarator = declarator.trim_end_matches(';');
        let (name, size) = match declarator.split_once('[') {
            Some((base, len)) => {
                let len = len.trim_end_matches(']').parse::<u32>().unwrap_or(1);
                (format!("{base}[0]"), len)
            }
            None => (declarator.to_string(), 1),
        };
        if out.iter().all(|u| u.name != name) {
            out.push(ActiveUniform { name, size, utype });
        }
    }
}

// =============================================================================
// GlBackend impl
// =============================================================================

impl GlBackend for RecordingBackend {
    fn max_texture_units(&self) -> u32 {
        self.limits.texture_units
    }

    fn max_color_attachments(&self) -> u32 {
        self.limits.color_attachments
    }

    fn max_draw_buffers(&self) -> u32 {
        self.limits.draw_buffers
    }

    fn create_object(&self, kind: ObjectKind) -> Result<GlName, String> {
        let name = self.allocate_name()?;
        if kind == ObjectKind::Program {
            self.programs
                .borrow_mut()
                .insert(name, ProgramRecord::default());
        }
        self.record(GlCall::CreateObject(kind, name));
        Ok(name)
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<GlName, String> {
        let name = self.allocate_name()?;
        self.shaders.borrow_mut().insert(name, ShaderRecord::default());
        self.record(GlCall::CreateShader(stage, name));
        Ok(name)
    }

    fn delete_object(&self, kind: ObjectKind, name: GlName) {
        match kind {
            ObjectKind::Shader => {
                self.shaders.borrow_mut().remove(&name);
            }
            ObjectKind::Program => {
                self.programs.borrow_mut().remove(&name);
            }
            _ => {}
        }
        self.record(GlCall::DeleteObject(kind, name));
    }

    fn tex_storage_2d(
        &self,
        target: TextureTarget,
        levels: u32,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) {
        self.record(GlCall::TexStorage2D {
            target,
            levels,
            format,
            width,
            height,
        });
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
        self.record(GlCall::TexStorage3D {
            target,
            levels,
            format,
            width,
            height,
            depth,
        });
    }

    fn tex_parameter(&self, target: TextureTarget, parameter: TextureParameter) {
        self.record(GlCall::TexParameter(target, parameter));
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        self.record(GlCall::GenerateMipmap(target));
    }

    fn active_texture(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<GlName>) {
        self.record(GlCall::BindTexture(target, texture));
    }

    fn bind_sampler(&self, unit: u32, sampler: Option<GlName>) {
        self.record(GlCall::BindSampler(unit, sampler));
    }

    fn sampler_parameter(&self, sampler: GlName, parameter: TextureParameter) {
        self.record(GlCall::SamplerParameter(sampler, parameter));
    }

    fn shader_source(&self, shader: GlName, source: &str) {
        if let Some(record) = self.shaders.borrow_mut().get_mut(&shader) {
            record.source = source.to_string();
        }
        self.record(GlCall::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: GlName) {
        let failure = self.fail_compile.borrow_mut().take();
        if let Some(record) = self.shaders.borrow_mut().get_mut(&shader) {
            record.compiled = failure.is_none();
            record.log = failure.unwrap_or_default();
        }
        self.record(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: GlName) -> bool {
        self.shaders
            .borrow()
            .get(&shader)
            .is_some_and(|record| record.compiled)
    }

    fn shader_info_log(&self, shader: GlName) -> String {
        self.shaders
            .borrow()
            .get(&shader)
            .map(|record| record.log.clone())
            .unwrap_or_default()
    }

    fn attach_shader(&self, program: GlName, shader: GlName) {
        if let Some(record) = self.programs.borrow_mut().get_mut(&program) {
            record.attached.push(shader);
        }
        self.record(GlCall::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: GlName, shader: GlName) {
        if let Some(record) = self.programs.borrow_mut().get_mut(&program) {
            record.attached.retain(|&s| s != shader);
        }
        self.record(GlCall::DetachShader(program, shader));
    }

    fn link_program(&self, program: GlName) {
        let failure = self.fail_link.borrow_mut().take();
        let shaders = self.shaders.borrow();
        if let Some(record) = self.programs.borrow_mut().get_mut(&program) {
            record.uniforms.clear();
            match failure {
                Some(log) => {
                    record.linked = false;
                    record.log = log;
                }
                None => {
                    for shader in &record.attached {
                        if let Some(source) = shaders.get(shader) {
                            scan_uniforms(&source.source, &mut record.uniforms);
                        }
                    }
                    record.linked = true;
                    record.log.clear();
                }
            }
        }
        self.record(GlCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: GlName) -> bool {
        self.programs
            .borrow()
            .get(&program)
            .is_some_and(|record| record.linked)
    }

    fn program_info_log(&self, program: GlName) -> String {
        self.programs
            .borrow()
            .get(&program)
            .map(|record| record.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<GlName>) {
        self.record(GlCall::UseProgram(program));
    }

    fn active_uniforms(&self, program: GlName) -> Vec<ActiveUniform> {
        self.programs
            .borrow()
            .get(&program)
            .map(|record| record.uniforms.clone())
            .unwrap_or_default()
    }

    fn uniform_location(&self, program: GlName, name: &str) -> Option<u32> {
        let programs = self.programs.borrow();
        let record = programs.get(&program)?;
        record
            .uniforms
            .iter()
            .position(|u| u.name == name || u.name.strip_suffix("[0]") == Some(name))
            .map(|index| index as u32)
    }

    fn set_uniform(&self, location: u32, value: &UniformValue) {
        self.record(GlCall::SetUniform(location, value.clone()));
    }

    fn bind_framebuffer(&self, framebuffer: Option<GlName>) {
        self.record(GlCall::BindFramebuffer(framebuffer));
    }

    fn framebuffer_texture(
        &self,
        attachment: Attachment,
        texture: Option<GlName>,
        level: u32,
        layer: Option<u32>,
    ) {
        self.record(GlCall::FramebufferTexture {
            attachment,
            texture,
            level,
            layer,
        });
    }

    fn framebuffer_renderbuffer(&self, attachment: Attachment, renderbuffer: Option<GlName>) {
        self.record(GlCall::FramebufferRenderbuffer(attachment, renderbuffer));
    }

    fn draw_buffers(&self, slots: &[u32]) {
        self.record(GlCall::DrawBuffers(slots.to_vec()));
    }

    fn read_buffer(&self, slot: Option<u32>) {
        self.record(GlCall::ReadBuffer(slot));
    }

    fn blit_framebuffer(&self, src: Rect2D, dst: Rect2D, filter: BlitFilter) {
        self.record(GlCall::BlitFramebuffer { src, dst, filter });
    }

    fn check_framebuffer_status(&self) -> FramebufferStatus {
        self.framebuffer_status.get()
    }

    fn clear(&self, mask: ClearMask) {
        self.record(GlCall::Clear(mask));
    }

    fn viewport(&self, rect: Rect2D) {
        self.record(GlCall::Viewport(rect));
    }

    fn bind_renderbuffer(&self, renderbuffer: Option<GlName>) {
        self.record(GlCall::BindRenderbuffer(renderbuffer));
    }

    fn renderbuffer_storage(&self, format: RenderbufferFormat, width: u32, height: u32) {
        self.record(GlCall::RenderbufferStorage {
            format,
            width,
            height,
        });
    }

    fn enable(&self, capability: Capability) {
        self.record(GlCall::Enable(capability));
    }

    fn disable(&self, capability: Capability) {
        self.record(GlCall::Disable(capability));
    }

    fn stencil_func(&self, func: CompareFunc, reference: i32, mask: u32) {
        self.record(GlCall::StencilFunc(func, reference, mask));
    }

    fn stencil_op(&self, stencil_fail: StencilOp, depth_fail: StencilOp, pass: StencilOp) {
        self.record(GlCall::StencilOp(stencil_fail, depth_fail, pass));
    }

    fn stencil_mask(&self, mask: u32) {
        self.record(GlCall::StencilMask(mask));
    }

    fn color_mask(&self, r: bool, g: bool, b: bool, a: bool) {
        self.record(GlCall::ColorMask(r, g, b, a));
    }

    fn bind_vertex_array(&self, vertex_array: Option<GlName>) {
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn draw_arrays(&self, primitive: Primitive, first: u32, count: u32) {
        self.record(GlCall::DrawArrays(primitive, first, count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sequential() {
        let gl = RecordingBackend::new();
        assert_eq!(gl.create_object(ObjectKind::Texture), Ok(1));
        assert_eq!(gl.create_shader(ShaderStage::Vertex), Ok(2));
        assert_eq!(gl.create_object(ObjectKind::Framebuffer), Ok(3));
    }

    #[test]
    fn scans_uniforms_in_attach_order() {
        let gl = RecordingBackend::new();
        let program = gl.create_object(ObjectKind::Program).unwrap();
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        let fs = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(vs, "uniform vec2 uRenderTargetSize;\nvoid main() {}");
        gl.shader_source(
            fs,
            "uniform sampler2D uTexture;\nuniform float uKernelWeights[32];\nuniform vec2 uRenderTargetSize;",
        );
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        let uniforms = gl.active_uniforms(program);
        let names: Vec<&str> = uniforms.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(
            names,
            ["uRenderTargetSize", "uTexture", "uKernelWeights[0]"]
        );
        assert_eq!(uniforms[2].size, 32);
        assert_eq!(uniforms[1].utype, glow::SAMPLER_2D);
        assert_eq!(gl.uniform_location(program, "uKernelWeights[0]"), Some(2));
        assert_eq!(gl.uniform_location(program, "uKernelWeights"), Some(2));
        assert_eq!(gl.uniform_location(program, "uMissing"), None);
    }

    #[test]
    fn scripted_link_failure() {
        let gl = RecordingBackend::new();
        let program = gl.create_object(ObjectKind::Program).unwrap();
        gl.fail_next_link("missing main");
        gl.link_program(program);
        assert!(!gl.program_link_status(program));
        assert_eq!(gl.program_info_log(program), "missing main");

        gl.link_program(program);
        assert!(gl.program_link_status(program));
    }

    #[test]
    fn scripted_compile_failure() {
        let gl = RecordingBackend::new();
        let shader = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.fail_next_compile("0:1: error");
        gl.compile_shader(shader);
        assert!(!gl.shader_compile_status(shader));
        assert_eq!(gl.shader_info_log(shader), "0:1: error");
    }

    #[test]
    fn take_calls_drains() {
        let gl = RecordingBackend::new();
        gl.active_texture(3);
        assert_eq!(gl.take_calls(), vec![GlCall::ActiveTexture(3)]);
        assert!(gl.calls().is_empty());
    }
}
