//! Linked shader programs with reflected uniforms.
//!
//! Reflection runs once after linking. Every sampler uniform is given its
//! own texture unit, in the order the driver enumerates active uniforms,
//! and that unit is written to the uniform immediately. Texture uniforms
//! are afterwards only rebindable inside a [`SamplerScope`].

mod sampler_scope;
mod uniform;

#[cfg(test)]
mod tests;

pub use sampler_scope::SamplerScope;
pub use uniform::{UniformDescriptor, UniformKey, UniformType};

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info};

use crate::context::GpuContext;
use crate::error::{GlError, GlResult};
use crate::gl::{GlBackend, GlHandle, GlName, ObjectKey, ObjectKind, ShaderStage, UniformValue};
use crate::texture::{Sampler, Texture};
use crate::texture_units::{TextureUnit, TextureUnitCache};

/// GLSL sources for one program.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
    pub geometry: Option<&'a str>,
}

impl<'a> ShaderSources<'a> {
    pub fn new(vertex: &'a str, fragment: &'a str) -> Self {
        Self {
            vertex,
            fragment,
            geometry: None,
        }
    }
}

pub struct ShaderProgram {
    handle: GlHandle,
    uniforms: Vec<UniformDescriptor>,
    by_key: HashMap<UniformKey, usize>,
    sampler_mutable: Cell<bool>,
}

impl ShaderProgram {
    /// Compile, link and reflect.
    pub fn new(ctx: &GpuContext, sources: ShaderSources<'_>) -> GlResult<Self> {
        let gl = ctx.gl();
        let handle = GlHandle::create(gl, ObjectKind::Program)?;

        let mut stages = vec![
            compile(gl, ShaderStage::Vertex, sources.vertex)?,
            compile(gl, ShaderStage::Fragment, sources.fragment)?,
        ];
        if let Some(geometry) = sources.geometry {
            stages.push(compile(gl, ShaderStage::Geometry, geometry)?);
        }

        for shader in &stages {
            gl.attach_shader(handle.name(), shader.name());
        }
        gl.link_program(handle.name());
        let linked = gl.program_link_status(handle.name());
        for shader in &stages {
            gl.detach_shader(handle.name(), shader.name());
        }
        drop(stages);

        if !linked {
            return Err(GlError::LinkError(gl.program_info_log(handle.name())));
        }

        let mut program = Self {
            handle,
            uniforms: Vec::new(),
            by_key: HashMap::new(),
            sampler_mutable: Cell::new(false),
        };
        program.bind();
        program.reflect_uniforms(ctx.texture_units().maximum_texture_units())?;

        info!(
            program = %program.key(),
            uniforms = program.uniforms.len(),
            samplers = program.sampler_count(),
            "linked shader program"
        );
        Ok(program)
    }

    fn reflect_uniforms(&mut self, max_units: u32) -> GlResult<()> {
        let gl = Rc::clone(self.handle.gl());
        let mut next_unit: TextureUnit = 0;

        for active in gl.active_uniforms(self.name()) {
            let Some(location) = gl.uniform_location(self.name(), &active.name) else {
                continue;
            };
            let key = UniformKey::new(&active.name);
            if let Some(&index) = self.by_key.get(&key) {
                return Err(GlError::InvalidArgument(format!(
                    "uniforms '{}' and '{}' hash to the same key {key}",
                    self.uniforms[index].name, active.name
                )));
            }

            let kind = UniformType::from_gl(active.utype);
            let texture_unit = if kind.is_sampler() {
                if next_unit >= max_units {
                    return Err(GlError::ResourceExhausted(format!(
                        "sampler '{}' needs unit {next_unit} but only {max_units} texture units exist",
                        active.name
                    )));
                }
                gl.set_uniform(location, &UniformValue::Int(next_unit as i32));
                next_unit += 1;
                Some(next_unit - 1)
            } else {
                None
            };

            debug!(name = %active.name, location, ?kind, ?texture_unit, "reflected uniform");
            self.by_key.insert(key, self.uniforms.len());
            self.uniforms.push(UniformDescriptor {
                location,
                kind,
                array_size: active.size,
                name: active.name,
                texture_unit,
            });
        }
        Ok(())
    }

    pub fn name(&self) -> GlName {
        self.handle.name()
    }

    pub fn key(&self) -> ObjectKey {
        self.handle.key()
    }

    /// Make this the current program.
    pub fn bind(&self) {
        self.handle.gl().use_program(Some(self.name()));
    }

    pub fn uniform(&self, key: UniformKey) -> Option<&UniformDescriptor> {
        self.by_key.get(&key).map(|&index| &self.uniforms[index])
    }

    /// Uniforms in reflection order.
    pub fn uniforms(&self) -> &[UniformDescriptor] {
        &self.uniforms
    }

    pub fn sampler_count(&self) -> usize {
        self.uniforms
            .iter()
            .filter(|u| u.texture_unit.is_some())
            .count()
    }

    pub fn is_sampler_mutable(&self) -> bool {
        self.sampler_mutable.get()
    }

    fn lookup(&self, key: UniformKey) -> GlResult<&UniformDescriptor> {
        self.uniform(key)
            .ok_or_else(|| GlError::NotFound(format!("uniform {key} in program {}", self.key())))
    }

    fn write(&self, key: UniformKey, value: UniformValue) -> GlResult<()> {
        let uniform = self.lookup(key)?;
        let len = match &value {
            UniformValue::FloatArray(v) => v.len(),
            UniformValue::IntArray(v) => v.len(),
            _ => 1,
        };
        if len > uniform.array_size as usize {
            return Err(GlError::InvalidArgument(format!(
                "{len} values written to '{}' declared with {} elements",
                uniform.name, uniform.array_size
            )));
        }
        self.handle.gl().set_uniform(uniform.location, &value);
        Ok(())
    }

    // The setters below expect this program to be bound.

    pub fn set_uniform_float(&self, key: UniformKey, value: f32) -> GlResult<()> {
        self.write(key, UniformValue::Float(value))
    }

    pub fn set_uniform_integer(&self, key: UniformKey, value: i32) -> GlResult<()> {
        self.write(key, UniformValue::Int(value))
    }

    pub fn set_uniform_vector2(&self, key: UniformKey, value: [f32; 2]) -> GlResult<()> {
        self.write(key, UniformValue::Vec2(value))
    }

    pub fn set_uniform_vector3(&self, key: UniformKey, value: [f32; 3]) -> GlResult<()> {
        self.write(key, UniformValue::Vec3(value))
    }

    pub fn set_uniform_vector4(&self, key: UniformKey, value: [f32; 4]) -> GlResult<()> {
        self.write(key, UniformValue::Vec4(value))
    }

    /// Column-major 4x4 matrix.
    pub fn set_uniform_matrix4(&self, key: UniformKey, value: &[f32; 16]) -> GlResult<()> {
        self.write(key, UniformValue::Mat4(*value))
    }

    pub fn set_uniform_float_array(&self, key: UniformKey, values: &[f32]) -> GlResult<()> {
        self.write(key, UniformValue::FloatArray(values.to_vec()))
    }

    pub fn set_uniform_integer_array(&self, key: UniformKey, values: &[i32]) -> GlResult<()> {
        self.write(key, UniformValue::IntArray(values.to_vec()))
    }

    /// Bind `texture` to the unit reserved for sampler uniform `key`.
    ///
    /// Only valid while a [`SamplerScope`] on this program is open.
    pub fn set_uniform_texture(
        &self,
        units: &mut TextureUnitCache,
        key: UniformKey,
        texture: &Texture,
        sampler: Option<&Sampler>,
    ) -> GlResult<()> {
        let uniform = self.lookup(key)?;
        let Some(unit) = uniform.texture_unit else {
            return Err(GlError::TypeMismatch(format!(
                "uniform '{}' is {:?}, not a sampler",
                uniform.name, uniform.kind
            )));
        };
        if !self.sampler_mutable.get() {
            return Err(GlError::InvalidState(format!(
                "texture for '{}' set outside a sampler scope",
                uniform.name
            )));
        }
        units.bind_texture(texture, unit)?;
        if let Some(sampler) = sampler {
            units.bind_sampler(sampler, unit)?;
        }
        Ok(())
    }

    /// Open a sampler scope. See [`SamplerScope`].
    pub fn sampler_scope<'a>(&'a self, units: &'a mut TextureUnitCache) -> SamplerScope<'a> {
        SamplerScope::open(self, units)
    }

    /// Run `body` inside a sampler scope; the scope closes on every exit path.
    pub fn with_sampler_scope<R>(
        &self,
        units: &mut TextureUnitCache,
        body: impl FnOnce(&mut SamplerScope<'_>) -> GlResult<R>,
    ) -> GlResult<R> {
        let mut scope = self.sampler_scope(units);
        body(&mut scope)
    }
}

fn compile(gl: &Rc<dyn GlBackend>, stage: ShaderStage, source: &str) -> GlResult<GlHandle> {
    let shader = GlHandle::create_shader(gl, stage)?;
    gl.shader_source(shader.name(), source);
    gl.compile_shader(shader.name());
    if !gl.shader_compile_status(shader.name()) {
        return Err(GlError::CompileError {
            stage,
            log: gl.shader_info_log(shader.name()),
        });
    }
    Ok(shader)
}

impl std::fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("handle", &self.handle)
            .field("uniforms", &self.uniforms)
            .finish()
    }
}
