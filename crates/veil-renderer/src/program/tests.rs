use super::*;
use crate::gl::{GlCall, RecordingBackend, TextureFormat};
use crate::test_support::recording_context;
use veil_common::Size2D;

const VERTEX: &str = "\
#version 410 core
uniform mat4 uModel;
void main() {}
";

const FRAGMENT: &str = "\
#version 410 core
uniform sampler2D uAlbedo;
uniform float uWeights[4];
uniform sampler2D uNormals;
uniform vec2 uDirection;
uniform sampler2DArray uLayers;
out vec4 fragColor;
void main() {}
";

const ALBEDO: UniformKey = UniformKey::new("uAlbedo");
const NORMALS: UniformKey = UniformKey::new("uNormals");
const LAYERS: UniformKey = UniformKey::new("uLayers");
const WEIGHTS: UniformKey = UniformKey::new("uWeights[0]");
const DIRECTION: UniformKey = UniformKey::new("uDirection");

fn build(ctx: &GpuContext) -> ShaderProgram {
    ShaderProgram::new(ctx, ShaderSources::new(VERTEX, FRAGMENT)).unwrap()
}

#[test]
fn samplers_get_units_in_reflection_order() {
    let (gl, ctx) = recording_context();
    let program = build(&ctx);

    assert_eq!(program.uniform(ALBEDO).unwrap().texture_unit, Some(0));
    assert_eq!(program.uniform(NORMALS).unwrap().texture_unit, Some(1));
    assert_eq!(program.uniform(LAYERS).unwrap().texture_unit, Some(2));
    assert_eq!(program.uniform(DIRECTION).unwrap().texture_unit, None);
    assert_eq!(program.sampler_count(), 3);

    let unit_writes: Vec<GlCall> = gl
        .calls()
        .into_iter()
        .filter(|c| matches!(c, GlCall::SetUniform(_, UniformValue::Int(_))))
        .collect();
    let albedo = program.uniform(ALBEDO).unwrap().location;
    let normals = program.uniform(NORMALS).unwrap().location;
    let layers = program.uniform(LAYERS).unwrap().location;
    assert_eq!(
        unit_writes,
        vec![
            GlCall::SetUniform(albedo, UniformValue::Int(0)),
            GlCall::SetUniform(normals, UniformValue::Int(1)),
            GlCall::SetUniform(layers, UniformValue::Int(2)),
        ]
    );
}

#[test]
fn reflection_records_types_and_array_sizes() {
    let (_gl, ctx) = recording_context();
    let program = build(&ctx);

    let weights = program.uniform(WEIGHTS).unwrap();
    assert_eq!(weights.kind, UniformType::Float);
    assert_eq!(weights.array_size, 4);
    assert_eq!(weights.name, "uWeights[0]");
    assert_eq!(
        program.uniform(LAYERS).unwrap().kind,
        UniformType::Sampler2DArray
    );

    let names: Vec<&str> = program.uniforms().iter().map(|u| u.name.as_str()).collect();
    assert_eq!(
        names,
        ["uModel", "uAlbedo", "uWeights[0]", "uNormals", "uDirection", "uLayers"]
    );
}

#[test]
fn link_binds_program_before_writing_units() {
    let (gl, ctx) = recording_context();
    let program = build(&ctx);
    let calls = gl.calls();
    let use_at = calls
        .iter()
        .position(|c| *c == GlCall::UseProgram(Some(program.name())))
        .unwrap();
    let first_write = calls
        .iter()
        .position(|c| matches!(c, GlCall::SetUniform(..)))
        .unwrap();
    assert!(use_at < first_write);
}

#[test]
fn stage_objects_are_detached_and_deleted() {
    let (gl, ctx) = recording_context();
    let program = build(&ctx);
    let calls = gl.calls();
    let detached = calls
        .iter()
        .filter(|c| matches!(c, GlCall::DetachShader(p, _) if *p == program.name()))
        .count();
    let deleted = calls
        .iter()
        .filter(|c| matches!(c, GlCall::DeleteObject(ObjectKind::Shader, _)))
        .count();
    assert_eq!(detached, 2);
    assert_eq!(deleted, 2);
}

#[test]
fn compile_failure_reports_stage_and_log() {
    let (gl, ctx) = recording_context();
    gl.fail_next_compile("0:3: 'vec5' : undeclared identifier");
    let err = ShaderProgram::new(&ctx, ShaderSources::new(VERTEX, FRAGMENT)).unwrap_err();
    assert_eq!(
        err,
        GlError::CompileError {
            stage: ShaderStage::Vertex,
            log: "0:3: 'vec5' : undeclared identifier".into(),
        }
    );
}

#[test]
fn link_failure_reports_log_and_releases_program() {
    let (gl, ctx) = recording_context();
    gl.fail_next_link("varying mismatch");
    let err = ShaderProgram::new(&ctx, ShaderSources::new(VERTEX, FRAGMENT)).unwrap_err();
    assert_eq!(err, GlError::LinkError("varying mismatch".into()));
    assert!(gl
        .calls()
        .iter()
        .any(|c| matches!(c, GlCall::DeleteObject(ObjectKind::Program, _))));
}

#[test]
fn geometry_stage_is_compiled_when_present() {
    let (gl, ctx) = recording_context();
    let sources = ShaderSources {
        vertex: VERTEX,
        fragment: FRAGMENT,
        geometry: Some("#version 410 core\nvoid main() {}"),
    };
    let _program = ShaderProgram::new(&ctx, sources).unwrap();
    assert!(gl
        .calls()
        .iter()
        .any(|c| matches!(c, GlCall::CreateShader(ShaderStage::Geometry, _))));
}

#[test]
fn too_many_samplers_exhaust_units() {
    let gl = std::rc::Rc::new(RecordingBackend::with_limits(2, 8, 8));
    let ctx = GpuContext::new(gl.clone()).unwrap();
    let err = ShaderProgram::new(&ctx, ShaderSources::new(VERTEX, FRAGMENT)).unwrap_err();
    assert!(matches!(err, GlError::ResourceExhausted(msg) if msg.contains("uLayers")));
}

#[test]
fn colliding_names_are_rejected() {
    assert_eq!(
        UniformKey::new("plumless"),
        UniformKey::new("buckeroo"),
        "known CRC-32 collision"
    );
    let (_gl, ctx) = recording_context();
    let fragment = "uniform float plumless;\nuniform float buckeroo;\n";
    let err = ShaderProgram::new(&ctx, ShaderSources::new(VERTEX, fragment)).unwrap_err();
    assert!(matches!(err, GlError::InvalidArgument(msg) if msg.contains("plumless")));
}

#[test]
fn unknown_key_is_not_found() {
    let (_gl, ctx) = recording_context();
    let program = build(&ctx);
    let err = program
        .set_uniform_float(UniformKey::new("uMissing"), 1.0)
        .unwrap_err();
    assert!(matches!(err, GlError::NotFound(_)));
}

#[test]
fn setters_write_to_reflected_location() {
    let (gl, ctx) = recording_context();
    let program = build(&ctx);
    gl.clear_calls();

    program.set_uniform_vector2(DIRECTION, [1.0, 0.0]).unwrap();
    program
        .set_uniform_float_array(WEIGHTS, &[0.5, 0.25])
        .unwrap();
    let direction = program.uniform(DIRECTION).unwrap().location;
    let weights = program.uniform(WEIGHTS).unwrap().location;
    assert_eq!(
        gl.calls(),
        vec![
            GlCall::SetUniform(direction, UniformValue::Vec2([1.0, 0.0])),
            GlCall::SetUniform(weights, UniformValue::FloatArray(vec![0.5, 0.25])),
        ]
    );
}

#[test]
fn array_longer_than_declaration_is_rejected() {
    let (gl, ctx) = recording_context();
    let program = build(&ctx);
    gl.clear_calls();
    let err = program
        .set_uniform_float_array(WEIGHTS, &[0.1; 5])
        .unwrap_err();
    assert!(matches!(err, GlError::InvalidArgument(_)));
    assert!(gl.calls().is_empty());
    program.set_uniform_float_array(WEIGHTS, &[0.1; 4]).unwrap();
}

#[test]
fn texture_outside_scope_is_invalid_state() {
    let (_gl, mut ctx) = recording_context();
    let program = build(&ctx);
    let texture = Texture::new_2d(&mut ctx, TextureFormat::Rgba8, Size2D::new(4, 4)).unwrap();
    let err = program
        .set_uniform_texture(ctx.texture_units_mut(), ALBEDO, &texture, None)
        .unwrap_err();
    assert!(matches!(err, GlError::InvalidState(_)));
}

#[test]
fn texture_on_non_sampler_is_type_mismatch() {
    let (_gl, mut ctx) = recording_context();
    let program = build(&ctx);
    let texture = Texture::new_2d(&mut ctx, TextureFormat::Rgba8, Size2D::new(4, 4)).unwrap();
    let err = program
        .with_sampler_scope(ctx.texture_units_mut(), |scope| {
            scope.set_texture(DIRECTION, &texture, None)
        })
        .unwrap_err();
    assert!(matches!(err, GlError::TypeMismatch(_)));
}

#[test]
fn scope_binds_texture_and_sampler_to_uniform_unit() {
    let (gl, mut ctx) = recording_context();
    let program = build(&ctx);
    let texture = Texture::new_2d(&mut ctx, TextureFormat::Rgba8, Size2D::new(4, 4)).unwrap();
    let sampler = Sampler::nearest_clamp(&ctx).unwrap();
    gl.clear_calls();

    program
        .with_sampler_scope(ctx.texture_units_mut(), |scope| {
            scope.set_texture(NORMALS, &texture, Some(&sampler))
        })
        .unwrap();

    let units = ctx.texture_units();
    assert_eq!(units.bound_texture(1), Some(texture.key()));
    assert_eq!(units.bound_sampler(1), Some(sampler.key()));
    assert_eq!(units.active_texture_unit(), units.maximum_texture_units() - 1);
    assert!(!program.is_sampler_mutable());
}

#[test]
fn opening_scope_unbinds_all_samplers() {
    let (gl, mut ctx) = recording_context();
    let program = build(&ctx);
    let sampler = Sampler::linear_clamp(&ctx).unwrap();
    ctx.texture_units_mut().bind_sampler(&sampler, 7).unwrap();
    gl.clear_calls();

    let scope = program.sampler_scope(ctx.texture_units_mut());
    assert!(program.is_sampler_mutable());
    drop(scope);
    assert_eq!(
        gl.calls(),
        vec![GlCall::BindSampler(7, None), GlCall::ActiveTexture(15)]
    );
}

#[test]
fn sentinel_unit_active_after_failing_scope() {
    let (_gl, mut ctx) = recording_context();
    let program = build(&ctx);
    let texture = Texture::new_2d(&mut ctx, TextureFormat::Rgba8, Size2D::new(4, 4)).unwrap();

    let result = program.with_sampler_scope(ctx.texture_units_mut(), |scope| {
        scope.set_texture(ALBEDO, &texture, None)?;
        scope.set_texture(UniformKey::new("uMissing"), &texture, None)
    });
    assert!(matches!(result, Err(GlError::NotFound(_))));
    assert_eq!(ctx.texture_units().active_texture_unit(), 15);
    assert!(!program.is_sampler_mutable());
}

#[test]
fn sentinel_unit_active_after_panicking_scope() {
    let (_gl, mut ctx) = recording_context();
    let program = build(&ctx);
    let units = ctx.texture_units_mut();
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = program.with_sampler_scope(units, |_scope| -> GlResult<()> {
            panic!("body failed");
        });
    }));
    assert!(outcome.is_err());
    assert_eq!(ctx.texture_units().active_texture_unit(), 15);
    assert!(!program.is_sampler_mutable());
}
