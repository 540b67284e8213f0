use super::*;
use crate::gl::{GlCall, GlName, Primitive, UniformValue};
use crate::test_support::recording_context;

const SIZE: Size2D = Size2D::new(64, 64);

struct Scene {
    image: Texture,
    _target: Texture,
    framebuffer: Framebuffer,
    _depth_stencil: Renderbuffer,
}

fn scene(ctx: &mut GpuContext) -> Scene {
    let image = Texture::new_2d(ctx, TextureFormat::Rgba8, SIZE).unwrap();
    let target = Texture::new_2d(ctx, TextureFormat::Rgba8, SIZE).unwrap();
    let depth_stencil = Renderbuffer::new_depth_stencil(ctx, SIZE).unwrap();
    let mut framebuffer = Framebuffer::new(ctx, SIZE).unwrap();
    framebuffer
        .attach_color_texture(&target, 0, ColorAttachment::Automatic)
        .unwrap();
    framebuffer
        .attach_depth_stencil_renderbuffer(&depth_stencil)
        .unwrap();
    Scene {
        image,
        _target: target,
        framebuffer,
        _depth_stencil: depth_stencil,
    }
}

#[derive(Debug, PartialEq)]
enum Event {
    Direction([f32; 2]),
    Bind(GlName),
    Draw,
}

/// Direction uploads, framebuffer binds and draws, in call order.
fn pass_events(calls: &[GlCall], program: &ShaderProgram) -> Vec<Event> {
    let direction = program.uniform(BLUR_DIRECTION).unwrap().location;
    calls
        .iter()
        .filter_map(|call| match call {
            GlCall::SetUniform(location, UniformValue::Vec2(v)) if *location == direction => {
                Some(Event::Direction(*v))
            }
            GlCall::BindFramebuffer(Some(name)) => Some(Event::Bind(*name)),
            GlCall::DrawArrays(Primitive::TriangleStrip, 0, 4) => Some(Event::Draw),
            _ => None,
        })
        .collect()
}

#[test]
fn construction_attaches_intermediate_image() {
    let (_gl, mut ctx) = recording_context();
    let blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let fb = blur.intermediate_framebuffer();
    assert_eq!(fb.size(), SIZE);
    assert_eq!(fb.color_slot_of(blur.intermediate_image()), Some(0));
    assert!(fb.has_depth_stencil());
    assert_eq!(blur.kernel_recomputations(), 0);
}

#[test]
fn blur_draws_horizontal_then_vertical() {
    let (gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let scene = scene(&mut ctx);
    gl.clear_calls();

    blur.blur(
        &mut ctx,
        &scene.image,
        &scene.framebuffer,
        &BlurConfiguration::default(),
    )
    .unwrap();

    let calls = gl.calls();
    assert_eq!(
        pass_events(&calls, &blur.full_screen),
        vec![
            Event::Direction([1.0, 0.0]),
            Event::Bind(blur.intermediate_framebuffer().name()),
            Event::Draw,
            Event::Direction([0.0, 1.0]),
            Event::Bind(scene.framebuffer.name()),
            Event::Draw,
        ]
    );
    assert_eq!(calls.first(), Some(&GlCall::UseProgram(Some(blur.full_screen.name()))));
}

#[test]
fn passes_sample_image_then_intermediate() {
    let (_gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let scene = scene(&mut ctx);
    let unit = blur.full_screen.uniform(TEXTURE).unwrap().texture_unit.unwrap();

    blur.blur(
        &mut ctx,
        &scene.image,
        &scene.framebuffer,
        &BlurConfiguration::default(),
    )
    .unwrap();

    let units = ctx.texture_units();
    assert_eq!(units.bound_texture(unit), Some(blur.intermediate_image().key()));
    assert_eq!(units.active_texture_unit(), units.maximum_texture_units() - 1);
}

#[test]
fn kernel_uniforms_are_uploaded() {
    let (gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let scene = scene(&mut ctx);
    gl.clear_calls();

    let config = BlurConfiguration::new(8, 3.0);
    blur.blur(&mut ctx, &scene.image, &scene.framebuffer, &config)
        .unwrap();

    let program = &blur.full_screen;
    let location = |key| program.uniform(key).unwrap().location;
    let expected = BlurKernel::build(&config);
    let calls = gl.calls();
    assert!(calls.contains(&GlCall::SetUniform(
        location(RENDER_TARGET_SIZE),
        UniformValue::Vec2([64.0, 64.0])
    )));
    assert!(calls.contains(&GlCall::SetUniform(
        location(KERNEL_WEIGHTS),
        UniformValue::FloatArray(expected.weights().to_vec())
    )));
    assert!(calls.contains(&GlCall::SetUniform(
        location(TEXTURE_OFFSETS),
        UniformValue::FloatArray(expected.offsets().to_vec())
    )));
    assert!(calls.contains(&GlCall::SetUniform(
        location(KERNEL_SIZE),
        UniformValue::Int(5)
    )));
}

#[test]
fn kernel_is_memoized_per_configuration() {
    let (_gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let config = BlurConfiguration::new(4, 2.0);

    blur.compute_kernel(&config).unwrap();
    blur.compute_kernel(&config).unwrap();
    blur.compute_kernel(&BlurConfiguration::new(4, 2.0004)).unwrap();
    assert_eq!(blur.kernel_recomputations(), 1);

    blur.compute_kernel(&BlurConfiguration::new(6, 2.0)).unwrap();
    assert_eq!(blur.kernel_recomputations(), 2);
    assert_eq!(blur.kernel().len(), 4);
}

#[test]
fn odd_radius_is_memoized_too() {
    let (_gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let config = BlurConfiguration::new(3, 2.0);
    blur.compute_kernel(&config).unwrap();
    blur.compute_kernel(&config).unwrap();
    assert_eq!(blur.kernel_recomputations(), 1);
    assert_eq!(blur.kernel(), &BlurKernel::build(&BlurConfiguration::new(4, 2.0)));
}

#[test]
fn invalid_configurations_are_rejected_before_drawing() {
    let (gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let scene = scene(&mut ctx);
    gl.clear_calls();

    for config in [
        BlurConfiguration::new(0, 2.0),
        BlurConfiguration::new(4, 0.0),
        BlurConfiguration::new(4, f32::NAN),
        BlurConfiguration::new(64, 10.0),
    ] {
        let err = blur
            .apply(&mut ctx, &scene.image, &scene.framebuffer, BlurMask::Stencil, &config)
            .unwrap_err();
        assert!(matches!(err, GlError::InvalidArgument(_)), "{config:?}");
    }
    assert!(gl.calls().is_empty());
    assert_eq!(blur.kernel_recomputations(), 0);
}

#[test]
fn oversized_radius_is_rejected_without_overflow() {
    let (_gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();

    for radius in [63, u32::MAX - 1, u32::MAX] {
        let err = blur
            .compute_kernel(&BlurConfiguration::new(radius, 2.0))
            .unwrap_err();
        assert!(matches!(err, GlError::InvalidArgument(_)), "radius {radius}");
    }
    assert_eq!(blur.kernel_recomputations(), 0);

    let kernel = blur.compute_kernel(&BlurConfiguration::new(62, 20.0)).unwrap();
    assert_eq!(kernel.len(), MAX_KERNEL_TAPS);
}

#[test]
fn vertex_mask_uses_half_screen_program_without_depth_test() {
    let (gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let scene = scene(&mut ctx);
    gl.clear_calls();

    blur.blur_with_vertex_mask(
        &mut ctx,
        &scene.image,
        &scene.framebuffer,
        &BlurConfiguration::default(),
    )
    .unwrap();

    let calls = gl.calls();
    assert_eq!(calls.first(), Some(&GlCall::Disable(Capability::DepthTest)));
    assert_eq!(calls.last(), Some(&GlCall::Enable(Capability::DepthTest)));
    assert!(calls.contains(&GlCall::UseProgram(Some(blur.half_screen.name()))));
    assert_eq!(pass_events(&calls, &blur.half_screen).len(), 6);
}

#[test]
fn stencil_mask_writes_both_framebuffers_then_tests_equal() {
    let (gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let scene = scene(&mut ctx);
    gl.clear_calls();

    blur.blur_with_stencil_mask(
        &mut ctx,
        &scene.image,
        &scene.framebuffer,
        &BlurConfiguration::default(),
    )
    .unwrap();

    let calls = gl.calls();
    let intermediate = blur.intermediate_framebuffer().name();
    let destination = scene.framebuffer.name();
    assert_eq!(
        calls[..12],
        [
            GlCall::Disable(Capability::DepthTest),
            GlCall::Enable(Capability::StencilTest),
            GlCall::StencilMask(0xFF),
            GlCall::StencilFunc(CompareFunc::Always, 1, 0xFF),
            GlCall::StencilOp(StencilOp::Keep, StencilOp::Keep, StencilOp::Replace),
            GlCall::ColorMask(false, false, false, false),
            GlCall::UseProgram(Some(blur.stencil_mask.name())),
            GlCall::BindFramebuffer(Some(intermediate)),
            GlCall::Clear(ClearMask::STENCIL),
            GlCall::BindVertexArray(Some(1)),
            GlCall::DrawArrays(Primitive::TriangleStrip, 0, 4),
            GlCall::BindFramebuffer(Some(destination)),
        ]
    );

    let equal_at = calls
        .iter()
        .position(|c| *c == GlCall::StencilFunc(CompareFunc::Equal, 1, 0xFF))
        .unwrap();
    let first_blur_program = calls
        .iter()
        .position(|c| *c == GlCall::UseProgram(Some(blur.full_screen.name())))
        .unwrap();
    assert!(equal_at < first_blur_program);
    assert_eq!(calls[equal_at + 1], GlCall::StencilMask(0x00));

    assert_eq!(
        calls[calls.len() - 3..],
        [
            GlCall::StencilMask(0xFF),
            GlCall::Disable(Capability::StencilTest),
            GlCall::Enable(Capability::DepthTest),
        ]
    );
    let draws = calls
        .iter()
        .filter(|c| matches!(c, GlCall::DrawArrays(..)))
        .count();
    assert_eq!(draws, 4);
}

#[test]
fn apply_dispatches_on_mask() {
    let (gl, mut ctx) = recording_context();
    let mut blur = SeparableBlur::new(&mut ctx, SIZE).unwrap();
    let scene = scene(&mut ctx);
    let config = BlurConfiguration::default();

    gl.clear_calls();
    blur.apply(&mut ctx, &scene.image, &scene.framebuffer, BlurMask::None, &config)
        .unwrap();
    let calls = gl.take_calls();
    assert!(!calls.iter().any(|c| matches!(c, GlCall::Disable(_))));

    blur.apply(&mut ctx, &scene.image, &scene.framebuffer, BlurMask::Vertex, &config)
        .unwrap();
    assert!(gl
        .take_calls()
        .contains(&GlCall::UseProgram(Some(blur.half_screen.name()))));

    assert_eq!(BlurMask::from(BlurMaskMode::Stencil), BlurMask::Stencil);
    assert_eq!(BlurMask::default(), BlurMask::Vertex);
}
