//! OpenGL state layer and separable Gaussian blur.
//!
//! Every driver call goes through a [`GlBackend`]. The texture binding cache,
//! framebuffer attachment bookkeeping and shader reflection all rely on
//! being the only code that touches the state they track.

pub mod blur;
pub mod context;
pub mod error;
pub mod framebuffer;
pub mod gl;
pub mod perf;
pub mod program;
pub mod render_state;
pub mod shaders;
pub mod texture;
pub mod texture_units;

pub use blur::{BlurConfiguration, BlurKernel, BlurMask, SeparableBlur};
pub use context::GpuContext;
pub use error::{GlError, GlResult};
pub use framebuffer::{ColorAttachment, Framebuffer};
pub use gl::{GlBackend, GlowBackend, RecordingBackend};
pub use perf::FrameClock;
pub use program::{SamplerScope, ShaderProgram, ShaderSources, UniformKey};
pub use render_state::FrameRenderer;
pub use texture::{Renderbuffer, Sampler, Texture, TextureDescriptor};
pub use texture_units::{TextureUnit, TextureUnitCache};

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use crate::context::GpuContext;
    use crate::gl::RecordingBackend;

    /// Context over a fresh recorder. The quad vertex array is name 1.
    pub fn recording_context() -> (Rc<RecordingBackend>, GpuContext) {
        let gl = Rc::new(RecordingBackend::new());
        let ctx = GpuContext::new(gl.clone()).expect("recording backend never fails");
        (gl, ctx)
    }
}
