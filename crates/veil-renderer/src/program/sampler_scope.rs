use tracing::warn;

use super::{ShaderProgram, UniformKey};
use crate::error::GlResult;
use crate::texture::{Sampler, Texture};
use crate::texture_units::TextureUnitCache;

/// Window in which a program's sampler uniforms may be rebound.
///
/// Opening the scope unbinds every sampler object. Dropping it, on any
/// exit path, activates the last texture unit so that later texture
/// creation binds on a unit no program samples from.
pub struct SamplerScope<'a> {
    program: &'a ShaderProgram,
    units: &'a mut TextureUnitCache,
}

impl<'a> SamplerScope<'a> {
    pub(super) fn open(program: &'a ShaderProgram, units: &'a mut TextureUnitCache) -> Self {
        units.unbind_all_samplers();
        program.sampler_mutable.set(true);
        Self { program, units }
    }

    /// Bind `texture` (and optionally `sampler`) to the unit owned by `key`.
    pub fn set_texture(
        &mut self,
        key: UniformKey,
        texture: &Texture,
        sampler: Option<&Sampler>,
    ) -> GlResult<()> {
        self.program
            .set_uniform_texture(self.units, key, texture, sampler)
    }
}

impl Drop for SamplerScope<'_> {
    fn drop(&mut self) {
        let sentinel = self.units.maximum_texture_units().saturating_sub(1);
        if let Err(err) = self.units.activate_unit(sentinel) {
            warn!("failed to park active texture unit: {err}");
        }
        self.program.sampler_mutable.set(false);
    }
}
