//! Texture binding cache.
//!
//! Tracks which texture and sampler each unit holds and which unit is
//! active, so that every driver call issued through it is a real state
//! change. All binds in the renderer go through the single cache owned by
//! [`GpuContext`](crate::GpuContext); binding behind its back makes the
//! records stale.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::debug;

use crate::error::{GlError, GlResult};
use crate::gl::{GlBackend, GlName, ObjectKey, TextureTarget};
use crate::texture::{Sampler, Texture};

pub type TextureUnit = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoundTexture {
    key: ObjectKey,
    name: GlName,
    target: TextureTarget,
}

pub struct TextureUnitCache {
    gl: Rc<dyn GlBackend>,
    max_units: u32,
    active_unit: TextureUnit,
    textures: HashMap<TextureUnit, BoundTexture>,
    samplers: BTreeMap<TextureUnit, ObjectKey>,
}

impl TextureUnitCache {
    pub(crate) fn new(gl: Rc<dyn GlBackend>) -> Self {
        let max_units = gl.max_texture_units();
        Self {
            gl,
            max_units,
            active_unit: 0,
            textures: HashMap::new(),
            samplers: BTreeMap::new(),
        }
    }

    pub fn maximum_texture_units(&self) -> u32 {
        self.max_units
    }

    pub fn active_texture_unit(&self) -> TextureUnit {
        self.active_unit
    }

    /// Key of the texture recorded on `unit`, if any.
    pub fn bound_texture(&self, unit: TextureUnit) -> Option<ObjectKey> {
        self.textures.get(&unit).map(|bound| bound.key)
    }

    pub fn bound_sampler(&self, unit: TextureUnit) -> Option<ObjectKey> {
        self.samplers.get(&unit).copied()
    }

    fn check_unit(&self, unit: TextureUnit) -> GlResult<()> {
        if unit >= self.max_units {
            return Err(GlError::OutOfRange {
                what: "texture unit",
                value: unit,
                limit: self.max_units,
            });
        }
        Ok(())
    }

    pub fn activate_unit(&mut self, unit: TextureUnit) -> GlResult<()> {
        self.check_unit(unit)?;
        if self.active_unit != unit {
            self.gl.active_texture(unit);
            self.active_unit = unit;
        }
        Ok(())
    }

    pub fn bind_texture(&mut self, texture: &Texture, unit: TextureUnit) -> GlResult<()> {
        self.activate_unit(unit)?;
        self.bind_texture_to_active_unit(texture);
        Ok(())
    }

    /// Bind on whichever unit is currently active.
    pub fn bind_texture_to_active_unit(&mut self, texture: &Texture) {
        let wanted = BoundTexture {
            key: texture.key(),
            name: texture.name(),
            target: texture.target(),
        };
        let previous = self.textures.get(&self.active_unit).copied();
        if previous == Some(wanted) {
            return;
        }
        if let Some(previous) = previous {
            if previous.target != wanted.target {
                self.gl.bind_texture(previous.target, None);
            }
        }
        debug!(unit = self.active_unit, texture = %wanted.key, "bind texture");
        self.gl.bind_texture(wanted.target, Some(wanted.name));
        self.textures.insert(self.active_unit, wanted);
    }

    pub fn bind_sampler(&mut self, sampler: &Sampler, unit: TextureUnit) -> GlResult<()> {
        self.check_unit(unit)?;
        if self.samplers.get(&unit) == Some(&sampler.key()) {
            return Ok(());
        }
        self.gl.bind_sampler(unit, Some(sampler.name()));
        self.samplers.insert(unit, sampler.key());
        Ok(())
    }

    pub fn unbind_all_samplers(&mut self) {
        for &unit in self.samplers.keys() {
            self.gl.bind_sampler(unit, None);
        }
        self.samplers.clear();
    }
}
