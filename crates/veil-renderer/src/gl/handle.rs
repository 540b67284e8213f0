use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::backend::{GlBackend, GlName, ObjectKind, ShaderStage};
use crate::error::{GlError, GlResult};

static NEXT_OBJECT_KEY: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a driver object.
///
/// Drivers recycle names after deletion, so bookkeeping that outlives a
/// single object keys on this instead of the raw name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(u64);

impl ObjectKey {
    fn next() -> Self {
        Self(NEXT_OBJECT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owner of one driver object. Deletes the object on drop.
pub struct GlHandle {
    kind: ObjectKind,
    name: GlName,
    key: ObjectKey,
    gl: Rc<dyn GlBackend>,
}

impl GlHandle {
    pub fn create(gl: &Rc<dyn GlBackend>, kind: ObjectKind) -> GlResult<Self> {
        let name = gl
            .create_object(kind)
            .map_err(|e| GlError::Driver(format!("failed to create {kind:?}: {e}")))?;
        Ok(Self::wrap(gl, kind, name))
    }

    pub fn create_shader(gl: &Rc<dyn GlBackend>, stage: ShaderStage) -> GlResult<Self> {
        let name = gl
            .create_shader(stage)
            .map_err(|e| GlError::Driver(format!("failed to create {stage} shader: {e}")))?;
        Ok(Self::wrap(gl, ObjectKind::Shader, name))
    }

    fn wrap(gl: &Rc<dyn GlBackend>, kind: ObjectKind, name: GlName) -> Self {
        Self {
            kind,
            name,
            key: ObjectKey::next(),
            gl: Rc::clone(gl),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn name(&self) -> GlName {
        self.name
    }

    pub fn key(&self) -> ObjectKey {
        self.key
    }

    pub fn gl(&self) -> &Rc<dyn GlBackend> {
        &self.gl
    }
}

impl fmt::Debug for GlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlHandle")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("key", &self.key)
            .finish()
    }
}

impl Drop for GlHandle {
    fn drop(&mut self) {
        self.gl.delete_object(self.kind, self.name);
    }
}
