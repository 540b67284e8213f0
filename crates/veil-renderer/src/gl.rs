//! Driver abstraction.
//!
//! [`GlBackend`] lists every driver call the renderer issues. [`GlowBackend`]
//! forwards them to a live OpenGL context; [`RecordingBackend`] records them
//! for headless tests. Object lifetimes are owned by [`GlHandle`].

mod backend;
mod glow_backend;
mod handle;
mod recording;

pub use backend::*;
pub use glow_backend::GlowBackend;
pub use handle::{GlHandle, ObjectKey};
pub use recording::{GlCall, RecordingBackend};
