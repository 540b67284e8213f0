//! VeilApp struct definition and constructor.

use veil_common::VeilError;
use veil_config::VeilConfig;
use veil_renderer::{FrameClock, FrameRenderer, GpuContext};

use crate::gl_window::GlWindow;

/// Top-level application state.
///
/// Fields drop in declaration order: GL objects go before the context that
/// owns them.
pub struct VeilApp {
    pub(super) renderer: Option<FrameRenderer>,
    pub(super) gpu: Option<GpuContext>,
    pub(super) gl_window: Option<GlWindow>,

    pub(super) config: VeilConfig,
    pub(super) clock: FrameClock,

    // Fatal error that stopped the event loop, reported by `main`.
    pub(super) fatal: Option<VeilError>,
}

impl VeilApp {
    pub fn new(config: VeilConfig) -> Self {
        Self {
            renderer: None,
            gpu: None,
            gl_window: None,
            config,
            clock: FrameClock::new(),
            fatal: None,
        }
    }

    /// Error that ended the event loop, if any.
    pub fn take_fatal_error(&mut self) -> Option<VeilError> {
        self.fatal.take()
    }

    pub(super) fn request_redraw(&self) {
        if let Some(ref window) = self.gl_window {
            window.request_redraw();
        }
    }
}
