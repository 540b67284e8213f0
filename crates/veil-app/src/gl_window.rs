//! Window plus OpenGL 4.1 core context.

use std::ffi::CStr;
use std::num::NonZeroU32;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::{Display, DisplayApiPreference};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use veil_common::{Size2D, VeilError};
use veil_config::WindowConfig;

fn window_error(context: &str, err: impl std::fmt::Display) -> VeilError {
    VeilError::Window(format!("{context}: {err}"))
}

/// The surface and context are declared before the window so they drop first.
pub struct GlWindow {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl GlWindow {
    /// Create the window and make a GL context current on it.
    pub fn new(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<(Self, glow::Context), VeilError> {
        let attrs = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let window = event_loop
            .create_window(attrs)
            .map_err(|e| window_error("failed to create window", e))?;

        let raw_display = window
            .display_handle()
            .map_err(|e| window_error("no display handle", e))?
            .as_raw();
        let raw_window = window
            .window_handle()
            .map_err(|e| window_error("no window handle", e))?
            .as_raw();

        #[cfg(target_os = "windows")]
        let preference = DisplayApiPreference::Wgl(Some(raw_window));
        #[cfg(target_os = "macos")]
        let preference = DisplayApiPreference::Cgl;
        #[cfg(all(unix, not(target_os = "macos")))]
        let preference = DisplayApiPreference::Egl;

        // SAFETY: the handles come from a live window that outlives the display.
        let display = unsafe { Display::new(raw_display, preference) }
            .map_err(|e| window_error("failed to open GL display", e))?;

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(0)
            .with_depth_size(24)
            .with_stencil_size(8)
            .with_transparency(false)
            .build();
        // SAFETY: the template holds no raw handles.
        let gl_config = unsafe { display.find_configs(template) }
            .map_err(|e| window_error("failed to query GL configs", e))?
            .next()
            .ok_or_else(|| VeilError::Window("no GL config with an 8-bit stencil".into()))?;

        let size = physical_size(&window);
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window,
            nonzero(size.width),
            nonzero(size.height),
        );
        // SAFETY: `raw_window` belongs to `window`, which lives as long as the surface.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| window_error("failed to create GL surface", e))?;

        let context_attributes = ContextAttributesBuilder::new()
            .with_debug(config.gl_debug)
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(4, 1))))
            .build(Some(raw_window));
        // SAFETY: same window handle as the surface.
        let context = unsafe { display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| window_error("failed to create GL 4.1 core context", e))?
            .make_current(&surface)
            .map_err(|e| window_error("failed to make GL context current", e))?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            tracing::warn!("Failed to set swap interval (vsync={}): {e}", config.vsync);
        }

        // SAFETY: the context is current on this thread.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s: &CStr| display.get_proc_address(s))
        };

        tracing::info!(%size, vsync = config.vsync, "GL window created");
        Ok((
            Self {
                surface,
                context,
                window,
            },
            gl,
        ))
    }

    pub fn size(&self) -> Size2D {
        physical_size(&self.window)
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Resize the surface. Zero sizes are ignored.
    pub fn resize(&self, size: Size2D) {
        if size.is_empty() {
            return;
        }
        self.surface
            .resize(&self.context, nonzero(size.width), nonzero(size.height));
    }

    pub fn swap_buffers(&self) -> Result<(), VeilError> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| window_error("failed to swap buffers", e))
    }
}

fn physical_size(window: &Window) -> Size2D {
    let size = window.inner_size();
    Size2D::new(size.width, size.height)
}

fn nonzero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}
