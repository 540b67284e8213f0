//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the window, the GL context and the frame renderer.

mod core;
mod event_handler;
mod init;
mod input;
mod render;

pub use self::core::VeilApp;
