//! Windowing and graphics backends
//!
//! The viewer never talks to a native windowing API directly. Everything it
//! needs from one (surfaces, key state, event polling, presentation and an
//! immediate-mode canvas) goes through the [`Backend`] trait.
//!
//! - [`HeadlessBackend`]: in-memory surfaces that record every draw call,
//!   used by tests and off-screen runs
//! - `GlfwBackend` (feature `glfw`): native windows with legacy OpenGL
//!
//! All backends are single-threaded. Surfaces and their contexts must only
//! be touched from the thread that created them.

mod canvas;
mod headless;

// Raw GL entry points are only reachable through FFI
#[cfg(feature = "glfw")]
#[allow(unsafe_code)]
mod native;

use thiserror::Error;

use crate::input::Key;

pub use canvas::{
    Canvas, Color, DepthFunc, Primitive, RenderState, TextureId, TexturedQuad, TransformScope,
    Vertex,
};
pub use headless::{DrawCommand, HeadlessBackend};

#[cfg(feature = "glfw")]
pub use native::GlfwBackend;

slotmap::new_key_type! {
    /// Handle to a native surface owned by a backend
    pub struct SurfaceId;
}

/// Backend errors
#[derive(Error, Debug)]
pub enum BackendError {
    /// Windowing library failed to initialize
    #[error("Backend initialization failed: {0}")]
    InitializationFailed(String),

    /// Native surface could not be created
    #[error("Surface creation failed for '{name}'")]
    SurfaceCreationFailed {
        /// Requested surface title
        name: String,
    },

    /// Required graphics entry point is unavailable
    #[error("Missing graphics function: {0}")]
    MissingGlFunction(&'static str),

    /// Other windowing library error
    #[error("GLFW error: {0}")]
    Glfw(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Native windowing and graphics backend
///
/// Operations on a destroyed or unknown surface are no-ops; queries on one
/// report a closed, zero-sized surface with no keys held.
pub trait Backend {
    /// Create a native surface with its own drawing context
    fn create_surface(&mut self, name: &str, width: u32, height: u32) -> BackendResult<SurfaceId>;

    /// Direct subsequent canvas calls at `surface`
    fn make_current(&mut self, surface: SurfaceId);

    /// Process pending native events without blocking
    fn poll_events(&mut self);

    /// Show the frame drawn on `surface`
    fn present(&mut self, surface: SurfaceId);

    /// True once a close has been requested for `surface`
    fn should_close(&self, surface: SurfaceId) -> bool;

    /// Request `surface` to close
    fn request_close(&mut self, surface: SurfaceId);

    /// Release `surface` and its context
    fn destroy_surface(&mut self, surface: SurfaceId);

    /// Current state of `key` on `surface`
    fn key_pressed(&self, surface: SurfaceId, key: Key) -> bool;

    /// Surface size in screen coordinates
    fn surface_size(&self, surface: SurfaceId) -> (u32, u32);

    /// Drawable size in pixels
    fn drawable_size(&self, surface: SurfaceId) -> (u32, u32);

    /// Immediate-mode canvas for the current surface
    fn canvas(&mut self) -> &mut dyn Canvas;
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn create_surface(&mut self, name: &str, width: u32, height: u32) -> BackendResult<SurfaceId> {
        (**self).create_surface(name, width, height)
    }

    fn make_current(&mut self, surface: SurfaceId) {
        (**self).make_current(surface)
    }

    fn poll_events(&mut self) {
        (**self).poll_events()
    }

    fn present(&mut self, surface: SurfaceId) {
        (**self).present(surface)
    }

    fn should_close(&self, surface: SurfaceId) -> bool {
        (**self).should_close(surface)
    }

    fn request_close(&mut self, surface: SurfaceId) {
        (**self).request_close(surface)
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        (**self).destroy_surface(surface)
    }

    fn key_pressed(&self, surface: SurfaceId, key: Key) -> bool {
        (**self).key_pressed(surface, key)
    }

    fn surface_size(&self, surface: SurfaceId) -> (u32, u32) {
        (**self).surface_size(surface)
    }

    fn drawable_size(&self, surface: SurfaceId) -> (u32, u32) {
        (**self).drawable_size(surface)
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        (**self).canvas()
    }
}
