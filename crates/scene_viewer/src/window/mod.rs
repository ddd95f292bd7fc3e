//! Windows: rendering destinations bound to one backend surface
//!
//! A window is `Open` while it holds a surface and `Closed` once the surface
//! is gone (or was never created). The transition is one-way. Behaviour
//! that differs per window variant is selected by matching on
//! [`WindowKind`]; the per-tick logic itself lives in the manager, which
//! owns the backend.

mod camera;
mod registry;

use std::sync::Arc;

pub use camera::ObjectView;
pub use registry::Registry;

use crate::backend::{SurfaceId, TextureId};
use crate::input::{Key, KeyBindings};
use crate::render::ImageBuffer;

slotmap::new_key_type! {
    /// Handle to a window owned by the manager
    pub struct WindowId;
}

/// Window liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Holds a live surface
    Open,
    /// Terminal; never reachable from the registry
    Closed,
}

/// Frame-buffer display state of an image window
#[derive(Debug, Clone, Default)]
pub struct ImageView {
    image: Option<Arc<ImageBuffer>>,
    texture: Option<TextureId>,
}

impl ImageView {
    /// Displayed buffer, if any
    pub fn image(&self) -> Option<&Arc<ImageBuffer>> {
        self.image.as_ref()
    }

    /// Backend texture the buffer is uploaded into
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub(crate) fn set_image(&mut self, image: Option<Arc<ImageBuffer>>) {
        self.image = image;
    }

    pub(crate) fn set_texture(&mut self, texture: Option<TextureId>) {
        self.texture = texture;
    }
}

/// Window variant
#[derive(Debug, Clone)]
pub enum WindowKind {
    /// Tracks liveness only; handles the close binding
    Plain,
    /// Renders its associated objects from a fixed viewpoint
    Objects(ObjectView),
    /// Object window whose eye is moved with the keyboard
    Camera(ObjectView),
    /// Shows an externally supplied image buffer
    Image(ImageView),
}

impl WindowKind {
    /// Camera state of object windows
    pub fn object_view(&self) -> Option<&ObjectView> {
        match self {
            WindowKind::Objects(view) | WindowKind::Camera(view) => Some(view),
            _ => None,
        }
    }

    /// Mutable camera state of object windows
    pub fn object_view_mut(&mut self) -> Option<&mut ObjectView> {
        match self {
            WindowKind::Objects(view) | WindowKind::Camera(view) => Some(view),
            _ => None,
        }
    }

    /// True for variants that hold objects
    pub fn holds_objects(&self) -> bool {
        self.object_view().is_some()
    }

    /// Short variant name for logs
    pub fn label(&self) -> &'static str {
        match self {
            WindowKind::Plain => "window",
            WindowKind::Objects(_) => "object window",
            WindowKind::Camera(_) => "camera window",
            WindowKind::Image(_) => "image window",
        }
    }
}

/// A rendering destination
#[derive(Debug)]
pub struct Window {
    name: String,
    surface: Option<SurfaceId>,
    kind: WindowKind,
    bindings: KeyBindings,
}

impl Window {
    pub(crate) fn new(name: &str, kind: WindowKind, bindings: KeyBindings) -> Self {
        Self {
            name: name.to_owned(),
            surface: None,
            kind,
            bindings,
        }
    }

    /// Window name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Liveness
    pub fn state(&self) -> WindowState {
        if self.surface.is_some() {
            WindowState::Open
        } else {
            WindowState::Closed
        }
    }

    /// True while the window holds a surface
    pub fn is_open(&self) -> bool {
        self.state() == WindowState::Open
    }

    /// Backend surface, while open
    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    /// Variant state
    pub fn kind(&self) -> &WindowKind {
        &self.kind
    }

    /// Key mapping applied by `process_input`
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Camera state of object windows
    pub fn object_view(&self) -> Option<&ObjectView> {
        self.kind.object_view()
    }

    /// Image state of image windows
    pub fn image_view(&self) -> Option<&ImageView> {
        match &self.kind {
            WindowKind::Image(view) => Some(view),
            _ => None,
        }
    }

    pub(crate) fn attach_surface(&mut self, surface: SurfaceId) {
        self.surface = Some(surface);
    }

    pub(crate) fn take_surface(&mut self) -> Option<SurfaceId> {
        self.surface.take()
    }

    pub(crate) fn kind_mut(&mut self) -> &mut WindowKind {
        &mut self.kind
    }

    pub(crate) fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Move a camera window's eye from held keys; other variants ignore it
    pub(crate) fn steer(&mut self, step: f64, pressed: impl FnMut(Key) -> bool) {
        if let WindowKind::Camera(view) = &mut self.kind {
            view.apply_input(&self.bindings, step, pressed);
        }
    }
}
