//! In-memory backend
//!
//! Surfaces live in a slotmap and never touch a display. Every canvas call
//! is recorded as a [`DrawCommand`] on the current surface; `present` moves
//! the recorded list into the surface's last frame. Tests drive input and
//! close requests through the inherent methods.

use std::collections::HashSet;

use slotmap::SlotMap;

use super::{
    Backend, BackendError, BackendResult, Canvas, Color, DepthFunc, Primitive, RenderState,
    SurfaceId, TextureId, TexturedQuad, Vertex,
};
use crate::foundation::math::Mat4;
use crate::input::Key;
use crate::render::ImageBuffer;

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Viewport set
    Viewport(u32, u32),
    /// Frame cleared
    Clear(Color),
    /// Model-view transform replaced
    LoadTransform(Mat4),
    /// Model-view transform saved
    PushTransform,
    /// Model-view transform restored
    PopTransform,
    /// Projection replaced
    Projection(Mat4),
    /// Toggles enabled
    Enable(RenderState),
    /// Toggles disabled
    Disable(RenderState),
    /// Depth function changed
    DepthFunc(DepthFunc),
    /// Line width changed
    LineWidth(f32),
    /// Point size changed
    PointSize(f32),
    /// Primitive batch submitted with the model-view transform active at the time
    Draw {
        /// Topology
        primitive: Primitive,
        /// Vertices as submitted
        vertices: Vec<Vertex>,
        /// Model-view transform at submission
        transform: Mat4,
    },
    /// Texture allocated
    CreateTexture(TextureId),
    /// Image uploaded
    UploadTexture {
        /// Target texture
        texture: TextureId,
        /// Uploaded width, padding included
        row_length: usize,
        /// Uploaded height
        height: u32,
        /// Unpack alignment used
        alignment: i32,
    },
    /// Textured quad drawn
    TexturedQuad(TextureId, TexturedQuad),
    /// Texture released
    DeleteTexture(TextureId),
}

#[derive(Debug)]
struct HeadlessSurface {
    name: String,
    size: (u32, u32),
    drawable_size: (u32, u32),
    close_requested: bool,
    keys: HashSet<Key>,
    transform: Mat4,
    stack: Vec<Mat4>,
    recording: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames_presented: u64,
    textures: HashSet<TextureId>,
}

impl HeadlessSurface {
    fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            size: (width, height),
            drawable_size: (width, height),
            close_requested: false,
            keys: HashSet::new(),
            transform: Mat4::identity(),
            stack: Vec::new(),
            recording: Vec::new(),
            last_frame: Vec::new(),
            frames_presented: 0,
            textures: HashSet::new(),
        }
    }
}

/// Backend without a display
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    surfaces: SlotMap<SurfaceId, HeadlessSurface>,
    current: Option<SurfaceId>,
    next_texture: u32,
    refuse_surfaces: bool,
    polls: u64,
    destroyed: usize,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `create_surface` calls fail (or succeed again)
    pub fn set_refuse_surfaces(&mut self, refuse: bool) {
        self.refuse_surfaces = refuse;
    }

    /// Hold `key` down on `surface`
    pub fn press_key(&mut self, surface: SurfaceId, key: Key) {
        if let Some(s) = self.surfaces.get_mut(surface) {
            s.keys.insert(key);
        }
    }

    /// Release `key` on `surface`
    pub fn release_key(&mut self, surface: SurfaceId, key: Key) {
        if let Some(s) = self.surfaces.get_mut(surface) {
            s.keys.remove(&key);
        }
    }

    /// Change the pixel size reported for `surface`, e.g. to emulate HiDPI
    pub fn set_drawable_size(&mut self, surface: SurfaceId, width: u32, height: u32) {
        if let Some(s) = self.surfaces.get_mut(surface) {
            s.drawable_size = (width, height);
        }
    }

    /// Find a live surface by title
    pub fn surface_named(&self, name: &str) -> Option<SurfaceId> {
        self.surfaces
            .iter()
            .find(|(_, s)| s.name == name)
            .map(|(id, _)| id)
    }

    /// True while `surface` has not been destroyed
    pub fn is_alive(&self, surface: SurfaceId) -> bool {
        self.surfaces.contains_key(surface)
    }

    /// Number of live surfaces
    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of surfaces destroyed so far
    pub fn destroyed_surfaces(&self) -> usize {
        self.destroyed
    }

    /// Number of `poll_events` calls so far
    pub fn poll_count(&self) -> u64 {
        self.polls
    }

    /// Commands of the last presented frame
    pub fn last_frame(&self, surface: SurfaceId) -> &[DrawCommand] {
        self.surfaces
            .get(surface)
            .map_or(&[][..], |s| s.last_frame.as_slice())
    }

    /// Number of frames presented on `surface`
    pub fn frames_presented(&self, surface: SurfaceId) -> u64 {
        self.surfaces.get(surface).map_or(0, |s| s.frames_presented)
    }

    /// Saved transforms currently on the stack of `surface`
    pub fn stack_depth(&self, surface: SurfaceId) -> usize {
        self.surfaces.get(surface).map_or(0, |s| s.stack.len())
    }

    /// Textures currently allocated on `surface`
    pub fn texture_count(&self, surface: SurfaceId) -> usize {
        self.surfaces.get(surface).map_or(0, |s| s.textures.len())
    }

    fn current_mut(&mut self) -> Option<&mut HeadlessSurface> {
        self.current.and_then(|id| self.surfaces.get_mut(id))
    }

    fn record(&mut self, command: DrawCommand) {
        match self.current_mut() {
            Some(surface) => surface.recording.push(command),
            None => log::trace!("headless canvas call without a current surface: {:?}", command),
        }
    }
}

impl Backend for HeadlessBackend {
    fn create_surface(&mut self, name: &str, width: u32, height: u32) -> BackendResult<SurfaceId> {
        if self.refuse_surfaces {
            return Err(BackendError::SurfaceCreationFailed { name: name.to_string() });
        }

        let id = self.surfaces.insert(HeadlessSurface::new(name, width, height));
        log::trace!("headless surface '{}' created ({}x{})", name, width, height);
        Ok(id)
    }

    fn make_current(&mut self, surface: SurfaceId) {
        if self.surfaces.contains_key(surface) {
            self.current = Some(surface);
        }
    }

    fn poll_events(&mut self) {
        self.polls += 1;
    }

    fn present(&mut self, surface: SurfaceId) {
        if let Some(s) = self.surfaces.get_mut(surface) {
            s.last_frame = std::mem::take(&mut s.recording);
            s.frames_presented += 1;
        }
    }

    fn should_close(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(surface).map_or(true, |s| s.close_requested)
    }

    fn request_close(&mut self, surface: SurfaceId) {
        if let Some(s) = self.surfaces.get_mut(surface) {
            s.close_requested = true;
        }
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        if self.surfaces.remove(surface).is_some() {
            self.destroyed += 1;
        }
        if self.current == Some(surface) {
            self.current = None;
        }
    }

    fn key_pressed(&self, surface: SurfaceId, key: Key) -> bool {
        self.surfaces.get(surface).is_some_and(|s| s.keys.contains(&key))
    }

    fn surface_size(&self, surface: SurfaceId) -> (u32, u32) {
        self.surfaces.get(surface).map_or((0, 0), |s| s.size)
    }

    fn drawable_size(&self, surface: SurfaceId) -> (u32, u32) {
        self.surfaces.get(surface).map_or((0, 0), |s| s.drawable_size)
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        self
    }
}

impl Canvas for HeadlessBackend {
    fn viewport(&mut self, width: u32, height: u32) {
        self.record(DrawCommand::Viewport(width, height));
    }

    fn clear(&mut self, color: Color) {
        self.record(DrawCommand::Clear(color));
    }

    fn transform(&self) -> Mat4 {
        self.current
            .and_then(|id| self.surfaces.get(id))
            .map_or_else(Mat4::identity, |s| s.transform)
    }

    fn load_transform(&mut self, transform: &Mat4) {
        if let Some(surface) = self.current_mut() {
            surface.transform = *transform;
        }
        self.record(DrawCommand::LoadTransform(*transform));
    }

    fn push_transform(&mut self) {
        if let Some(surface) = self.current_mut() {
            let top = surface.transform;
            surface.stack.push(top);
        }
        self.record(DrawCommand::PushTransform);
    }

    fn pop_transform(&mut self) {
        if let Some(surface) = self.current_mut() {
            match surface.stack.pop() {
                Some(saved) => surface.transform = saved,
                None => log::warn!("transform stack underflow on '{}'", surface.name),
            }
        }
        self.record(DrawCommand::PopTransform);
    }

    fn set_projection(&mut self, projection: &Mat4) {
        self.record(DrawCommand::Projection(*projection));
    }

    fn enable(&mut self, state: RenderState) {
        self.record(DrawCommand::Enable(state));
    }

    fn disable(&mut self, state: RenderState) {
        self.record(DrawCommand::Disable(state));
    }

    fn depth_func(&mut self, func: DepthFunc) {
        self.record(DrawCommand::DepthFunc(func));
    }

    fn line_width(&mut self, width: f32) {
        self.record(DrawCommand::LineWidth(width));
    }

    fn point_size(&mut self, size: f32) {
        self.record(DrawCommand::PointSize(size));
    }

    fn draw(&mut self, primitive: Primitive, vertices: &[Vertex]) {
        let transform = self.transform();
        self.record(DrawCommand::Draw {
            primitive,
            vertices: vertices.to_vec(),
            transform,
        });
    }

    fn create_texture(&mut self) -> TextureId {
        self.next_texture += 1;
        let texture = TextureId(self.next_texture);
        if let Some(surface) = self.current_mut() {
            surface.textures.insert(texture);
        }
        self.record(DrawCommand::CreateTexture(texture));
        texture
    }

    fn upload_texture(&mut self, texture: TextureId, image: &ImageBuffer) {
        self.record(DrawCommand::UploadTexture {
            texture,
            row_length: image.row_length(),
            height: image.height(),
            alignment: image.unpack_alignment(),
        });
    }

    fn draw_textured_quad(&mut self, texture: TextureId, quad: TexturedQuad) {
        self.record(DrawCommand::TexturedQuad(texture, quad));
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if let Some(surface) = self.current_mut() {
            surface.textures.remove(&texture);
        }
        self.record(DrawCommand::DeleteTexture(texture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refused_surface() {
        let mut backend = HeadlessBackend::new();
        backend.set_refuse_surfaces(true);

        let result = backend.create_surface("main", 640, 480);
        assert!(matches!(result, Err(BackendError::SurfaceCreationFailed { .. })));
        assert_eq!(backend.live_surfaces(), 0);
    }

    #[test]
    fn test_close_request_and_destroy() {
        let mut backend = HeadlessBackend::new();
        let surface = backend.create_surface("main", 640, 480).unwrap();

        assert!(!backend.should_close(surface));
        backend.request_close(surface);
        assert!(backend.should_close(surface));

        backend.destroy_surface(surface);
        assert!(!backend.is_alive(surface));
        assert!(backend.should_close(surface));
        assert_eq!(backend.destroyed_surfaces(), 1);
    }

    #[test]
    fn test_recording_goes_to_current_surface() {
        let mut backend = HeadlessBackend::new();
        let a = backend.create_surface("a", 10, 10).unwrap();
        let b = backend.create_surface("b", 20, 20).unwrap();

        backend.make_current(b);
        backend.canvas().clear(Color::BLACK);
        backend.present(a);
        backend.present(b);

        assert!(backend.last_frame(a).is_empty());
        assert_eq!(backend.last_frame(b), &[DrawCommand::Clear(Color::BLACK)]);
        assert_eq!(backend.frames_presented(b), 1);
    }

    #[test]
    fn test_transform_stack() {
        let mut backend = HeadlessBackend::new();
        let s = backend.create_surface("s", 10, 10).unwrap();
        backend.make_current(s);

        let shifted = Mat4::new_translation(&crate::foundation::math::Vec3::new(1.0, 2.0, 3.0));
        let canvas = backend.canvas();
        canvas.push_transform();
        canvas.load_transform(&shifted);
        assert_eq!(canvas.transform(), shifted);
        canvas.pop_transform();
        assert_eq!(canvas.transform(), Mat4::identity());
        assert_eq!(backend.stack_depth(s), 0);
    }

    #[test]
    fn test_keys() {
        let mut backend = HeadlessBackend::new();
        let s = backend.create_surface("s", 10, 10).unwrap();

        backend.press_key(s, Key::W);
        assert!(backend.key_pressed(s, Key::W));
        assert!(!backend.key_pressed(s, Key::S));
        backend.release_key(s, Key::W);
        assert!(!backend.key_pressed(s, Key::W));
    }
}
