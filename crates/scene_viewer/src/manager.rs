//! Window manager and per-tick driver
//!
//! The [`Manager`] owns every window and object in slotmap arenas, the
//! registry of open windows, the membership tables linking the two, and the
//! backend. Handles ([`WindowId`], [`ObjectId`]) stay valid to pass around
//! after the thing they name is gone; every operation on a stale or closed
//! handle is a no-op that reports `false` or `None`.
//!
//! A window that closes, or never opened, keeps its arena slot so its handle
//! still answers queries. [`Manager::destroy_window`] reclaims the slot.
//!
//! ```no_run
//! use scene_viewer::prelude::*;
//!
//! let mut manager = Manager::new(HeadlessBackend::new(), ViewerConfig::default());
//! let main = manager.create_object_window("main", 640, 480);
//! let cube = manager.create_cube("c1", 2.0, 2.0, 2.0);
//! manager.add_object(main, cube);
//!
//! while manager.running() {
//!     manager.update();
//! }
//! ```

use std::sync::Arc;

use slotmap::SlotMap;

use crate::backend::{Backend, Color, DepthFunc, RenderState, SurfaceId, TexturedQuad};
use crate::config::{UpdatePolicy, ViewerConfig};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::input::KeyBindings;
use crate::render::ImageBuffer;
use crate::scene::{Associations, Axis, Cube, Grid, Object, ObjectId, Path, Shape};
use crate::window::{ImageView, ObjectView, Registry, Window, WindowId, WindowKind};

/// Owner of all windows, objects and the backend
pub struct Manager<B: Backend> {
    backend: B,
    config: ViewerConfig,
    windows: SlotMap<WindowId, Window>,
    objects: SlotMap<ObjectId, Object>,
    registry: Registry,
    links: Associations,
}

impl<B: Backend> Manager<B> {
    /// Create a manager with no windows
    pub fn new(backend: B, config: ViewerConfig) -> Self {
        log::debug!("Manager created with update policy {:?}", config.update_policy);
        Self {
            backend,
            config,
            windows: SlotMap::with_key(),
            objects: SlotMap::with_key(),
            registry: Registry::new(),
            links: Associations::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Windows
    // ---------------------------------------------------------------------

    /// Open a window that only tracks liveness and the close key
    pub fn create_window(&mut self, name: &str, width: u32, height: u32) -> WindowId {
        self.open(name, width, height, WindowKind::Plain)
    }

    /// Open a window that renders objects from the configured viewpoint
    pub fn create_object_window(&mut self, name: &str, width: u32, height: u32) -> WindowId {
        let view = self.default_view();
        self.open(name, width, height, WindowKind::Objects(view))
    }

    /// Open an object window whose eye follows the movement keys
    pub fn create_camera_window(&mut self, name: &str, width: u32, height: u32) -> WindowId {
        let view = self.default_view();
        self.open(name, width, height, WindowKind::Camera(view))
    }

    /// Open a window that displays an image buffer
    pub fn create_image_window(&mut self, name: &str, width: u32, height: u32) -> WindowId {
        self.open(name, width, height, WindowKind::Image(ImageView::default()))
    }

    fn default_view(&self) -> ObjectView {
        ObjectView::new(self.config.camera.eye(), self.config.camera.gaze())
    }

    /// Construct a window and try to bring it up
    ///
    /// The window always gets an id. It is registered only when its name is
    /// free and the backend hands out a surface; otherwise it stays Closed.
    fn open(&mut self, name: &str, width: u32, height: u32, kind: WindowKind) -> WindowId {
        let label = kind.label();
        let id = self
            .windows
            .insert(Window::new(name, kind, self.config.bindings.clone()));

        if self.registry.contains(name) {
            log::warn!("{} '{}' not opened: name already in use", label, name);
            return id;
        }

        let surface = match self.backend.create_surface(name, width, height) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("{} '{}' not opened: {}", label, name, e);
                return id;
            }
        };

        self.backend.make_current(surface);
        let canvas = self.backend.canvas();
        canvas.enable(RenderState::DEPTH_TEST);
        canvas.depth_func(DepthFunc::LessEqual);
        canvas.disable(RenderState::CULL_FACE);

        let window = &mut self.windows[id];
        window.attach_surface(surface);
        if let WindowKind::Image(view) = window.kind_mut() {
            view.set_texture(Some(canvas.create_texture()));
        }

        self.registry.insert(name, id);
        log::info!("{} '{}' opened ({}x{})", label, name, width, height);
        id
    }

    /// Close and remove a window, unlinking every object it held
    ///
    /// Also reclaims windows that already closed or never opened.
    pub fn destroy_window(&mut self, id: WindowId) -> bool {
        if !self.windows.contains_key(id) {
            return false;
        }
        self.teardown(id);
        if let Some(window) = self.windows.remove(id) {
            log::debug!("{} '{}' destroyed", window.kind().label(), window.name());
        }
        true
    }

    /// Release everything a window holds; it ends Closed
    fn teardown(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };

        self.registry.remove(window.name(), id);
        let released = self.links.purge_window(id);
        if !released.is_empty() {
            log::debug!("'{}' released {} object(s)", window.name(), released.len());
        }

        let Some(surface) = window.take_surface() else {
            return;
        };

        if let WindowKind::Image(view) = window.kind_mut() {
            view.set_image(None);
            if let Some(texture) = view.texture() {
                self.backend.make_current(surface);
                self.backend.canvas().delete_texture(texture);
            }
            view.set_texture(None);
        }

        self.backend.destroy_surface(surface);
    }

    // ---------------------------------------------------------------------
    // Objects
    // ---------------------------------------------------------------------

    /// Create a free-standing object
    pub fn create_object(&mut self, name: &str, shape: impl Into<Shape>) -> ObjectId {
        let object = Object::new(name, shape);
        log::debug!("{} '{}' created", object.shape().kind(), name);
        self.objects.insert(object)
    }

    /// Create a box with full extents `width` × `height` × `length`
    pub fn create_cube(&mut self, name: &str, width: f32, height: f32, length: f32) -> ObjectId {
        self.create_object(name, Cube::new(width, height, length))
    }

    /// Create a ground grid spanning `±size` with lines every `step`
    pub fn create_grid(&mut self, name: &str, size: f32, step: f32) -> ObjectId {
        self.create_object(name, Grid::new(size, step))
    }

    /// Create a frame gizmo with segments of length `size`
    pub fn create_axis(&mut self, name: &str, size: f32) -> ObjectId {
        self.create_object(name, Axis::new(size))
    }

    /// Create a poly-line through `nodes`
    pub fn create_path(&mut self, name: &str, nodes: Vec<Vec3>, color: Color) -> ObjectId {
        self.create_object(name, Path::from_nodes(nodes, color))
    }

    /// Unlink an object from every window and drop it
    pub fn destroy_object(&mut self, id: ObjectId) -> Option<Object> {
        self.links.purge_object(id);
        let object = self.objects.remove(id)?;
        log::debug!("{} '{}' destroyed", object.shape().kind(), object.name());
        Some(object)
    }

    /// Unlink an object from every window, keeping it alive
    pub fn detach_object(&mut self, id: ObjectId) -> usize {
        let windows = self.links.purge_object(id);
        if let Some(object) = self.objects.get(id) {
            log::debug!("'{}' detached from {} window(s)", object.name(), windows.len());
        }
        windows.len()
    }

    // ---------------------------------------------------------------------
    // Membership
    // ---------------------------------------------------------------------

    /// Link `object` into an open object window
    ///
    /// An object of the same name already in the window is unlinked from it.
    /// Returns false when the window is closed, holds no objects, or either
    /// handle is stale.
    pub fn add_object(&mut self, window: WindowId, object: ObjectId) -> bool {
        let (Some(w), Some(o)) = (self.windows.get(window), self.objects.get(object)) else {
            return false;
        };
        if !w.is_open() || !w.kind().holds_objects() {
            log::debug!("'{}' not added to {} '{}'", o.name(), w.kind().label(), w.name());
            return false;
        }

        if let Some(displaced) = self.links.link(window, w.name(), object, o.name()) {
            log::warn!(
                "'{}' replaced an object of the same name in '{}' ({:?})",
                o.name(),
                w.name(),
                displaced
            );
        }
        log::debug!("'{}' added to '{}'", o.name(), w.name());
        true
    }

    /// Unlink one window/object pair
    pub fn remove_object(&mut self, window: WindowId, object: ObjectId) -> bool {
        self.links.unlink(window, object)
    }

    // ---------------------------------------------------------------------
    // Per-tick driving
    // ---------------------------------------------------------------------

    /// True while any window is registered
    pub fn running(&self) -> bool {
        !self.registry.is_empty()
    }

    /// One tick: render every registered window, handle its input, then poll
    /// backend events once
    pub fn update(&mut self) {
        for id in self.registry.ids() {
            if self.render(id) {
                self.process_input(id);
            } else if self.config.update_policy == UpdatePolicy::StopOnClose {
                break;
            }
        }
        self.backend.poll_events();
    }

    /// Render one frame of `id`
    ///
    /// Returns false if the window is closed. The first call after the
    /// backend reports a close request tears the window down; the Closed
    /// window stays queryable until [`Manager::destroy_window`].
    pub fn render(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        let Some(surface) = window.surface() else {
            return false;
        };

        if self.backend.should_close(surface) {
            log::info!("{} '{}' closed", window.kind().label(), window.name());
            self.teardown(id);
            return false;
        }

        match window.kind() {
            WindowKind::Plain => {}
            WindowKind::Objects(view) | WindowKind::Camera(view) => {
                let view = *view;
                self.draw_objects(id, surface, &view);
            }
            WindowKind::Image(view) => {
                let view = view.clone();
                self.draw_image(surface, &view);
            }
        }
        true
    }

    fn draw_objects(&mut self, id: WindowId, surface: SurfaceId, view: &ObjectView) {
        let (width, height) = self.backend.drawable_size(surface);
        let camera = &self.config.camera;
        let clear = self.config.clear_color();
        let projection = Mat4::perspective(
            camera.fov_y_degrees,
            width as f64 / height as f64,
            camera.near,
            camera.far,
        );

        self.backend.make_current(surface);
        let canvas = self.backend.canvas();
        canvas.viewport(width, height);
        canvas.clear(clear);
        canvas.load_transform(&view.view_matrix());

        for (_, object) in self.links.objects_of(id) {
            if let Some(object) = self.objects.get(object) {
                object.draw(canvas);
            }
        }

        canvas.set_projection(&projection);
        self.backend.present(surface);
    }

    fn draw_image(&mut self, surface: SurfaceId, view: &ImageView) {
        let (Some(image), Some(texture)) = (view.image(), view.texture()) else {
            return;
        };

        let (width, height) = self.backend.drawable_size(surface);
        let (screen_w, screen_h) = self.backend.surface_size(surface);
        let clear = self.config.clear_color();

        self.backend.make_current(surface);
        let canvas = self.backend.canvas();
        canvas.viewport(width, height);
        canvas.clear(clear);
        canvas.set_projection(&Mat4::orthographic(
            0.0,
            screen_w as f64,
            screen_h as f64,
            0.0,
            -1.0,
            1.0,
        ));
        canvas.load_transform(&Mat4::identity());

        canvas.upload_texture(texture, image);
        canvas.enable(RenderState::TEXTURE_2D);
        canvas.draw_textured_quad(
            texture,
            TexturedQuad {
                min: [0.0, 0.0],
                max: [screen_w as f32, screen_h as f32],
                uv_max: [image.visible_u(), 1.0],
            },
        );
        canvas.disable(RenderState::TEXTURE_2D);
        self.backend.present(surface);
    }

    /// Apply the window's key bindings from current key state
    pub fn process_input(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        let Some(surface) = window.surface() else {
            return;
        };

        let backend = &mut self.backend;
        if KeyBindings::any_held(&window.bindings().close, |key| backend.key_pressed(surface, key)) {
            log::debug!("close requested for '{}'", window.name());
            backend.request_close(surface);
        }

        window.steer(self.config.camera.step, |key| backend.key_pressed(surface, key));
    }

    // ---------------------------------------------------------------------
    // Window state
    // ---------------------------------------------------------------------

    /// Replace the viewpoint of an object window
    pub fn set_camera(&mut self, id: WindowId, eye: Vec3, gaze: Vec3) -> bool {
        match self.windows.get_mut(id).and_then(|w| w.kind_mut().object_view_mut()) {
            Some(view) => {
                view.set(eye, gaze);
                true
            }
            None => false,
        }
    }

    /// Show `image` in an open image window
    pub fn set_image(&mut self, id: WindowId, image: Arc<ImageBuffer>) -> bool {
        self.replace_image(id, Some(image))
    }

    /// Stop showing any image
    pub fn clear_image(&mut self, id: WindowId) -> bool {
        self.replace_image(id, None)
    }

    fn replace_image(&mut self, id: WindowId, image: Option<Arc<ImageBuffer>>) -> bool {
        let Some(window) = self.windows.get_mut(id).filter(|w| w.is_open()) else {
            return false;
        };
        match window.kind_mut() {
            WindowKind::Image(view) => {
                view.set_image(image);
                true
            }
            _ => false,
        }
    }

    /// Replace one window's key bindings
    pub fn set_key_bindings(&mut self, id: WindowId, bindings: KeyBindings) -> bool {
        match self.windows.get_mut(id) {
            Some(window) => {
                window.set_bindings(bindings);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Window by handle, open or closed
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    /// Registered window by name
    pub fn find_window(&self, name: &str) -> Option<WindowId> {
        self.registry.get(name)
    }

    /// Registry of open windows
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Object by handle
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    /// Mutable object access for pose and shape changes
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    /// Objects linked into a window, by name
    pub fn window_objects(&self, id: WindowId) -> impl Iterator<Item = (&str, ObjectId)> + '_ {
        self.links.objects_of(id)
    }

    /// Windows an object is linked into, by name
    pub fn object_windows(&self, id: ObjectId) -> impl Iterator<Item = (&str, WindowId)> + '_ {
        self.links.windows_of(id)
    }

    /// Membership tables
    pub fn associations(&self) -> &Associations {
        &self.links
    }

    /// Active configuration
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: Backend> Drop for Manager<B> {
    fn drop(&mut self) {
        let open: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|(_, w)| w.is_open())
            .map(|(id, _)| id)
            .collect();
        if !open.is_empty() {
            log::debug!("Manager dropped with {} open window(s)", open.len());
        }
        for id in open {
            self.teardown(id);
        }
    }
}
