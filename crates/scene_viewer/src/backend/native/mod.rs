//! Native windows using GLFW
//!
//! Each surface is a GLFW window with its own compatibility-profile OpenGL
//! context. Drawing goes through the legacy fixed-function entry points in
//! [`gl`], resolved per context when the surface is created.

mod gl;

use std::cell::RefCell;
use std::ffi::c_void;
use std::rc::Rc;

use ::glfw::Context;
use slotmap::SlotMap;

use self::gl::Gl;
use super::{
    Backend, BackendError, BackendResult, Canvas, Color, DepthFunc, Primitive, RenderState,
    SurfaceId, TextureId, TexturedQuad, Vertex,
};
use crate::foundation::math::Mat4;
use crate::input::Key;
use crate::render::{ImageBuffer, PixelLayout, SampleType};

struct NativeSurface {
    window: ::glfw::PWindow,
    events: ::glfw::GlfwReceiver<(f64, ::glfw::WindowEvent)>,
    gl: Gl,
}

/// Last error reported through the GLFW error callback
///
/// GLFW reports failures out of band, so the callback logs each one and
/// keeps the latest description for the call that failed.
#[derive(Clone, Default)]
struct ErrorSink(Rc<RefCell<Option<String>>>);

impl ErrorSink {
    fn record(&self, error: ::glfw::Error, description: String) {
        log::warn!("GLFW error {:?}: {}", error, description);
        *self.0.borrow_mut() = Some(description);
    }

    fn take(&self) -> Option<String> {
        self.0.borrow_mut().take()
    }
}

/// GLFW windowing backend with legacy OpenGL drawing
///
/// Must be created and used on the main thread.
pub struct GlfwBackend {
    glfw: ::glfw::Glfw,
    errors: ErrorSink,
    surfaces: SlotMap<SurfaceId, NativeSurface>,
    current: Option<SurfaceId>,
}

impl GlfwBackend {
    /// Initialize GLFW
    ///
    /// `samples` is the multisample count requested for every surface;
    /// 0 disables multisampling.
    pub fn new(samples: u32) -> BackendResult<Self> {
        let errors = ErrorSink::default();
        let sink = errors.clone();
        let mut glfw = ::glfw::init(move |error, description| sink.record(error, description))
            .map_err(|e| match errors.take() {
                Some(description) => BackendError::InitializationFailed(description),
                None => BackendError::InitializationFailed(format!("{e:?}")),
            })?;

        glfw.window_hint(::glfw::WindowHint::ClientApi(::glfw::ClientApiHint::OpenGl));
        glfw.window_hint(::glfw::WindowHint::ContextVersion(2, 1));
        glfw.window_hint(::glfw::WindowHint::Samples((samples > 0).then_some(samples)));

        log::info!("GLFW initialized ({} samples)", samples);

        Ok(Self {
            glfw,
            errors,
            surfaces: SlotMap::with_key(),
            current: None,
        })
    }

    fn gl(&self) -> Option<&Gl> {
        self.current
            .and_then(|id| self.surfaces.get(id))
            .map(|surface| &surface.gl)
    }
}

fn glfw_key(key: Key) -> ::glfw::Key {
    match key {
        Key::Escape => ::glfw::Key::Escape,
        Key::A => ::glfw::Key::A,
        Key::D => ::glfw::Key::D,
        Key::E => ::glfw::Key::E,
        Key::Q => ::glfw::Key::Q,
        Key::S => ::glfw::Key::S,
        Key::W => ::glfw::Key::W,
        Key::X => ::glfw::Key::X,
        Key::Z => ::glfw::Key::Z,
        Key::ArrowUp => ::glfw::Key::Up,
        Key::ArrowDown => ::glfw::Key::Down,
        Key::ArrowLeft => ::glfw::Key::Left,
        Key::ArrowRight => ::glfw::Key::Right,
        Key::Space => ::glfw::Key::Space,
    }
}

fn surface_error(name: &str, reported: Option<String>) -> BackendError {
    match reported {
        Some(description) => BackendError::Glfw(format!("cannot open '{name}': {description}")),
        None => BackendError::SurfaceCreationFailed { name: name.to_string() },
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn to_u32((width, height): (i32, i32)) -> (u32, u32) {
    (width.max(0) as u32, height.max(0) as u32)
}

impl Backend for GlfwBackend {
    fn create_surface(&mut self, name: &str, width: u32, height: u32) -> BackendResult<SurfaceId> {
        self.errors.take();
        let (mut window, events) = self
            .glfw
            .create_window(width, height, name, ::glfw::WindowMode::Windowed)
            .ok_or_else(|| surface_error(name, self.errors.take()))?;

        window.make_current();
        let gl = Gl::load(|symbol| window.get_proc_address(symbol) as *const c_void)?;

        let id = self.surfaces.insert(NativeSurface { window, events, gl });
        self.current = Some(id);
        Ok(id)
    }

    fn make_current(&mut self, surface: SurfaceId) {
        if let Some(s) = self.surfaces.get_mut(surface) {
            s.window.make_current();
            self.current = Some(surface);
        }
    }

    fn poll_events(&mut self) {
        self.glfw.poll_events();
        // Key state is read by polling, queued events are not used
        for surface in self.surfaces.values() {
            for _ in ::glfw::flush_messages(&surface.events) {}
        }
    }

    fn present(&mut self, surface: SurfaceId) {
        if let Some(s) = self.surfaces.get_mut(surface) {
            s.window.swap_buffers();
        }
    }

    fn should_close(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(surface).map_or(true, |s| s.window.should_close())
    }

    fn request_close(&mut self, surface: SurfaceId) {
        if let Some(s) = self.surfaces.get_mut(surface) {
            s.window.set_should_close(true);
        }
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        // Dropping the window destroys it
        self.surfaces.remove(surface);
        if self.current == Some(surface) {
            self.current = None;
        }
    }

    fn key_pressed(&self, surface: SurfaceId, key: Key) -> bool {
        self.surfaces
            .get(surface)
            .is_some_and(|s| s.window.get_key(glfw_key(key)) == ::glfw::Action::Press)
    }

    fn surface_size(&self, surface: SurfaceId) -> (u32, u32) {
        self.surfaces.get(surface).map_or((0, 0), |s| to_u32(s.window.get_size()))
    }

    fn drawable_size(&self, surface: SurfaceId) -> (u32, u32) {
        self.surfaces
            .get(surface)
            .map_or((0, 0), |s| to_u32(s.window.get_framebuffer_size()))
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        self
    }
}

fn state_caps(state: RenderState) -> impl Iterator<Item = gl::GLenum> {
    [
        (RenderState::DEPTH_TEST, gl::DEPTH_TEST),
        (RenderState::LIGHTING, gl::LIGHTING),
        (RenderState::TEXTURE_2D, gl::TEXTURE_2D),
        (RenderState::CULL_FACE, gl::CULL_FACE),
    ]
    .into_iter()
    .filter(move |(flag, _)| state.contains(*flag))
    .map(|(_, cap)| cap)
}

fn pixel_format(layout: PixelLayout) -> gl::GLenum {
    match layout {
        PixelLayout::Luminance => gl::LUMINANCE,
        PixelLayout::Rgb => gl::RGB,
        PixelLayout::Bgr => gl::BGR,
        PixelLayout::Rgba => gl::RGBA,
        PixelLayout::Bgra => gl::BGRA,
    }
}

fn sample_type(sample: SampleType) -> gl::GLenum {
    match sample {
        SampleType::U8 => gl::UNSIGNED_BYTE,
        SampleType::U16 => gl::UNSIGNED_SHORT,
        SampleType::F32 => gl::FLOAT,
    }
}

impl Canvas for GlfwBackend {
    fn viewport(&mut self, width: u32, height: u32) {
        if let Some(gl) = self.gl() {
            unsafe { (gl.Viewport)(0, 0, to_i32(width), to_i32(height)) };
        }
    }

    fn clear(&mut self, color: Color) {
        if let Some(gl) = self.gl() {
            unsafe {
                (gl.ClearColor)(color.r, color.g, color.b, 1.0);
                (gl.Clear)(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
            }
        }
    }

    fn transform(&self) -> Mat4 {
        let mut values = [0.0_f64; 16];
        match self.gl() {
            Some(gl) => {
                unsafe { (gl.GetDoublev)(gl::MODELVIEW_MATRIX, values.as_mut_ptr()) };
                Mat4::from_column_slice(&values)
            }
            None => Mat4::identity(),
        }
    }

    fn load_transform(&mut self, transform: &Mat4) {
        if let Some(gl) = self.gl() {
            unsafe {
                (gl.MatrixMode)(gl::MODELVIEW);
                (gl.LoadMatrixd)(transform.as_slice().as_ptr());
            }
        }
    }

    fn push_transform(&mut self) {
        if let Some(gl) = self.gl() {
            unsafe {
                (gl.MatrixMode)(gl::MODELVIEW);
                (gl.PushMatrix)();
            }
        }
    }

    fn pop_transform(&mut self) {
        if let Some(gl) = self.gl() {
            unsafe {
                (gl.MatrixMode)(gl::MODELVIEW);
                (gl.PopMatrix)();
            }
        }
    }

    fn set_projection(&mut self, projection: &Mat4) {
        if let Some(gl) = self.gl() {
            unsafe {
                (gl.MatrixMode)(gl::PROJECTION);
                (gl.LoadMatrixd)(projection.as_slice().as_ptr());
                (gl.MatrixMode)(gl::MODELVIEW);
            }
        }
    }

    fn enable(&mut self, state: RenderState) {
        if let Some(gl) = self.gl() {
            for cap in state_caps(state) {
                unsafe { (gl.Enable)(cap) };
            }
        }
    }

    fn disable(&mut self, state: RenderState) {
        if let Some(gl) = self.gl() {
            for cap in state_caps(state) {
                unsafe { (gl.Disable)(cap) };
            }
        }
    }

    fn depth_func(&mut self, func: DepthFunc) {
        if let Some(gl) = self.gl() {
            let func = match func {
                DepthFunc::LessEqual => gl::LEQUAL,
                DepthFunc::Always => gl::ALWAYS,
            };
            unsafe { (gl.DepthFunc)(func) };
        }
    }

    fn line_width(&mut self, width: f32) {
        if let Some(gl) = self.gl() {
            unsafe { (gl.LineWidth)(width) };
        }
    }

    fn point_size(&mut self, size: f32) {
        if let Some(gl) = self.gl() {
            unsafe { (gl.PointSize)(size) };
        }
    }

    fn draw(&mut self, primitive: Primitive, vertices: &[Vertex]) {
        let Some(gl) = self.gl() else { return };
        let mode = match primitive {
            Primitive::Points => gl::POINTS,
            Primitive::Lines => gl::LINES,
            Primitive::LineStrip => gl::LINE_STRIP,
            Primitive::Quads => gl::QUADS,
        };

        unsafe {
            (gl.Begin)(mode);
            for vertex in vertices {
                let Color { r, g, b } = vertex.color;
                (gl.Color3f)(r, g, b);
                if let Some([nx, ny, nz]) = vertex.normal {
                    (gl.Normal3f)(nx, ny, nz);
                }
                let [x, y, z] = vertex.position;
                (gl.Vertex3f)(x, y, z);
            }
            (gl.End)();
        }
    }

    fn create_texture(&mut self) -> TextureId {
        let mut texture: gl::GLuint = 0;
        if let Some(gl) = self.gl() {
            unsafe { (gl.GenTextures)(1, &mut texture) };
        }
        TextureId(texture)
    }

    fn upload_texture(&mut self, texture: TextureId, image: &ImageBuffer) {
        let Some(gl) = self.gl() else { return };
        let format = image.format();

        unsafe {
            (gl.BindTexture)(gl::TEXTURE_2D, texture.0);
            (gl.PixelStorei)(gl::UNPACK_ALIGNMENT, image.unpack_alignment());
            (gl.PixelStorei)(gl::UNPACK_ROW_LENGTH, i32::try_from(image.row_length()).unwrap_or(0));
            (gl.TexImage2D)(
                gl::TEXTURE_2D,
                0,
                gl::RGB as gl::GLint,
                i32::try_from(image.row_length()).unwrap_or(0),
                to_i32(image.height()),
                0,
                pixel_format(format.layout),
                sample_type(format.sample),
                image.data().as_ptr().cast::<c_void>(),
            );
            (gl.TexParameteri)(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR);
            (gl.TexParameteri)(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR);
            (gl.TexParameteri)(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP);
            (gl.TexParameteri)(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP);
            (gl.PixelStorei)(gl::UNPACK_ROW_LENGTH, 0);
            (gl.BindTexture)(gl::TEXTURE_2D, 0);
        }
    }

    fn draw_textured_quad(&mut self, texture: TextureId, quad: TexturedQuad) {
        let Some(gl) = self.gl() else { return };
        let [x0, y0] = quad.min;
        let [x1, y1] = quad.max;
        let [u1, v1] = quad.uv_max;

        unsafe {
            (gl.BindTexture)(gl::TEXTURE_2D, texture.0);
            (gl.Enable)(gl::TEXTURE_2D);
            (gl.Color3f)(1.0, 1.0, 1.0);
            (gl.Begin)(gl::QUADS);
            (gl.TexCoord2f)(0.0, 0.0);
            (gl.Vertex2f)(x0, y0);
            (gl.TexCoord2f)(u1, 0.0);
            (gl.Vertex2f)(x1, y0);
            (gl.TexCoord2f)(u1, v1);
            (gl.Vertex2f)(x1, y1);
            (gl.TexCoord2f)(0.0, v1);
            (gl.Vertex2f)(x0, y1);
            (gl.End)();
            (gl.Disable)(gl::TEXTURE_2D);
            (gl.BindTexture)(gl::TEXTURE_2D, 0);
        }
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if let Some(gl) = self.gl() {
            unsafe { (gl.DeleteTextures)(1, &texture.0) };
        }
    }
}

impl Drop for GlfwBackend {
    fn drop(&mut self) {
        let count = self.surfaces.len();
        self.surfaces.clear();
        log::debug!("GLFW backend shut down ({} surfaces released)", count);
    }
}
