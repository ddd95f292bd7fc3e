//! Immediate-mode drawing interface
//!
//! A [`Canvas`] draws on whichever surface the backend last made current.
//! It mirrors a fixed-function pipeline: a model-view matrix stack, a
//! projection matrix, a handful of toggles and primitive submission.

use std::ops::{Deref, DerefMut};

use bitflags::bitflags;

use crate::foundation::math::Mat4;
use crate::render::ImageBuffer;

/// RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// White
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Pure red
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    /// Pure green
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    /// Pure blue
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a color from components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// One vertex of a primitive submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in the current model-view frame
    pub position: [f32; 3],
    /// Vertex color
    pub color: Color,
    /// Optional normal
    pub normal: Option<[f32; 3]>,
}

impl Vertex {
    /// Create an unlit vertex
    pub const fn new(position: [f32; 3], color: Color) -> Self {
        Self { position, color, normal: None }
    }

    /// Attach a normal
    pub fn with_normal(mut self, normal: [f32; 3]) -> Self {
        self.normal = Some(normal);
        self
    }
}

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Independent points
    Points,
    /// Independent segments, two vertices each
    Lines,
    /// Connected poly-line
    LineStrip,
    /// Independent quads, four vertices each
    Quads,
}

bitflags! {
    /// Pipeline toggles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderState: u32 {
        /// Depth testing
        const DEPTH_TEST = 1 << 0;
        /// Fixed-function lighting
        const LIGHTING = 1 << 1;
        /// 2D texturing
        const TEXTURE_2D = 1 << 2;
        /// Back-face culling
        const CULL_FACE = 1 << 3;
    }
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFunc {
    /// Pass when nearer or equal
    LessEqual,
    /// Always pass
    Always,
}

/// Backend texture handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Axis-aligned textured quad in the current projection's coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedQuad {
    /// Top-left corner
    pub min: [f32; 2],
    /// Bottom-right corner
    pub max: [f32; 2],
    /// Texture coordinate at `max` (`min` maps to `(0, 0)`)
    pub uv_max: [f32; 2],
}

/// Immediate-mode drawing surface
pub trait Canvas {
    /// Set the viewport to the drawable area
    fn viewport(&mut self, width: u32, height: u32);

    /// Clear color and depth
    fn clear(&mut self, color: Color);

    /// Current model-view transform
    fn transform(&self) -> Mat4;

    /// Replace the current model-view transform
    fn load_transform(&mut self, transform: &Mat4);

    /// Save the current model-view transform
    fn push_transform(&mut self);

    /// Restore the last saved model-view transform
    fn pop_transform(&mut self);

    /// Replace the projection transform
    fn set_projection(&mut self, projection: &Mat4);

    /// Enable pipeline toggles
    fn enable(&mut self, state: RenderState);

    /// Disable pipeline toggles
    fn disable(&mut self, state: RenderState);

    /// Set the depth comparison function
    fn depth_func(&mut self, func: DepthFunc);

    /// Set the rasterized line width
    fn line_width(&mut self, width: f32);

    /// Set the rasterized point size
    fn point_size(&mut self, size: f32);

    /// Submit a primitive batch
    fn draw(&mut self, primitive: Primitive, vertices: &[Vertex]);

    /// Allocate a texture on the current surface
    fn create_texture(&mut self) -> TextureId;

    /// Upload an image into a texture
    fn upload_texture(&mut self, texture: TextureId, image: &ImageBuffer);

    /// Draw a textured quad
    fn draw_textured_quad(&mut self, texture: TextureId, quad: TexturedQuad);

    /// Release a texture
    fn delete_texture(&mut self, texture: TextureId);
}

/// Scoped model-view save/restore
///
/// Pushes on creation and pops on drop, so the prior transform comes back on
/// every exit path, including unwinding out of a shape's draw step.
pub struct TransformScope<'a> {
    canvas: &'a mut dyn Canvas,
}

impl<'a> TransformScope<'a> {
    /// Save the current transform of `canvas`
    pub fn new(canvas: &'a mut dyn Canvas) -> Self {
        canvas.push_transform();
        Self { canvas }
    }
}

impl<'a> Deref for TransformScope<'a> {
    type Target = dyn Canvas + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.canvas
    }
}

impl<'a> DerefMut for TransformScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.canvas
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.canvas.pop_transform();
    }
}
