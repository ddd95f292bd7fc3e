//! Coordinate-frame gizmo drawn on top of everything

use crate::backend::{Canvas, Color, DepthFunc, Primitive, RenderState, TransformScope, Vertex};

/// Three colored segments along x (red), y (green) and z (blue)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    size: f32,
}

impl Axis {
    /// Create an axis gizmo with segments of length `size`
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    /// Segment length
    pub fn size(&self) -> f32 {
        self.size
    }

    fn endpoints(&self) -> [([f32; 3], Color); 3] {
        let s = self.size;
        [
            ([s, 0.0, 0.0], Color::RED),
            ([0.0, s, 0.0], Color::GREEN),
            ([0.0, 0.0, s], Color::BLUE),
        ]
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas) {
        let segments: Vec<Vertex> = self
            .endpoints()
            .iter()
            .flat_map(|(end, color)| [Vertex::new([0.0; 3], *color), Vertex::new(*end, *color)])
            .collect();
        let markers: Vec<Vertex> = self
            .endpoints()
            .iter()
            .map(|(end, color)| Vertex::new(*end, *color))
            .collect();

        canvas.depth_func(DepthFunc::Always);
        canvas.disable(RenderState::LIGHTING);
        {
            let mut scope = TransformScope::new(canvas);

            scope.line_width(3.0);
            scope.draw(Primitive::Lines, &segments);
            scope.line_width(1.0);

            scope.point_size(5.0);
            scope.draw(Primitive::Points, &markers);
            scope.point_size(1.0);
        }
        canvas.enable(RenderState::LIGHTING);
        canvas.depth_func(DepthFunc::LessEqual);
    }
}
