//! Solid box with one color per face

use crate::backend::{Canvas, Color, Primitive, RenderState, Vertex};

/// Axis-aligned box centered on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    half_width: f32,
    half_height: f32,
    half_length: f32,
}

// (color, outward normal, corner signs in winding order)
const FACES: [(Color, [f32; 3], [[f32; 3]; 4]); 6] = [
    // top
    (Color::new(1.0, 0.0, 0.0), [0.0, 1.0, 0.0],
        [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
    // front
    (Color::new(0.0, 1.0, 0.0), [0.0, 0.0, 1.0],
        [[1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0]]),
    // right
    (Color::new(0.0, 0.0, 1.0), [1.0, 0.0, 0.0],
        [[1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0]]),
    // left
    (Color::new(0.0, 0.0, 0.5), [-1.0, 0.0, 0.0],
        [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0]]),
    // bottom
    (Color::new(0.5, 0.0, 0.0), [0.0, -1.0, 0.0],
        [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0]]),
    // back
    (Color::new(0.0, 0.5, 0.0), [0.0, 0.0, -1.0],
        [[1.0, 1.0, -1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0]]),
];

impl Cube {
    /// Create a box with full extents `width` (x), `height` (y), `length` (z)
    pub fn new(width: f32, height: f32, length: f32) -> Self {
        Self {
            half_width: width / 2.0,
            half_height: height / 2.0,
            half_length: length / 2.0,
        }
    }

    /// Half extents along x, y, z
    pub fn half_extents(&self) -> [f32; 3] {
        [self.half_width, self.half_height, self.half_length]
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas) {
        let [hx, hy, hz] = self.half_extents();
        let vertices: Vec<Vertex> = FACES
            .iter()
            .flat_map(|(color, normal, corners)| {
                corners.iter().map(move |[sx, sy, sz]| {
                    Vertex::new([sx * hx, sy * hy, sz * hz], *color).with_normal(*normal)
                })
            })
            .collect();

        canvas.disable(RenderState::LIGHTING);
        canvas.draw(Primitive::Quads, &vertices);
        canvas.enable(RenderState::LIGHTING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, DrawCommand, HeadlessBackend};

    #[test]
    fn test_cube_faces() {
        let mut backend = HeadlessBackend::new();
        let s = backend.create_surface("s", 10, 10).unwrap();
        backend.make_current(s);

        Cube::new(2.0, 4.0, 6.0).draw(backend.canvas());
        backend.present(s);

        let vertices = backend
            .last_frame(s)
            .iter()
            .find_map(|c| match c {
                DrawCommand::Draw { primitive: Primitive::Quads, vertices, .. } => Some(vertices.clone()),
                _ => None,
            })
            .unwrap();

        assert_eq!(vertices.len(), 24);
        for v in &vertices {
            let [x, y, z] = v.position;
            assert_eq!((x.abs(), y.abs(), z.abs()), (1.0, 2.0, 3.0));
        }

        // Each face's normal points outward: every corner lies on the positive side
        for face in vertices.chunks(4) {
            let normal = face[0].normal.unwrap();
            let color = face[0].color;
            for v in face {
                assert_eq!(v.normal, Some(normal));
                assert_eq!(v.color, color);
                let dot: f32 = v.position.iter().zip(normal).map(|(p, n)| p * n).sum();
                assert!(dot > 0.0);
            }
        }
    }
}
