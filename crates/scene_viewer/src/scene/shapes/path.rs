//! Poly-line through an ordered list of points

use crate::backend::{Canvas, Color, Primitive, RenderState, Vertex};
use crate::foundation::math::Vec3;

/// Connected line through `nodes`, drawn in one color
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    nodes: Vec<Vec3>,
    color: Color,
}

impl Path {
    /// Create an empty path
    pub fn new(color: Color) -> Self {
        Self { nodes: Vec::new(), color }
    }

    /// Create a path through `nodes`
    pub fn from_nodes(nodes: Vec<Vec3>, color: Color) -> Self {
        Self { nodes, color }
    }

    /// Append a point
    pub fn add_node(&mut self, node: Vec3) {
        self.nodes.push(node);
    }

    /// Points in drawing order
    pub fn nodes(&self) -> &[Vec3] {
        &self.nodes
    }

    /// Drop every point
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Line color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Change the line color
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas) {
        if self.nodes.len() < 2 {
            return;
        }

        let vertices: Vec<Vertex> = self
            .nodes
            .iter()
            .map(|node| {
                let p = node.cast::<f32>();
                Vertex::new([p.x, p.y, p.z], self.color)
            })
            .collect();

        canvas.disable(RenderState::LIGHTING);
        canvas.draw(Primitive::LineStrip, &vertices);
        canvas.enable(RenderState::LIGHTING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, DrawCommand, HeadlessBackend};

    fn frame_for(path: &Path) -> Vec<DrawCommand> {
        let mut backend = HeadlessBackend::new();
        let s = backend.create_surface("s", 10, 10).unwrap();
        backend.make_current(s);
        path.draw(backend.canvas());
        backend.present(s);
        backend.last_frame(s).to_vec()
    }

    #[test]
    fn test_short_paths_draw_nothing() {
        let mut path = Path::new(Color::WHITE);
        assert!(frame_for(&path).is_empty());

        path.add_node(Vec3::new(1.0, 2.0, 3.0));
        assert!(frame_for(&path).is_empty());
    }

    #[test]
    fn test_path_strip() {
        let mut path = Path::from_nodes(
            vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)],
            Color::RED,
        );
        path.set_color(Color::GREEN);

        let frame = frame_for(&path);
        let vertices = frame
            .iter()
            .find_map(|c| match c {
                DrawCommand::Draw { primitive: Primitive::LineStrip, vertices, .. } => Some(vertices),
                _ => None,
            })
            .unwrap();

        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[2].position, [1.0, 1.0, 0.0]);
        assert!(vertices.iter().all(|v| v.color == Color::GREEN));
    }
}
