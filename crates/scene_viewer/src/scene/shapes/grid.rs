//! Ground grid in the plane perpendicular to the up axis

use crate::backend::{Canvas, Color, Primitive, RenderState, Vertex};

const LINE_COLOR: Color = Color::new(0.3, 0.3, 0.3);
const X_AXIS_COLOR: Color = Color::new(0.5, 0.0, 0.0);
const Z_AXIS_COLOR: Color = Color::new(0.0, 0.0, 0.5);

/// Upper bound on lines drawn on each side of an axis
pub const MAX_LINES_PER_SIDE: usize = 10_000;

/// Square line grid spanning `±size` on x and z with lines every `step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    size: f32,
    step: f32,
}

impl Grid {
    /// Create a grid
    pub fn new(size: f32, step: f32) -> Self {
        Self { size, step }
    }

    /// Half extent
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Line spacing
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Number of grid lines on each side of an axis
    ///
    /// A non-positive step draws only the two axis lines. The count is
    /// capped at [`MAX_LINES_PER_SIDE`].
    pub fn lines_per_side(&self) -> usize {
        self.unclamped_lines().min(MAX_LINES_PER_SIDE)
    }

    fn unclamped_lines(&self) -> usize {
        if !(self.step > 0.0 && self.size > 0.0) {
            return 0;
        }
        // Tolerate accumulated rounding at the outermost line
        let ratio = (self.size / self.step) + 1e-4;
        if ratio.is_finite() {
            ratio.floor() as usize
        } else {
            usize::MAX
        }
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas) {
        let size = self.size;
        let lines = self.lines_per_side();
        if lines < self.unclamped_lines() {
            log::warn!(
                "Grid of size {} with step {} clamped to {} lines per side",
                self.size,
                self.step,
                lines
            );
        }
        let mut vertices = Vec::with_capacity(lines.saturating_mul(8).saturating_add(4));

        for k in 1..=lines {
            let i = k as f32 * self.step;
            // parallel to x
            vertices.push(Vertex::new([-size, 0.0, i], LINE_COLOR));
            vertices.push(Vertex::new([size, 0.0, i], LINE_COLOR));
            vertices.push(Vertex::new([-size, 0.0, -i], LINE_COLOR));
            vertices.push(Vertex::new([size, 0.0, -i], LINE_COLOR));
            // parallel to z
            vertices.push(Vertex::new([i, 0.0, -size], LINE_COLOR));
            vertices.push(Vertex::new([i, 0.0, size], LINE_COLOR));
            vertices.push(Vertex::new([-i, 0.0, -size], LINE_COLOR));
            vertices.push(Vertex::new([-i, 0.0, size], LINE_COLOR));
        }

        vertices.push(Vertex::new([-size, 0.0, 0.0], X_AXIS_COLOR));
        vertices.push(Vertex::new([size, 0.0, 0.0], X_AXIS_COLOR));
        vertices.push(Vertex::new([0.0, 0.0, -size], Z_AXIS_COLOR));
        vertices.push(Vertex::new([0.0, 0.0, size], Z_AXIS_COLOR));

        canvas.disable(RenderState::LIGHTING);
        canvas.draw(Primitive::Lines, &vertices);
        canvas.enable(RenderState::LIGHTING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, DrawCommand, HeadlessBackend};

    fn drawn_lines(grid: Grid) -> Vec<Vertex> {
        let mut backend = HeadlessBackend::new();
        let s = backend.create_surface("s", 10, 10).unwrap();
        backend.make_current(s);
        grid.draw(backend.canvas());
        backend.present(s);

        backend
            .last_frame(s)
            .iter()
            .find_map(|c| match c {
                DrawCommand::Draw { primitive: Primitive::Lines, vertices, .. } => Some(vertices.clone()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_grid_line_count() {
        let grid = Grid::new(10.0, 1.0);
        assert_eq!(grid.lines_per_side(), 10);

        // 4 lines per step plus the two axes, 2 vertices each
        let vertices = drawn_lines(grid);
        assert_eq!(vertices.len(), (10 * 4 + 2) * 2);
        assert!(vertices.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn test_grid_non_dividing_step() {
        let grid = Grid::new(1.0, 0.3);
        assert_eq!(grid.lines_per_side(), 3);
    }

    #[test]
    fn test_grid_zero_step_draws_axes_only() {
        let vertices = drawn_lines(Grid::new(5.0, 0.0));
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].color, X_AXIS_COLOR);
        assert_eq!(vertices[2].color, Z_AXIS_COLOR);
    }

    #[test]
    fn test_grid_line_count_is_capped() {
        let grid = Grid::new(f32::MAX, f32::MIN_POSITIVE);
        assert_eq!(grid.lines_per_side(), MAX_LINES_PER_SIDE);

        let vertices = drawn_lines(grid);
        assert_eq!(vertices.len(), (MAX_LINES_PER_SIDE * 4 + 2) * 2);
    }

    #[test]
    fn test_grid_nan_step_draws_axes_only() {
        let grid = Grid::new(5.0, f32::NAN);
        assert_eq!(grid.lines_per_side(), 0);
        assert_eq!(drawn_lines(grid).len(), 4);
    }
}
