//! Drawable shape variants

mod axis;
mod cube;
mod grid;
mod path;

pub use axis::Axis;
pub use cube::Cube;
pub use grid::Grid;
pub use path::Path;

use crate::backend::Canvas;

/// Geometry an object draws in its local frame
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Shape {
    /// Nothing
    #[default]
    Empty,
    /// Colored box
    Cube(Cube),
    /// Ground grid
    Grid(Grid),
    /// Frame gizmo
    Axis(Axis),
    /// Poly-line
    Path(Path),
}

impl Shape {
    /// Emit the shape's primitives in the current model-view frame
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        match self {
            Shape::Empty => {}
            Shape::Cube(cube) => cube.draw(canvas),
            Shape::Grid(grid) => grid.draw(canvas),
            Shape::Axis(axis) => axis.draw(canvas),
            Shape::Path(path) => path.draw(canvas),
        }
    }

    /// Short variant name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Empty => "empty",
            Shape::Cube(_) => "cube",
            Shape::Grid(_) => "grid",
            Shape::Axis(_) => "axis",
            Shape::Path(_) => "path",
        }
    }
}

impl From<Cube> for Shape {
    fn from(cube: Cube) -> Self {
        Shape::Cube(cube)
    }
}

impl From<Grid> for Shape {
    fn from(grid: Grid) -> Self {
        Shape::Grid(grid)
    }
}

impl From<Axis> for Shape {
    fn from(axis: Axis) -> Self {
        Shape::Axis(axis)
    }
}

impl From<Path> for Shape {
    fn from(path: Path) -> Self {
        Shape::Path(path)
    }
}
