//! Scene content: objects, their shapes and window membership

mod association;
mod object;
pub mod shapes;

pub use association::Associations;
pub use object::{Frame, Object, ObjectId};
pub use shapes::{Axis, Cube, Grid, Path, Shape};
