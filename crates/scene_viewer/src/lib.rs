//! # Scene Viewer
//!
//! Window and scene-object lifecycle management for real-time visualization
//! loops.
//!
//! ## Features
//!
//! - **Window registry**: named windows that register on open and drop out
//!   when the user closes them
//! - **Object windows**: render a set of posed objects (cubes, grids, axis
//!   gizmos, paths) from a keyboard-steerable camera
//! - **Image windows**: show an externally produced frame buffer
//! - **Pluggable backends**: native GLFW windows or an in-memory headless
//!   backend for tests and off-screen runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_viewer::prelude::*;
//!
//! let mut manager = Manager::new(HeadlessBackend::new(), ViewerConfig::default());
//! let main = manager.create_camera_window("main", 640, 480);
//!
//! let grid = manager.create_grid("floor", 10.0, 1.0);
//! let cube = manager.create_cube("c1", 2.0, 2.0, 2.0);
//! manager.add_object(main, grid);
//! manager.add_object(main, cube);
//!
//! if let Some(cube) = manager.object_mut(cube) {
//!     cube.translate(&Vec3::new(0.0, 1.0, 0.0));
//! }
//!
//! while manager.running() {
//!     manager.update();
//! }
//! ```
//!
//! Everything runs on the thread that created the backend.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::new_without_default)]

pub mod backend;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;
pub mod window;

mod manager;

pub use manager::Manager;

#[cfg(test)]
mod tests;

/// Common imports for viewer users
pub mod prelude {
    pub use crate::{
        backend::{Backend, BackendError, Color, HeadlessBackend},
        config::{CameraConfig, Config, UpdatePolicy, ViewerConfig},
        foundation::math::{Pose, Quat, Vec3},
        input::{Key, KeyBindings},
        render::{ImageBuffer, PixelFormat},
        scene::{Frame, Object, ObjectId, Shape},
        window::{WindowId, WindowState},
        Manager,
    };

    #[cfg(feature = "glfw")]
    pub use crate::backend::GlfwBackend;
}
