//! Manager-level tests driven through the headless backend

mod lifecycle;
mod scenarios;

use crate::backend::{HeadlessBackend, SurfaceId};
use crate::config::ViewerConfig;
use crate::window::WindowId;
use crate::Manager;

fn headless_manager() -> Manager<HeadlessBackend> {
    Manager::new(HeadlessBackend::new(), ViewerConfig::default())
}

fn surface_of<B: crate::backend::Backend>(manager: &Manager<B>, window: WindowId) -> SurfaceId {
    manager
        .window(window)
        .and_then(|w| w.surface())
        .expect("window should be open")
}
