//! Window open/close lifecycle, registry and update policy

use super::{headless_manager, surface_of};
use crate::backend::{Backend, DepthFunc, DrawCommand, HeadlessBackend, RenderState};
use crate::config::{UpdatePolicy, ViewerConfig};
use crate::foundation::math::Vec3;
use crate::input::{Key, KeyBindings};
use crate::window::WindowState;
use crate::Manager;
use approx::assert_relative_eq;

#[test]
fn test_running_tracks_registry() {
    let mut manager = headless_manager();
    assert!(!manager.running());

    let a = manager.create_window("a", 100, 100);
    let b = manager.create_object_window("b", 100, 100);
    assert!(manager.running());
    assert_eq!(manager.registry().len(), 2);

    manager.destroy_window(a);
    assert!(manager.running());

    let surface = surface_of(&manager, b);
    manager.backend_mut().request_close(surface);
    manager.update();
    assert!(!manager.running());
    assert!(manager.registry().is_empty());
}

#[test]
fn test_close_is_reported_exactly_once() {
    let mut manager = headless_manager();
    let main = manager.create_object_window("main", 640, 480);
    let surface = surface_of(&manager, main);

    assert!(manager.render(main));
    manager.backend_mut().request_close(surface);

    assert!(!manager.render(main));
    assert_eq!(manager.window(main).map(|w| w.state()), Some(WindowState::Closed));
    assert!(manager.find_window("main").is_none());
    assert!(!manager.backend().is_alive(surface));
    assert_eq!(manager.backend().destroyed_surfaces(), 1);

    // no further side effects
    assert!(!manager.render(main));
    assert_eq!(manager.backend().destroyed_surfaces(), 1);
}

#[test]
fn test_surface_failure_leaves_window_inert() {
    let mut manager = headless_manager();
    manager.backend_mut().set_refuse_surfaces(true);

    let main = manager.create_object_window("main", 640, 480);
    let cube = manager.create_cube("c1", 1.0, 1.0, 1.0);

    assert_eq!(manager.window(main).map(|w| w.state()), Some(WindowState::Closed));
    assert!(!manager.running());
    assert!(!manager.render(main));
    assert!(!manager.add_object(main, cube));
    assert_eq!(manager.object_windows(cube).count(), 0);

    // the name is still free for a later window
    manager.backend_mut().set_refuse_surfaces(false);
    let retry = manager.create_object_window("main", 640, 480);
    assert_eq!(manager.find_window("main"), Some(retry));
}

#[test]
fn test_destroy_reclaims_closed_and_inert_windows() {
    let mut manager = headless_manager();
    let main = manager.create_object_window("main", 640, 480);
    let surface = surface_of(&manager, main);
    manager.backend_mut().request_close(surface);
    assert!(!manager.render(main));
    assert!(manager.window(main).is_some());

    assert!(manager.destroy_window(main));
    assert!(manager.window(main).is_none());
    assert_eq!(manager.backend().destroyed_surfaces(), 1);
    assert!(!manager.destroy_window(main));

    manager.backend_mut().set_refuse_surfaces(true);
    let inert = manager.create_window("inert", 100, 100);
    assert!(manager.window(inert).is_some());
    assert!(manager.destroy_window(inert));
    assert!(manager.window(inert).is_none());
}

#[test]
fn test_name_collision_leaves_second_window_inert() {
    let mut manager = headless_manager();
    let first = manager.create_window("main", 100, 100);
    let second = manager.create_camera_window("main", 200, 200);

    assert_ne!(first, second);
    assert_eq!(manager.find_window("main"), Some(first));
    assert_eq!(manager.window(second).map(|w| w.is_open()), Some(false));
    assert_eq!(manager.backend().live_surfaces(), 1);
}

#[test]
fn test_construction_sets_default_render_state() {
    let mut manager = headless_manager();
    let main = manager.create_object_window("main", 64, 48);
    let surface = surface_of(&manager, main);
    manager.render(main);

    let frame = manager.backend().last_frame(surface);
    assert_eq!(
        &frame[..3],
        &[
            DrawCommand::Enable(RenderState::DEPTH_TEST),
            DrawCommand::DepthFunc(DepthFunc::LessEqual),
            DrawCommand::Disable(RenderState::CULL_FACE),
        ]
    );
}

fn policy_run(policy: UpdatePolicy) -> (HeadlessBackend, [u64; 3]) {
    let mut backend = HeadlessBackend::new();
    let frames = {
        let config = ViewerConfig::default().with_update_policy(policy);
        let mut manager = Manager::new(&mut backend, config);
        let a = manager.create_object_window("a", 10, 10);
        let b = manager.create_object_window("b", 10, 10);
        let c = manager.create_object_window("c", 10, 10);
        let surfaces = [a, b, c].map(|id| surface_of(&manager, id));

        manager.backend_mut().request_close(surfaces[0]);
        manager.update();

        assert!(manager.find_window("a").is_none());
        let frames = surfaces.map(|s| manager.backend().frames_presented(s));
        frames
    };
    (backend, frames)
}

#[test]
fn test_process_all_renders_remaining_windows() {
    let (backend, frames) = policy_run(UpdatePolicy::ProcessAll);
    assert_eq!(frames, [0, 1, 1]);
    assert_eq!(backend.poll_count(), 1);
}

#[test]
fn test_stop_on_close_skips_rest_of_tick() {
    let (backend, frames) = policy_run(UpdatePolicy::StopOnClose);
    assert_eq!(frames, [0, 0, 0]);
    assert_eq!(backend.poll_count(), 1);
}

#[test]
fn test_close_key_and_camera_keys() {
    let mut manager = headless_manager();
    let main = manager.create_camera_window("main", 640, 480);
    let surface = surface_of(&manager, main);

    manager.backend_mut().press_key(surface, Key::W);
    manager.update();
    let eye = manager.window(main).and_then(|w| w.object_view()).map(|v| v.eye()).unwrap();
    assert_relative_eq!(eye, Vec3::new(0.0, 41.0, 40.0));

    manager.backend_mut().release_key(surface, Key::W);
    manager.backend_mut().press_key(surface, Key::Escape);
    manager.update();
    assert!(manager.running(), "close is observed on the next render");

    manager.update();
    assert!(!manager.running());
}

#[test]
fn test_object_window_ignores_movement_keys() {
    let mut manager = headless_manager();
    let main = manager.create_object_window("main", 640, 480);
    let surface = surface_of(&manager, main);

    manager.backend_mut().press_key(surface, Key::W);
    manager.update();
    let eye = manager.window(main).and_then(|w| w.object_view()).map(|v| v.eye()).unwrap();
    assert_relative_eq!(eye, Vec3::new(0.0, 40.0, 40.0));
}

#[test]
fn test_rebound_close_key() {
    let mut manager = headless_manager();
    let main = manager.create_window("main", 10, 10);
    let surface = surface_of(&manager, main);

    let bindings = KeyBindings { close: vec![Key::Q], ..KeyBindings::default() };
    assert!(manager.set_key_bindings(main, bindings));

    manager.backend_mut().press_key(surface, Key::Escape);
    manager.update();
    manager.update();
    assert!(manager.running());

    manager.backend_mut().press_key(surface, Key::Q);
    manager.update();
    manager.update();
    assert!(!manager.running());
}

#[test]
fn test_drop_releases_surfaces() {
    let mut backend = HeadlessBackend::new();
    {
        let mut manager = Manager::new(&mut backend, ViewerConfig::default());
        manager.create_window("a", 10, 10);
        manager.create_object_window("b", 10, 10);
        manager.create_image_window("c", 10, 10);
        assert_eq!(manager.backend().live_surfaces(), 3);
    }
    assert_eq!(backend.live_surfaces(), 0);
    assert_eq!(backend.destroyed_surfaces(), 3);
}
