//! Object membership and rendering scenarios

use std::sync::Arc;

use super::{headless_manager, surface_of};
use crate::backend::{Backend, Color, DrawCommand, Primitive, TextureId};
use crate::foundation::math::{Mat4, Mat4Ext, Pose, Quat, Vec3};
use crate::render::{ImageBuffer, PixelFormat};
use crate::scene::{Frame, ObjectId};
use crate::window::WindowId;
use crate::Manager;
use approx::assert_relative_eq;

fn object_names<B: Backend>(manager: &Manager<B>, window: WindowId) -> Vec<String> {
    manager.window_objects(window).map(|(n, _)| n.to_owned()).collect()
}

fn window_names<B: Backend>(manager: &Manager<B>, object: ObjectId) -> Vec<String> {
    manager.object_windows(object).map(|(n, _)| n.to_owned()).collect()
}

#[test]
fn test_main_window_close_unlinks_cube() {
    let mut manager = headless_manager();
    let main = manager.create_object_window("main", 640, 480);
    let c1 = manager.create_cube("c1", 2.0, 2.0, 2.0);

    assert!(manager.add_object(main, c1));
    assert_eq!(object_names(&manager, main), vec!["c1"]);
    assert_eq!(window_names(&manager, c1), vec!["main"]);

    let surface = surface_of(&manager, main);
    manager.backend_mut().request_close(surface);

    assert!(!manager.render(main));
    assert!(manager.find_window("main").is_none());
    assert!(window_names(&manager, c1).is_empty());
    assert!(object_names(&manager, main).is_empty());
    assert!(manager.object(c1).is_some());
    assert!(manager.associations().is_consistent());
}

#[test]
fn test_destroying_shared_object() {
    // neither window destroyed, first destroyed, second destroyed
    for destroy_first in [None, Some(0usize), Some(1)] {
        let mut manager = headless_manager();
        let windows = [
            manager.create_object_window("w1", 100, 100),
            manager.create_object_window("w2", 100, 100),
        ];
        let c1 = manager.create_cube("c1", 1.0, 1.0, 1.0);
        let c2 = manager.create_axis("c2", 1.0);
        for w in windows {
            manager.add_object(w, c1);
            manager.add_object(w, c2);
        }

        if let Some(i) = destroy_first {
            manager.destroy_window(windows[i]);
        }
        let removed = manager.destroy_object(c1);
        assert_eq!(removed.as_ref().map(|o| o.name()), Some("c1"));

        for (i, w) in windows.into_iter().enumerate() {
            let expected: Vec<&str> = if destroy_first == Some(i) { vec![] } else { vec!["c2"] };
            assert_eq!(object_names(&manager, w), expected);
        }
        assert!(manager.object(c1).is_none());
        assert!(manager.associations().is_consistent());
    }
}

#[test]
fn test_destroying_window_unlinks_its_objects() {
    let mut manager = headless_manager();
    let w1 = manager.create_object_window("w1", 100, 100);
    let w2 = manager.create_camera_window("w2", 100, 100);
    let o1 = manager.create_cube("o1", 1.0, 1.0, 1.0);
    let o2 = manager.create_grid("o2", 5.0, 1.0);
    manager.add_object(w1, o1);
    manager.add_object(w1, o2);
    manager.add_object(w2, o1);

    assert!(manager.destroy_window(w1));
    assert!(!manager.destroy_window(w1));

    assert_eq!(window_names(&manager, o1), vec!["w2"]);
    assert!(window_names(&manager, o2).is_empty());
    assert!(manager.window(w1).is_none());
    assert!(!manager.render(w1));
    assert!(manager.associations().is_consistent());
}

#[test]
fn test_membership_operations() {
    let mut manager = headless_manager();
    let main = manager.create_object_window("main", 100, 100);
    let plain = manager.create_window("plain", 100, 100);
    let first = manager.create_cube("box", 1.0, 1.0, 1.0);
    let second = manager.create_cube("box", 2.0, 2.0, 2.0);
    let path = manager.create_path("trail", vec![], Color::WHITE);

    // plain windows hold no objects
    assert!(!manager.add_object(plain, first));

    // same name displaces
    manager.add_object(main, first);
    manager.add_object(main, second);
    let held: Vec<ObjectId> = manager.window_objects(main).map(|(_, id)| id).collect();
    assert_eq!(held, vec![second]);
    assert!(window_names(&manager, first).is_empty());

    manager.add_object(main, path);
    assert!(manager.remove_object(main, path));
    assert!(!manager.remove_object(main, path));

    manager.add_object(main, path);
    assert_eq!(manager.detach_object(path), 1);
    assert!(manager.object(path).is_some());
    assert_eq!(object_names(&manager, main), vec!["box"]);
    assert!(manager.associations().is_consistent());
}

#[test]
fn test_object_frame_contents() {
    let mut manager = headless_manager();
    let main = manager.create_object_window("main", 640, 480);
    let surface = surface_of(&manager, main);

    let cube = manager.create_cube("c1", 2.0, 2.0, 2.0);
    let hidden = manager.create_cube("c2", 2.0, 2.0, 2.0);
    manager.add_object(main, cube);
    manager.add_object(main, hidden);

    let eye = Vec3::new(0.0, 0.0, 10.0);
    assert!(manager.set_camera(main, eye, Vec3::zeros()));
    if let Some(object) = manager.object_mut(cube) {
        object.translate(&Vec3::new(1.0, 0.0, 0.0));
    }
    if let Some(object) = manager.object_mut(hidden) {
        object.set_visible(false);
    }

    assert!(manager.render(main));
    let frame = manager.backend().last_frame(surface);

    let view = Mat4::look_at(&eye, &Vec3::zeros(), &Vec3::y());
    assert!(frame.contains(&DrawCommand::Viewport(640, 480)));
    assert!(frame.contains(&DrawCommand::Clear(manager.config().clear_color())));
    assert!(frame.contains(&DrawCommand::LoadTransform(view)));

    let draws: Vec<&Mat4> = frame
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Draw { primitive: Primitive::Quads, transform, .. } => Some(transform),
            _ => None,
        })
        .collect();
    assert_eq!(draws.len(), 1);
    assert_relative_eq!(*draws[0], view * Mat4::new_translation(&Vec3::x()), epsilon = 1e-12);

    // projection is set last, with aspect width / height
    match frame.last() {
        Some(DrawCommand::Projection(projection)) => {
            assert_relative_eq!(projection[(0, 0)], 0.75, epsilon = 1e-12);
            assert_relative_eq!(projection[(1, 1)], 1.0, epsilon = 1e-12);
        }
        other => panic!("expected projection last, got {:?}", other),
    }
    assert_eq!(manager.backend().stack_depth(surface), 0);
}

#[test]
fn test_pose_order_through_manager() {
    let mut manager = headless_manager();
    let a = manager.create_cube("a", 1.0, 1.0, 1.0);
    let b = manager.create_cube("b", 1.0, 1.0, 1.0);
    let t = Vec3::new(0.0, 0.0, 2.0);
    let q = Quat::from_axis_angle(&Vec3::x_axis(), std::f64::consts::FRAC_PI_2);

    if let Some(object) = manager.object_mut(a) {
        object.translate(&t);
        object.rotate(&q);
    }
    if let Some(object) = manager.object_mut(b) {
        object.rotate(&q);
        object.translate(&t);
    }

    let pa = manager.object(a).map(|o| o.pose().translation.vector).unwrap();
    let pb = manager.object(b).map(|o| o.pose().translation.vector).unwrap();
    assert_relative_eq!(pa, Vec3::new(0.0, -2.0, 0.0), epsilon = 1e-12);
    assert_relative_eq!(pb, Vec3::new(0.0, 0.0, 2.0), epsilon = 1e-12);

    // the explicit form agrees with the prepending mutators
    let mut c = manager.object(b).cloned().unwrap();
    c.set_transform(Pose::identity());
    c.compose(&Pose::from_parts(t.into(), q), Frame::World);
    assert_relative_eq!(c.pose().to_homogeneous(), manager.object(b).unwrap().pose().to_homogeneous());
}

#[test]
fn test_image_window() {
    let mut manager = headless_manager();
    let view = manager.create_image_window("frames", 320, 240);
    let surface = surface_of(&manager, view);
    assert_eq!(manager.backend().texture_count(surface), 1);

    // nothing to show yet
    assert!(manager.render(view));
    assert_eq!(manager.backend().frames_presented(surface), 0);

    // 3 RGB pixels per row padded to 12 bytes
    let image = ImageBuffer::from_raw(3, 2, 12, PixelFormat::RGB8, vec![0u8; 24]).unwrap();
    assert!(manager.set_image(view, Arc::new(image)));
    assert!(manager.render(view));

    let frame = manager.backend().last_frame(surface);
    let texture = manager
        .window(view)
        .and_then(|w| w.image_view())
        .and_then(|v| v.texture())
        .unwrap();
    assert!(frame.contains(&DrawCommand::UploadTexture {
        texture,
        row_length: 4,
        height: 2,
        alignment: 4,
    }));
    let quad = frame
        .iter()
        .find_map(|c| match c {
            DrawCommand::TexturedQuad(id, quad) if *id == texture => Some(*quad),
            _ => None,
        })
        .unwrap();
    assert_eq!(quad.max, [320.0, 240.0]);
    assert_relative_eq!(quad.uv_max[0], 0.75);
    assert_relative_eq!(quad.uv_max[1], 1.0);

    // a second upload reuses the same texture
    assert!(manager.render(view));
    assert_eq!(manager.backend().texture_count(surface), 1);

    // objects are not accepted and closed windows ignore images
    let cube = manager.create_cube("c", 1.0, 1.0, 1.0);
    assert!(!manager.add_object(view, cube));
    manager.backend_mut().request_close(surface);
    assert!(!manager.render(view));
    let replacement = ImageBuffer::from_raw(1, 1, 3, PixelFormat::RGB8, vec![0u8; 3]).unwrap();
    assert!(!manager.set_image(view, Arc::new(replacement)));

    let state = manager.window(view).and_then(|w| w.image_view()).unwrap();
    assert!(state.image().is_none());
    assert_eq!(state.texture(), None::<TextureId>);
}

#[test]
fn test_unaligned_image_stride() {
    let mut manager = headless_manager();
    let view = manager.create_image_window("frames", 10, 10);
    let surface = surface_of(&manager, view);

    let image = ImageBuffer::from_raw(3, 1, 9, PixelFormat::RGB8, vec![0u8; 9]).unwrap();
    manager.set_image(view, Arc::new(image));
    manager.render(view);

    let alignment = manager
        .backend()
        .last_frame(surface)
        .iter()
        .find_map(|c| match c {
            DrawCommand::UploadTexture { alignment, .. } => Some(*alignment),
            _ => None,
        });
    assert_eq!(alignment, Some(1));
}

#[test]
fn test_objects_listed_in_name_order() {
    let mut manager = headless_manager();
    let main = manager.create_object_window("main", 10, 10);
    for name in ["zeta", "alpha", "mid"] {
        let id = manager.create_axis(name, 1.0);
        manager.add_object(main, id);
    }
    assert_eq!(object_names(&manager, main), vec!["alpha", "mid", "zeta"]);
}
