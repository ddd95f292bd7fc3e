//! Scene viewer demo
//!
//! Opens a camera window with a grid, an axis gizmo, a spinning cube and a
//! growing helix, plus an image window showing a generated test pattern.
//! W/S or the arrow keys move the eye up and down, A/D strafe, Z/X move
//! toward and away from the origin, Escape closes a window.

mod cli;

use std::sync::Arc;

use clap::Parser;
use image::{DynamicImage, Rgb, RgbImage};
use scene_viewer::foundation::logging;
use scene_viewer::prelude::*;
use scene_viewer::render::ImageError;

use cli::Cli;

const HEADLESS_FRAMES: u64 = 120;
const HELIX_NODES: u64 = 400;
const PATTERN_SIZE: (u32, u32) = (256, 192);

/// Handles to the animated parts of the demo scene
struct DemoScene {
    cube: ObjectId,
    helix: ObjectId,
    image_window: WindowId,
}

impl DemoScene {
    fn build<B: Backend>(manager: &mut Manager<B>) -> Result<Self, Box<dyn std::error::Error>> {
        let main = manager.create_camera_window("scene", 800, 600);
        let image_window = manager.create_image_window("pattern", PATTERN_SIZE.0, PATTERN_SIZE.1);

        let grid = manager.create_grid("floor", 20.0, 2.0);
        let axis = manager.create_axis("origin", 5.0);
        let cube = manager.create_cube("cube", 4.0, 4.0, 4.0);
        let helix = manager.create_path("helix", Vec::new(), Color::new(1.0, 0.8, 0.0));

        if let Some(object) = manager.object_mut(cube) {
            object.translate(&Vec3::new(0.0, 2.0, 0.0));
        }

        for object in [grid, axis, cube, helix] {
            manager.add_object(main, object);
        }

        manager.set_image(image_window, Arc::new(test_pattern(0)?));
        log::info!("Demo scene ready");

        Ok(Self { cube, helix, image_window })
    }

    fn animate<B: Backend>(&self, manager: &mut Manager<B>, frame: u64) -> Result<(), ImageError> {
        if let Some(cube) = manager.object_mut(self.cube) {
            cube.rotate_local(&Quat::from_axis_angle(&Vec3::y_axis(), 0.02));
        }

        if frame < HELIX_NODES {
            if let Some(path) = manager.object_mut(self.helix).and_then(Object::as_path_mut) {
                let t = frame as f64 * 0.1;
                path.add_node(Vec3::new(8.0 * t.cos(), 0.05 * frame as f64, 8.0 * t.sin()));
            }
        }

        if frame % 30 == 0 {
            manager.set_image(self.image_window, Arc::new(test_pattern(frame)?));
        }
        Ok(())
    }
}

/// Moving color gradient
fn test_pattern(frame: u64) -> Result<ImageBuffer, ImageError> {
    let shift = (frame % 256) as u32;
    let pattern = RgbImage::from_fn(PATTERN_SIZE.0, PATTERN_SIZE.1, |x, y| {
        Rgb([((x + shift) % 256) as u8, (y % 256) as u8, ((x + y) / 2 % 256) as u8])
    });
    ImageBuffer::from_dynamic_image(DynamicImage::ImageRgb8(pattern))
}

fn run<B: Backend>(mut manager: Manager<B>, frames: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let scene = DemoScene::build(&mut manager)?;

    let mut frame = 0u64;
    while manager.running() {
        scene.animate(&mut manager, frame)?;
        manager.update();
        frame += 1;

        if frames.is_some_and(|limit| frame >= limit) {
            log::info!("Stopping after {} frames", frame);
            break;
        }
    }

    log::info!("Demo finished");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_with_filter(cli.log.as_deref());

    let config = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            ViewerConfig::load_from_file(path)?
        }
        None => ViewerConfig::default(),
    };

    if !cli.headless {
        return run_native(config, cli.frames);
    }

    run(
        Manager::new(HeadlessBackend::new(), config),
        cli.frames.or(Some(HEADLESS_FRAMES)),
    )
}

#[cfg(feature = "glfw")]
fn run_native(config: ViewerConfig, frames: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let backend = GlfwBackend::new(config.samples)?;
    run(Manager::new(backend, config), frames)
}

#[cfg(not(feature = "glfw"))]
fn run_native(config: ViewerConfig, frames: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    log::warn!("Built without the `glfw` feature, running headless");
    run(
        Manager::new(HeadlessBackend::new(), config),
        frames.or(Some(HEADLESS_FRAMES)),
    )
}
