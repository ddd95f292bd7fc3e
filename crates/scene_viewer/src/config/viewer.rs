//! Viewer configuration: tick policy, camera defaults and key mapping

use serde::{Deserialize, Serialize};

use super::Config;
use crate::backend::Color;
use crate::foundation::math::Vec3;
use crate::input::KeyBindings;

/// What `Manager::update` does when a window reports itself closed mid-tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdatePolicy {
    /// Keep rendering and polling the remaining windows for this tick
    #[default]
    ProcessAll,
    /// Skip the remaining windows for this tick (legacy behavior)
    StopOnClose,
}

/// Camera defaults for object windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial eye position
    pub eye: [f64; 3],
    /// Initial gaze point
    pub gaze: [f64; 3],
    /// Distance moved per tick while a movement key is held
    pub step: f64,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f64,
    /// Near clip distance
    pub near: f64,
    /// Far clip distance
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 40.0, 40.0],
            gaze: [0.0, 0.0, 0.0],
            step: 1.0,
            fov_y_degrees: 90.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    /// Initial eye position as a vector
    pub fn eye(&self) -> Vec3 {
        Vec3::from(self.eye)
    }

    /// Initial gaze point as a vector
    pub fn gaze(&self) -> Vec3 {
        Vec3::from(self.gaze)
    }
}

/// Top-level viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Per-tick behavior when a window closes
    pub update_policy: UpdatePolicy,
    /// Camera defaults for object windows
    pub camera: CameraConfig,
    /// Background color of object windows
    pub clear_color: [f32; 3],
    /// Multisample count requested for new surfaces (0 disables)
    pub samples: u32,
    /// Default key mapping applied to new windows
    pub bindings: KeyBindings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            update_policy: UpdatePolicy::default(),
            camera: CameraConfig::default(),
            clear_color: [0.0, 0.3, 0.8],
            samples: 4,
            bindings: KeyBindings::default(),
        }
    }
}

impl ViewerConfig {
    /// Background color as a canvas color
    pub fn clear_color(&self) -> Color {
        let [r, g, b] = self.clear_color;
        Color::new(r, g, b)
    }

    /// Set the update policy
    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    /// Set the camera defaults
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }
}

impl Config for ViewerConfig {}
