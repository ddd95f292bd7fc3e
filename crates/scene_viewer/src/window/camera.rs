//! Camera viewpoint of object windows

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, UP};
use crate::input::{Key, KeyBindings};

const MIN_LENGTH: f64 = 1e-9;

/// Eye and gaze points; up is always [`UP`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectView {
    eye: Vec3,
    gaze: Vec3,
}

impl ObjectView {
    /// Create a view from `eye` looking at `gaze`
    pub fn new(eye: Vec3, gaze: Vec3) -> Self {
        Self { eye, gaze }
    }

    /// Eye position
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Look-at point
    pub fn gaze(&self) -> Vec3 {
        self.gaze
    }

    /// Replace both points
    pub fn set(&mut self, eye: Vec3, gaze: Vec3) {
        self.eye = eye;
        self.gaze = gaze;
    }

    /// World → eye transform
    ///
    /// Falls back to a plain translation when the view direction is
    /// undefined or parallel to up.
    pub fn view_matrix(&self) -> Mat4 {
        match self.right() {
            Some(_) => Mat4::look_at(&self.eye, &self.gaze, &UP),
            None => Mat4::new_translation(&-self.eye),
        }
    }

    /// Unit vector from eye toward gaze
    pub fn forward(&self) -> Option<Vec3> {
        (self.gaze - self.eye).try_normalize(MIN_LENGTH)
    }

    /// Unit strafe axis, `normalize(forward × up)`
    pub fn right(&self) -> Option<Vec3> {
        self.forward()?.cross(&UP).try_normalize(MIN_LENGTH)
    }

    /// Move the eye along the up axis
    pub fn move_vertical(&mut self, distance: f64) {
        self.eye += UP * distance;
    }

    /// Move the eye along the strafe axis; skipped when looking straight along up
    pub fn strafe(&mut self, distance: f64) {
        if let Some(right) = self.right() {
            self.eye += right * distance;
        }
    }

    /// Move the eye toward the gaze point; skipped when eye and gaze coincide
    pub fn advance(&mut self, distance: f64) {
        if let Some(forward) = self.forward() {
            self.eye += forward * distance;
        }
    }

    /// Apply held movement keys, each moving by `step`
    pub fn apply_input(&mut self, bindings: &KeyBindings, step: f64, mut pressed: impl FnMut(Key) -> bool) {
        if KeyBindings::any_held(&bindings.up, &mut pressed) {
            self.move_vertical(step);
        }
        if KeyBindings::any_held(&bindings.down, &mut pressed) {
            self.move_vertical(-step);
        }
        if KeyBindings::any_held(&bindings.left, &mut pressed) {
            self.strafe(-step);
        }
        if KeyBindings::any_held(&bindings.right, &mut pressed) {
            self.strafe(step);
        }
        if KeyBindings::any_held(&bindings.forward, &mut pressed) {
            self.advance(step);
        }
        if KeyBindings::any_held(&bindings.backward, &mut pressed) {
            self.advance(-step);
        }
    }
}
