//! Scene objects

use crate::backend::{Canvas, TransformScope};
use crate::foundation::math::{Pose, Quat, Translation, Vec3};

use super::shapes::{Path, Shape};

slotmap::new_key_type! {
    /// Handle to an object owned by the manager
    pub struct ObjectId;
}

/// Side on which a transform is composed with a pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// `pose ← t ∘ pose`: `t` acts in the frame the pose maps into
    World,
    /// `pose ← pose ∘ t`: `t` acts in the object's own frame
    Local,
}

/// Drawable scene entity with a rigid pose
#[derive(Debug, Clone)]
pub struct Object {
    name: String,
    pose: Pose,
    visible: bool,
    shape: Shape,
}

impl Object {
    /// Create a visible object at the origin
    pub fn new(name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        Self {
            name: name.into(),
            pose: Pose::identity(),
            visible: true,
            shape: shape.into(),
        }
    }

    /// Object name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current pose
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Replace the pose
    pub fn set_transform(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Compose `transform` with the pose on the given side
    pub fn compose(&mut self, transform: &Pose, frame: Frame) {
        self.pose = match frame {
            Frame::World => transform * self.pose,
            Frame::Local => self.pose * transform,
        };
    }

    /// Translate in world space (prepended)
    pub fn translate(&mut self, offset: &Vec3) {
        self.compose(&translation(offset), Frame::World);
    }

    /// Rotate about the world origin (prepended)
    pub fn rotate(&mut self, rotation: &Quat) {
        self.compose(&Pose::from_parts(Translation::identity(), *rotation), Frame::World);
    }

    /// Translate along the object's own axes
    pub fn translate_local(&mut self, offset: &Vec3) {
        self.compose(&translation(offset), Frame::Local);
    }

    /// Rotate about the object's own origin
    pub fn rotate_local(&mut self, rotation: &Quat) {
        self.compose(&Pose::from_parts(Translation::identity(), *rotation), Frame::Local);
    }

    /// True when `draw` emits anything
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the object
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Shape drawn in the object's frame
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mutable shape access
    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    /// The path shape, if this object draws one
    pub fn as_path_mut(&mut self) -> Option<&mut Path> {
        match &mut self.shape {
            Shape::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Draw the shape under `current transform ∘ pose`
    ///
    /// The prior transform is restored when this returns or unwinds.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.visible {
            return;
        }

        let mut scope = TransformScope::new(canvas);
        let transform = scope.transform() * self.pose.to_homogeneous();
        scope.load_transform(&transform);
        self.shape.draw(&mut *scope);
    }
}

fn translation(offset: &Vec3) -> Pose {
    Pose::from_parts(Translation::from(*offset), Quat::identity())
}
