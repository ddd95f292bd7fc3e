//! Math utilities and types
//!
//! Scene poses and camera state are kept in double precision, matching the
//! fixed-function matrix stack they are loaded into.

pub use nalgebra::{
    Isometry3, Matrix4, Point3, Translation3, Unit, UnitQuaternion, Vector3,
};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 4x4 matrix type (column-major, same layout as the backend's matrix stack)
pub type Mat4 = Matrix4<f64>;

/// Rotation quaternion type
pub type Quat = UnitQuaternion<f64>;

/// Rigid transform: rotation followed by translation
pub type Pose = Isometry3<f64>;

/// Translation-only transform
pub type Translation = Translation3<f64>;

/// World up axis. Grids lie in the plane perpendicular to it and camera
/// vertical movement follows it.
pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Math constants
pub mod constants {
    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;
}

/// Extension trait for Mat4 with the projection and view builders used by
/// the windows.
pub trait Mat4Ext {
    /// Create a perspective projection matrix (`gluPerspective` layout)
    ///
    /// A non-positive aspect ratio is replaced by 1 so a minimized surface
    /// never produces a degenerate matrix.
    fn perspective(fov_y_degrees: f64, aspect: f64, near: f64, far: f64) -> Mat4;

    /// Create an orthographic projection matrix (`glOrtho` layout)
    fn orthographic(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Mat4;

    /// Create a look-at view matrix (`gluLookAt` layout)
    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y_degrees: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
        let aspect = if aspect > 0.0 && aspect.is_finite() { aspect } else { 1.0 };
        let f = 1.0 / (fov_y_degrees * constants::DEG_TO_RAD * 0.5).tan();
        let depth = near - far;

        Mat4::new(
            f / aspect, 0.0, 0.0,                  0.0,
            0.0,        f,   0.0,                  0.0,
            0.0,        0.0, (far + near) / depth, (2.0 * far * near) / depth,
            0.0,        0.0, -1.0,                 0.0,
        )
    }

    fn orthographic(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Mat4 {
        let width = if right == left { 1.0 } else { right - left };
        let height = if top == bottom { 1.0 } else { top - bottom };
        let depth = if far == near { 1.0 } else { far - near };

        Mat4::new(
            2.0 / width, 0.0,          0.0,          -(right + left) / width,
            0.0,         2.0 / height, 0.0,          -(top + bottom) / height,
            0.0,         0.0,          -2.0 / depth, -(far + near) / depth,
            0.0,         0.0,          0.0,          1.0,
        )
    }

    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        // Right-handed, camera looks down -Z
        let forward = (target - eye).normalize();
        let right = forward.cross(up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new_translation(&-eye);

        let rotation = Mat4::new(
            right.x,      right.y,      right.z,      0.0,
            camera_up.x,  camera_up.y,  camera_up.z,  0.0,
            -forward.x,   -forward.y,   -forward.z,   0.0,
            0.0,          0.0,          0.0,          1.0,
        );

        rotation * translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vec3::new(0.0, 40.0, 40.0);
        let view = Mat4::look_at(&eye, &Vec3::zeros(), &UP);

        let mapped = view.transform_point(&Point3::from(eye));
        assert_relative_eq!(mapped, Point3::origin(), epsilon = 1e-9);

        // Target ends up straight ahead on -Z
        let target = view.transform_point(&Point3::origin());
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(target.y, 0.0, epsilon = 1e-9);
        assert!(target.z < 0.0);
    }

    #[test]
    fn test_perspective_matches_glu_layout() {
        let p = Mat4::perspective(90.0, 2.0, 0.01, 100.0);

        assert_relative_eq!(p[(0, 0)], 0.5, epsilon = 1e-9);
        assert_relative_eq!(p[(1, 1)], 1.0, epsilon = 1e-9);
        assert_relative_eq!(p[(3, 2)], -1.0);
        assert_relative_eq!(p[(3, 3)], 0.0);
    }

    #[test]
    fn test_perspective_degenerate_aspect() {
        let p = Mat4::perspective(90.0, 0.0, 0.01, 100.0);
        assert!(p.iter().all(|v| v.is_finite()));
        assert_relative_eq!(p[(0, 0)], p[(1, 1)], epsilon = 1e-9);
    }

    #[test]
    fn test_orthographic_pixel_space() {
        // Top-left origin, y down
        let o = Mat4::orthographic(0.0, 640.0, 480.0, 0.0, -1.0, 1.0);

        let top_left = o.transform_point(&Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(top_left, Point3::new(-1.0, 1.0, 0.0), epsilon = 1e-9);

        let bottom_right = o.transform_point(&Point3::new(640.0, 480.0, 0.0));
        assert_relative_eq!(bottom_right, Point3::new(1.0, -1.0, 0.0), epsilon = 1e-9);
    }
}
