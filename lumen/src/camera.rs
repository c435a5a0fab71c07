use cgmath::{Matrix3, SquareMatrix, Vector3, Zero};

use crate::math::{self, normalize_safe};
use crate::Ray;

/// Pinhole camera. Rotation is Euler angles in degrees (pitch = x, yaw = y,
/// roll = z); the orientation matrix is rebuilt whenever the rotation is
/// set.
#[derive(Clone)]
pub struct Camera {
    pub position: Vector3<f64>,
    rotation: Vector3<f64>,
    rot_mat: Matrix3<f64>,
    pub fov: f64,
    pub width: usize,
    pub height: usize,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            rot_mat: Matrix3::identity(),
            fov: 60.0,
            width: 800,
            height: 600,
        }
    }

    pub fn set_rotation(&mut self, rotation: Vector3<f64>) {
        self.rotation = rotation;
        self.rot_mat = math::camera_rotation(rotation);
    }

    pub fn rotation(&self) -> Vector3<f64> {
        self.rotation
    }

    /// Primary ray through the center of pixel (x, y), with (0, 0) the top
    /// left of the image.
    pub fn cast_ray(&self, x: usize, y: usize) -> Ray {
        let aspect = self.width as f64 / self.height as f64;
        let fov_scale = (self.fov.to_radians() * 0.5).tan();

        let px = (2.0 * (x as f64 + 0.5) / self.width as f64 - 1.0) * aspect * fov_scale;
        let py = (1.0 - 2.0 * (y as f64 + 0.5) / self.height as f64) * fov_scale;

        let direction = normalize_safe(Vector3::new(px, py, 1.0));

        Ray::new(self.position, self.rot_mat * direction)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
