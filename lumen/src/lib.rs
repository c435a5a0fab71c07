use cgmath::{InnerSpace, Vector3};

pub mod camera;
pub mod color;
pub mod framebuffer;
pub mod light;
pub mod material;
pub mod math;
pub mod primitive;
pub mod renderer;
pub mod scene;
pub mod solver;

/// Minimum ray parameter for a hit to count. Also used to offset shadow and
/// reflection ray origins off the surface they start from.
pub const HIT_EPSILON: f64 = 1e-3;

/// Tolerance for near-parallel and degenerate-coefficient tests.
pub const GEOM_EPSILON: f64 = 1e-6;

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: Vector3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Direction is normalized here and stays unit length for the lifetime
    /// of the ray. A zero direction is kept as-is rather than turned into
    /// NaNs.
    pub fn new(origin: Vector3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: math::normalize_safe(direction),
        }
    }

    pub fn at(&self, t: f64) -> Vector3<f64> {
        self.origin + self.direction * t
    }

    /// Mirror ray leaving `point`, offset along the normal to avoid
    /// immediately re-hitting the surface it reflects off.
    pub fn reflect_at(&self, point: Vector3<f64>, normal: Vector3<f64>) -> Self {
        let direction = self.direction - 2.0 * self.direction.dot(normal) * normal;

        Self::new(point + normal * HIT_EPSILON, direction)
    }
}
