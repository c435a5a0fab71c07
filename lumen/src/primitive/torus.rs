use cgmath::{InnerSpace, Matrix3, Vector2, Vector3};

use super::{Hit, Primitive};
use crate::material::Material;
use crate::math::{self, normalize_safe};
use crate::{Ray, HIT_EPSILON};

const MAX_STEPS: usize = 256;
const MAX_DISTANCE: f64 = 1000.0;

/// Torus lying in its local XZ plane, intersected by sphere tracing its
/// signed distance function rather than by solving the degree-four
/// polynomial.
pub struct Torus {
    center: Vector3<f64>,
    major_radius: f64,
    minor_radius: f64,
    to_local: Matrix3<f64>,
    to_world: Matrix3<f64>,
    material: Material,
}

impl Torus {
    pub fn new(
        center: Vector3<f64>,
        major_radius: f64,
        minor_radius: f64,
        rotation: Vector3<f64>,
        material: Material,
    ) -> Self {
        Self {
            center,
            major_radius,
            minor_radius,
            to_local: math::rotation_inverse(rotation),
            to_world: math::rotation(rotation),
            material,
        }
    }

    /// Signed distance to the surface, in the local frame.
    fn distance(&self, point: Vector3<f64>) -> f64 {
        let q = Vector2::new(point.xz().magnitude() - self.major_radius, point.y);

        q.magnitude() - self.minor_radius
    }
}

impl Primitive for Torus {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let origin = self.to_local * (ray.origin - self.center);
        let dir = normalize_safe(self.to_local * ray.direction);

        let mut total = 0.0;
        for _ in 0..MAX_STEPS {
            let dist = self.distance(origin + dir * total);
            if dist.abs() < HIT_EPSILON {
                return Some(total);
            }

            total += dist;
            if total > MAX_DISTANCE {
                break;
            }
        }

        None
    }

    fn normal_at(&self, point: Vector3<f64>) -> Vector3<f64> {
        let local = self.to_local * (point - self.center);

        let len = local.xz().magnitude();
        let q = len - self.major_radius;
        let normal = normalize_safe(Vector3::new(
            local.x * q / len,
            local.y,
            local.z * q / len,
        ));

        self.to_world * normal
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn center(&self) -> Vector3<f64> {
        self.center
    }

    fn resolve(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.intersect(ray).map(|distance| Hit::new(distance, self))
    }
}
