use cgmath::Vector3;

use super::{Hit, Primitive};
use crate::material::Material;
use crate::math::normalize_safe;
use crate::{Ray, HIT_EPSILON};

const MAX_STEPS: usize = 1000;
const MAX_DISTANCE: f64 = 1000.0;
const STEP_SCALE: f64 = 0.1;

/// Implicit quartic surface `x⁴ − 5x² + y⁴ − 5y² + z⁴ − 5z² + 11.8 = 0`,
/// rescaled by `size` around `center`. The field value is not a true
/// distance, so marching uses a damped adaptive step instead of full
/// sphere-tracing strides.
pub struct TangleCube {
    center: Vector3<f64>,
    size: f64,
    material: Material,
}

impl TangleCube {
    pub fn new(center: Vector3<f64>, size: f64, material: Material) -> Self {
        Self {
            center,
            size,
            material,
        }
    }

    fn field(&self, point: Vector3<f64>) -> f64 {
        let p = (point - self.center) / self.size;

        p.x.powi(4) - 5.0 * p.x * p.x + p.y.powi(4) - 5.0 * p.y * p.y + p.z.powi(4)
            - 5.0 * p.z * p.z
            + 11.8
    }

    fn gradient(&self, point: Vector3<f64>) -> Vector3<f64> {
        let p = (point - self.center) / self.size;

        normalize_safe(Vector3::new(
            4.0 * p.x.powi(3) - 10.0 * p.x,
            4.0 * p.y.powi(3) - 10.0 * p.y,
            4.0 * p.z.powi(3) - 10.0 * p.z,
        ))
    }
}

impl Primitive for TangleCube {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let mut t = 0.0;

        for _ in 0..MAX_STEPS {
            let dist = self.field(ray.at(t)).abs();
            if dist < HIT_EPSILON {
                return Some(t);
            }
            if t > MAX_DISTANCE {
                return None;
            }

            t += (dist * STEP_SCALE).max(HIT_EPSILON);
        }

        None
    }

    fn normal_at(&self, point: Vector3<f64>) -> Vector3<f64> {
        self.gradient(point)
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
