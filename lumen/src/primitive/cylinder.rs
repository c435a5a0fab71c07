use cgmath::{Matrix3, Vector3};

use super::{Hit, Primitive};
use crate::material::Material;
use crate::math::{self, normalize_safe};
use crate::solver::solve_quadratic;
use crate::{Ray, GEOM_EPSILON, HIT_EPSILON};

/// Y-axis-aligned cylinder in its local frame, placed in the world by a base
/// center and Euler rotation in degrees. An infinite height leaves out both
/// end caps.
pub struct Cylinder {
    base_center: Vector3<f64>,
    radius: f64,
    height: f64,
    to_local: Matrix3<f64>,
    to_world: Matrix3<f64>,
    material: Material,
}

impl Cylinder {
    pub fn new(
        base_center: Vector3<f64>,
        radius: f64,
        height: f64,
        rotation: Vector3<f64>,
        material: Material,
    ) -> Self {
        Self {
            base_center,
            radius,
            height,
            to_local: math::rotation_inverse(rotation),
            to_world: math::rotation(rotation),
            material,
        }
    }

    fn lateral_hit(&self, origin: Vector3<f64>, dir: Vector3<f64>) -> Option<f64> {
        let a = dir.x * dir.x + dir.z * dir.z;
        if a.abs() < GEOM_EPSILON {
            // Ray parallel to the axis never crosses the lateral surface.
            return None;
        }

        let b = 2.0 * (origin.x * dir.x + origin.z * dir.z);
        let c = origin.x * origin.x + origin.z * origin.z - self.radius * self.radius;

        for &t in solve_quadratic(a, b, c).as_slice() {
            if t <= 0.0 {
                continue;
            }

            let y = origin.y + dir.y * t;
            if self.height.is_infinite() || (0.0..=self.height).contains(&y) {
                return Some(t);
            }
        }

        None
    }

    fn cap_hit(&self, origin: Vector3<f64>, dir: Vector3<f64>) -> Option<f64> {
        if self.height.is_infinite() || dir.y.abs() < GEOM_EPSILON {
            return None;
        }

        let mut nearest = None;
        for y_cap in [0.0, self.height] {
            let t = (y_cap - origin.y) / dir.y;
            if t <= 0.0 {
                continue;
            }

            let p = origin + dir * t;
            if p.x * p.x + p.z * p.z <= self.radius * self.radius {
                nearest = Some(nearest.map_or(t, |n: f64| n.min(t)));
            }
        }

        nearest
    }
}

impl Primitive for Cylinder {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let origin = self.to_local * (ray.origin - self.base_center);
        let dir = self.to_local * ray.direction;

        match (self.lateral_hit(origin, dir), self.cap_hit(origin, dir)) {
            (Some(lateral), Some(cap)) => Some(lateral.min(cap)),
            (lateral, cap) => lateral.or(cap),
        }
    }

    fn normal_at(&self, point: Vector3<f64>) -> Vector3<f64> {
        let local = self.to_local * (point - self.base_center);

        if self.height.is_finite() {
            if local.y.abs() < HIT_EPSILON {
                return self.to_world * Vector3::new(0.0, -1.0, 0.0);
            }
            if (local.y - self.height).abs() < HIT_EPSILON {
                return self.to_world * Vector3::new(0.0, 1.0, 0.0);
            }
        }

        self.to_world * normalize_safe(Vector3::new(local.x, 0.0, local.z))
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn center(&self) -> Vector3<f64> {
        self.base_center + Vector3::new(0.0, self.height * 0.5, 0.0)
    }

    fn resolve(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.intersect(ray).map(|distance| Hit::new(distance, self))
    }
}
