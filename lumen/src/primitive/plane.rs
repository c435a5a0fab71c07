use cgmath::{InnerSpace, Vector3};

use super::{Hit, Primitive};
use crate::material::Material;
use crate::math::normalize_safe;
use crate::{Ray, GEOM_EPSILON};

/// Infinite plane described by a unit normal and its signed distance from
/// the origin along that normal.
pub struct Plane {
    normal: Vector3<f64>,
    distance: f64,
    material: Material,
}

impl Plane {
    pub fn new(normal: Vector3<f64>, distance: f64, material: Material) -> Self {
        Self {
            normal: normalize_safe(normal),
            distance,
            material,
        }
    }
}

impl Primitive for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < GEOM_EPSILON {
            return None;
        }

        let t = (self.distance - ray.origin.dot(self.normal)) / denom;

        (t >= 0.0).then_some(t)
    }

    fn normal_at(&self, _point: Vector3<f64>) -> Vector3<f64> {
        self.normal
    }

    fn material(&self) -> &Material {
        &self.material
    }

    /// An arbitrary representative point on the plane.
    fn center(&self) -> Vector3<f64> {
        self.normal * self.distance
    }

    fn resolve(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.intersect(ray).map(|distance| Hit::new(distance, self))
    }
}
