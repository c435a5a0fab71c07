use cgmath::{InnerSpace, Vector3};

use super::{Hit, Primitive};
use crate::material::Material;
use crate::math::normalize_safe;
use crate::solver::solve_quadratic;
use crate::{Ray, HIT_EPSILON};

pub struct Sphere {
    center: Vector3<f64>,
    radius: f64,
    material: Material,
}

impl Sphere {
    pub fn new(center: Vector3<f64>, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        solve_quadratic(a, b, c).smallest_above(HIT_EPSILON)
    }

    fn normal_at(&self, point: Vector3<f64>) -> Vector3<f64> {
        normalize_safe(point - self.center)
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
