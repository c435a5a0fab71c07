use cgmath::{InnerSpace, Vector3};

use super::{Hit, Primitive};
use crate::material::Material;
use crate::math::normalize_safe;
use crate::{Ray, GEOM_EPSILON};

pub struct Triangle {
    a: Vector3<f64>,
    b: Vector3<f64>,
    c: Vector3<f64>,
    edge1: Vector3<f64>,
    edge2: Vector3<f64>,
    normal: Vector3<f64>,
    material: Material,
}

impl Triangle {
    pub fn new(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>, material: Material) -> Self {
        let edge1 = b - a;
        let edge2 = c - a;

        Self {
            a,
            b,
            c,
            edge1,
            edge2,
            normal: normalize_safe(edge1.cross(edge2)),
            material,
        }
    }
}

impl Primitive for Triangle {
    /// Möller–Trumbore.
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let h = ray.direction.cross(self.edge2);
        let a = self.edge1.dot(h);
        if a.abs() < GEOM_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.a;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.edge2.dot(q);

        (t > GEOM_EPSILON).then_some(t)
    }

    fn normal_at(&self, _point: Vector3<f64>) -> Vector3<f64> {
        self.normal
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn center(&self) -> Vector3<f64> {
        (self.a + self.b + self.c) / 3.0
    }

    fn resolve(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.intersect(ray).map(|distance| Hit::new(distance, self))
    }
}
