use cgmath::{Matrix3, Vector3};

use super::{Hit, Primitive};
use crate::material::Material;
use crate::math::{self, normalize_safe};
use crate::solver::solve_quadratic;
use crate::{Ray, GEOM_EPSILON, HIT_EPSILON};

/// Cone with its base disc at the base center and the apex up the local
/// axis. A negative height flips the axis; an infinite height drops the base
/// cap and fixes the slope at 1, with the apex one unit up the axis.
pub struct Cone {
    base_center: Vector3<f64>,
    radius: f64,
    height: f64,
    axis: Vector3<f64>,
    infinite: bool,
    to_local: Matrix3<f64>,
    to_world: Matrix3<f64>,
    material: Material,
}

impl Cone {
    pub fn new(
        base_center: Vector3<f64>,
        radius: f64,
        height: f64,
        rotation: Vector3<f64>,
        material: Material,
    ) -> Self {
        let axis = if height >= 0.0 {
            Vector3::new(0.0, 1.0, 0.0)
        } else {
            Vector3::new(0.0, -1.0, 0.0)
        };

        Self {
            base_center,
            radius,
            height: height.abs(),
            axis,
            infinite: height.is_infinite(),
            to_local: math::rotation_inverse(rotation),
            to_world: math::rotation(rotation),
            material,
        }
    }

    /// Apex offset from the base center, in the local frame.
    fn apex_offset(&self) -> Vector3<f64> {
        if self.infinite {
            self.axis
        } else {
            self.axis * self.height
        }
    }

    fn slope(&self) -> f64 {
        if self.infinite {
            1.0
        } else {
            self.radius / self.height
        }
    }

    fn lateral_hit(&self, origin: Vector3<f64>, dir: Vector3<f64>) -> Option<f64> {
        let co = origin - self.apex_offset();
        let k2 = self.slope() * self.slope();

        let a = dir.x * dir.x + dir.z * dir.z - k2 * dir.y * dir.y;
        if a.abs() < GEOM_EPSILON {
            return None;
        }

        let b = 2.0 * (dir.x * co.x + dir.z * co.z - k2 * dir.y * co.y);
        let c = co.x * co.x + co.z * co.z - k2 * co.y * co.y;

        for &t in solve_quadratic(a, b, c).as_slice() {
            if t <= 0.0 {
                continue;
            }

            let y = origin.y + dir.y * t;
            if self.infinite || (0.0..=self.height).contains(&y) {
                return Some(t);
            }
        }

        None
    }

    fn cap_hit(&self, origin: Vector3<f64>, dir: Vector3<f64>) -> Option<f64> {
        if self.infinite || dir.y.abs() < GEOM_EPSILON {
            return None;
        }

        let t = -origin.y / dir.y;
        if t <= 0.0 {
            return None;
        }

        let p = origin + dir * t;

        (p.x * p.x + p.z * p.z <= self.radius * self.radius).then_some(t)
    }
}

impl Primitive for Cone {
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

        if !self.infinite && local.y.abs() < HIT_EPSILON {
            return self.to_world * Vector3::new(0.0, -1.0, 0.0);
        }

        let apex_to_point = local - self.apex_offset();
        let r = (apex_to_point.x * apex_to_point.x + apex_to_point.z * apex_to_point.z).sqrt();
        let normal = normalize_safe(Vector3::new(
            apex_to_point.x,
            self.radius / self.height * r,
            apex_to_point.z,
        ));

        self.to_world * normal
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn center(&self) -> Vector3<f64> {
        self.base_center + self.axis * (self.height / 2.0)
    }

    fn resolve(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.intersect(ray).map(|distance| Hit::new(distance, self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn cone() -> Cone {
        Cone::new(
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
            2.0,
            Vector3::new(0.0, 0.0, 0.0),
            Material::default(),
        )
    }

    #[test]
    fn lateral_hit_narrows_with_height() {
        // Halfway up, the cone's radius is 0.5.
        let ray = Ray::new(Vector3::new(0.0, 1.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

        let t = cone().intersect(&ray).unwrap();

        assert!((t - 4.5).abs() < 1e-9);
    }

    #[test]
    fn base_cap_hit_from_below() {
        let ray = Ray::new(Vector3::new(0.0, -5.0, 0.5), Vector3::new(0.0, 1.0, 0.0));

        let c = cone();
        let t = c.intersect(&ray).unwrap();
        assert!((t - 5.0).abs() < 1e-9);

        let normal = c.normal_at(ray.at(t));
        assert!((normal - Vector3::new(0.0, -1.0, 0.0)).magnitude() < 1e-9);
    }

    #[test]
    fn ray_past_apex_misses() {
        let ray = Ray::new(Vector3::new(0.0, 3.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

        assert!(cone().intersect(&ray).is_none());
    }

    #[test]
    fn lateral_normal_is_unit_and_tilts_up() {
        let c = cone();
        let ray = Ray::new(Vector3::new(0.0, 1.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

        let t = c.intersect(&ray).unwrap();
        let normal = c.normal_at(ray.at(t));

        assert!((normal.magnitude() - 1.0).abs() < 1e-3);
        assert!(normal.y > 0.0);
        assert!(normal.z < 0.0);
    }

    #[test]
    fn infinite_cone_uses_unit_slope() {
        let c = Cone::new(
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
            f64::INFINITY,
            Vector3::new(0.0, 0.0, 0.0),
            Material::default(),
        );

        // Apex sits at (0, 1, 0); at y = 0 the surface radius is 1.
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let t = c.intersect(&ray).unwrap();

        assert!((t - 4.0).abs() < 1e-9);
    }
}
