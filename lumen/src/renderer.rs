use cgmath::{InnerSpace, Vector3};

use rayon::prelude::*;

use crate::color::Color;
use crate::framebuffer::FrameBuffer;
use crate::light::LightKind;
use crate::material::{Material, MaterialKind};
use crate::math::normalize_safe;
use crate::primitive::Primitive;
use crate::scene::Scene;
use crate::{Ray, HIT_EPSILON};

/// Reflection recursion stops past this depth.
const MAX_DEPTH: usize = 3;

const DIFFUSE_FACTOR: f64 = 0.7;

pub struct Renderer {
    /// Worker threads for the scanline loop; 0 picks the rayon default,
    /// 1 renders serially.
    pub threads: usize,
}

impl Renderer {
    pub fn render(&self, scene: &Scene, fb: &mut FrameBuffer) {
        let width = fb.width();

        if self.threads == 1 {
            for (y, row) in fb.buffer_mut().chunks_mut(width).enumerate() {
                self.scanline(scene, y, row);
            }
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .expect("Failed to build rendering threadpool");

            pool.install(|| {
                fb.buffer_mut()
                    .par_chunks_mut(width)
                    .enumerate()
                    .for_each(|(y, row)| self.scanline(scene, y, row))
            });
        }
    }

    fn scanline(&self, scene: &Scene, y: usize, row: &mut [Color]) {
        for (x, pixel) in row.iter_mut().enumerate() {
            let ray = scene.camera.cast_ray(x, y);

            *pixel = self.trace_ray(scene, &ray, 1);
        }
    }

    pub fn trace_ray(&self, scene: &Scene, ray: &Ray, depth: usize) -> Color {
        if depth > MAX_DEPTH {
            return Color::BLACK;
        }

        let hit = match scene.root().resolve(ray) {
            Some(hit) => hit,
            None => return Self::sky_color(ray),
        };

        let point = ray.at(hit.distance);
        let normal = hit.primitive.normal_at(point);
        let material = *hit.primitive.material();

        let reflection = self.trace_ray(scene, &ray.reflect_at(point, normal), depth + 1);

        self.shade_hit(scene, point, normal, material.color, reflection, &material)
    }

    /// Vertical gradient for rays that leave the scene.
    fn sky_color(ray: &Ray) -> Color {
        let t = 0.5 * (ray.direction.y + 1.0);

        Color::new((255.0 * (1.0 - t)) as i32, (255.0 * t) as i32, 255)
    }

    fn in_shadow(scene: &Scene, point: Vector3<f64>, normal: Vector3<f64>, light_dir: Vector3<f64>) -> bool {
        let shadow_ray = Ray::new(point + normal * HIT_EPSILON, light_dir);

        scene
            .root()
            .resolve(&shadow_ray)
            .map_or(false, |hit| hit.distance > HIT_EPSILON)
    }

    fn shade_hit(
        &self,
        scene: &Scene,
        point: Vector3<f64>,
        normal: Vector3<f64>,
        base: Color,
        reflection: Color,
        material: &Material,
    ) -> Color {
        let ambient = scene
            .lights()
            .iter()
            .find(|light| light.kind() == LightKind::Ambient)
            .map_or(0.0, |light| light.intensity());

        let mut r = base.r() as f64 * ambient;
        let mut g = base.g() as f64 * ambient;
        let mut b = base.b() as f64 * ambient;

        let view_dir = normalize_safe(scene.camera.position - point);

        for light in scene.lights() {
            // Ambient is applied once above; aggregates are not unwrapped
            // for shading.
            if matches!(light.kind(), LightKind::Ambient | LightKind::Composite) {
                continue;
            }

            let light_dir = normalize_safe(light.direction_from(point));

            if Self::in_shadow(scene, point, normal, light_dir) {
                continue;
            }

            let intensity = light.intensity();
            let diffuse = normal.dot(light_dir).max(0.0) * DIFFUSE_FACTOR * intensity;

            let (shininess, specular_factor) = if material.kind == MaterialKind::Metal {
                (128.0 - material.roughness * 120.0, 0.2)
            } else {
                (64.0, 0.1)
            };
            let specular = normal.dot(halfway(light_dir, view_dir)).max(0.0).powf(shininess) * intensity;

            r += base.r() as f64 * diffuse + 255.0 * specular * specular_factor;
            g += base.g() as f64 * diffuse + 255.0 * specular * specular_factor;
            b += base.b() as f64 * diffuse + 255.0 * specular * specular_factor;
        }

        let reflectivity = if material.kind == MaterialKind::Metal {
            0.8 - material.roughness * 0.6
        } else {
            material.reflectivity
        };

        r = r * (1.0 - reflectivity) + reflection.r() as f64 * reflectivity;
        g = g * (1.0 - reflectivity) + reflection.g() as f64 * reflectivity;
        b = b * (1.0 - reflectivity) + reflection.b() as f64 * reflectivity;

        if material.kind == MaterialKind::Emissive && material.emissive_intensity > 0.0 {
            r += base.r() as f64 * material.emissive_intensity;
            g += base.g() as f64 * material.emissive_intensity;
            b += base.b() as f64 * material.emissive_intensity;
        }

        Color::from_channels(r, g, b)
    }
}

fn halfway(light_dir: Vector3<f64>, view_dir: Vector3<f64>) -> Vector3<f64> {
    normalize_safe(light_dir + view_dir)
}

impl Default for Renderer {
    fn default() -> Self {
        Self { threads: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{AmbientLight, PointLight};
    use crate::primitive::{Plane, Sphere};
    use std::sync::Arc;

    fn serial_renderer() -> Renderer {
        Renderer { threads: 1 }
    }

    fn sphere_scene(material: Material) -> Scene {
        let mut scene = Scene::default();
        scene.add_primitive(Arc::new(Sphere::new(
            Vector3::new(0.0, 0.0, 5.0),
            1.0,
            material,
        )));

        scene
    }

    #[test]
    fn depth_past_limit_is_black() {
        let scene = sphere_scene(Material::default());
        let renderer = serial_renderer();
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));

        assert_eq!(renderer.trace_ray(&scene, &ray, 4), Color::BLACK);
        assert_eq!(renderer.trace_ray(&scene, &ray, 17), Color::BLACK);
    }

    #[test]
    fn miss_returns_sky_gradient() {
        let scene = Scene::default();
        let renderer = serial_renderer();

        let level = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(renderer.trace_ray(&scene, &level, 1), Color::new(127, 127, 255));

        let up = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(renderer.trace_ray(&scene, &up, 1), Color::new(0, 255, 255));
    }

    #[test]
    fn zero_reflectivity_ignores_reflected_content() {
        // The reflected ray sees the bright sky; with reflectivity 0 none
        // of it may leak into the shading.
        let mut material = Material::default();
        material.reflectivity = 0.0;

        let mut scene = sphere_scene(material);
        scene.add_light(Arc::new(AmbientLight::new(Vector3::new(0.0, 0.0, 0.0), 0.25)));

        let renderer = serial_renderer();
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));

        let color = renderer.trace_ray(&scene, &ray, 1);
        assert_eq!(color, Color::new(63, 63, 63));
    }

    #[test]
    fn full_reflectivity_returns_reflected_color() {
        let mut material = Material::default();
        material.reflectivity = 1.0;

        let scene = sphere_scene(material);
        let renderer = serial_renderer();

        // Head-on hit reflects straight back into the level sky.
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        let color = renderer.trace_ray(&scene, &ray, 1);

        assert_eq!(color, Color::new(127, 127, 255));
    }

    #[test]
    fn point_light_shades_facing_surface() {
        let mut scene = sphere_scene(Material::default());
        scene.add_light(Arc::new(PointLight::new(Vector3::new(0.0, 0.0, 0.0), 1.0)));

        let renderer = serial_renderer();
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));

        // Light, camera and normal are colinear: diffuse 0.7 plus full
        // specular 0.1 on a white base.
        let color = renderer.trace_ray(&scene, &ray, 1);
        assert_eq!(color, Color::new(204, 204, 204));
    }

    #[test]
    fn blocked_light_leaves_surface_dark() {
        let mut scene = Scene::default();
        scene.add_primitive(Arc::new(Plane::new(
            Vector3::new(0.0, 1.0, 0.0),
            0.0,
            Material::default(),
        )));
        // Occluder between the floor and the light.
        scene.add_primitive(Arc::new(Sphere::new(
            Vector3::new(0.0, 5.0, 5.0),
            1.0,
            Material::default(),
        )));
        scene.add_light(Arc::new(PointLight::new(Vector3::new(0.0, 10.0, 10.0), 1.0)));
        scene.camera.position = Vector3::new(0.0, 3.0, 0.0);

        let renderer = serial_renderer();
        let ray = Ray::new(Vector3::new(0.0, 3.0, 0.0), Vector3::new(0.0, -1.0, 0.0));

        // No ambient light and the only point light is occluded.
        assert_eq!(renderer.trace_ray(&scene, &ray, 1), Color::BLACK);
    }

    #[test]
    fn emissive_material_adds_its_own_light() {
        let mut material = Material::new(MaterialKind::Emissive, Color::new(100, 50, 0));
        material.emissive_intensity = 1.0;

        let scene = sphere_scene(material);
        let renderer = serial_renderer();
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));

        // No lights: only the emission term survives.
        assert_eq!(renderer.trace_ray(&scene, &ray, 1), Color::new(100, 50, 0));
    }

    #[test]
    fn rendering_twice_is_identical() {
        let mut scene = sphere_scene(Material::default());
        scene.add_light(Arc::new(AmbientLight::new(Vector3::new(0.0, 0.0, 0.0), 0.2)));
        scene.add_light(Arc::new(PointLight::new(Vector3::new(5.0, 5.0, 0.0), 1.0)));
        scene.camera.width = 16;
        scene.camera.height = 12;

        let renderer = serial_renderer();

        let mut first = FrameBuffer::new(16, 12);
        renderer.render(&scene, &mut first);

        let mut second = FrameBuffer::new(16, 12);
        renderer.render(&scene, &mut second);

        assert_eq!(first.buffer(), second.buffer());
    }
}
