//! Scene-description loading. Scenes are JSON5 documents with a required
//! camera block and optional lights/primitives blocks; every primitive entry
//! may carry a `color` and a `material` sub-block.

use std::path::Path;
use std::sync::Arc;

use cgmath::Vector3;

use serde::Deserialize;

use thiserror::Error;

use lumen::camera::Camera;
use lumen::color::Color;
use lumen::light::{AmbientLight, DirectionalLight, PointLight};
use lumen::material::{Material, MaterialKind};
use lumen::primitive::{Cone, Cylinder, Plane, Sphere, TangleCube, Torus, Triangle};
use lumen::scene::Scene;

use crate::obj_loader::{self, ObjError};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("could not read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed scene description: {0}")]
    Format(#[from] json5::Error),
    #[error("invalid scene value: {0}")]
    Invalid(String),
    #[error("could not load OBJ model: {0}")]
    Obj(#[from] ObjError),
}

pub struct SceneLoader {}

impl SceneLoader {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Scene, LoaderError> {
        let text = std::fs::read_to_string(path)?;

        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Scene, LoaderError> {
        let file: SceneFile = json5::from_str(text)?;

        let mut scene = Scene::new(build_camera(&file.camera));

        if let Some(lights) = &file.lights {
            load_lights(&mut scene, lights)?;
        }
        if let Some(primitives) = &file.primitives {
            load_primitives(&mut scene, primitives)?;
        }

        Ok(scene)
    }
}

fn build_camera(stub: &CameraStub) -> Camera {
    let mut camera = Camera::new();
    camera.position = stub.position.into_vector();
    camera.set_rotation(stub.rotation.into_vector());
    camera.fov = stub.field_of_view;
    camera.width = stub.resolution.width;
    camera.height = stub.resolution.height;

    camera
}

fn load_lights(scene: &mut Scene, stub: &LightsStub) -> Result<(), LoaderError> {
    if let Some(ambient) = stub.ambient {
        if !(0.0..=1.0).contains(&ambient) {
            return Err(LoaderError::Invalid(format!(
                "ambient light intensity must be in [0, 1], got {ambient}"
            )));
        }

        scene.add_light(Arc::new(AmbientLight::new(Vector3::new(0.0, 0.0, 0.0), ambient)));
    }

    for point in &stub.point {
        scene.add_light(Arc::new(PointLight::new(
            point.position.into_vector(),
            point.intensity,
        )));
    }

    for directional in &stub.directional {
        scene.add_light(Arc::new(DirectionalLight::new(
            directional.position.into_vector(),
            directional.direction.into_vector(),
            directional.intensity,
        )));
    }

    Ok(())
}

fn load_primitives(scene: &mut Scene, stub: &PrimitivesStub) -> Result<(), LoaderError> {
    for sphere in &stub.spheres {
        let material = build_material(sphere.surface.as_ref(), sphere.color);

        scene.add_primitive(Arc::new(Sphere::new(
            Vector3::new(sphere.x, sphere.y, sphere.z),
            sphere.r,
            material,
        )));
    }

    for plane in &stub.planes {
        let normal = match plane.axis.as_str() {
            "x" | "X" => Vector3::new(1.0, 0.0, 0.0),
            "y" | "Y" => Vector3::new(0.0, 1.0, 0.0),
            "z" | "Z" => Vector3::new(0.0, 0.0, 1.0),
            other => {
                return Err(LoaderError::Invalid(format!("invalid plane axis '{other}'")));
            }
        };
        let material = build_material(plane.surface.as_ref(), plane.color);

        scene.add_primitive(Arc::new(Plane::new(normal, plane.position, material)));
    }

    for cylinder in &stub.cylinders {
        let material = build_material(cylinder.surface.as_ref(), cylinder.color);

        scene.add_primitive(Arc::new(Cylinder::new(
            cylinder.base_center.into_vector(),
            cylinder.radius,
            cylinder.height,
            cylinder.rotation.into_vector(),
            material,
        )));
    }

    for cone in &stub.cones {
        let material = build_material(cone.surface.as_ref(), cone.color);

        scene.add_primitive(Arc::new(Cone::new(
            cone.base_center.into_vector(),
            cone.radius,
            cone.height,
            cone.rotation.into_vector(),
            material,
        )));
    }

    for triangle in &stub.triangles {
        let material = build_material(triangle.surface.as_ref(), triangle.color);

        scene.add_primitive(Arc::new(Triangle::new(
            triangle.a.into_vector(),
            triangle.b.into_vector(),
            triangle.c.into_vector(),
            material,
        )));
    }

    for torus in &stub.torus {
        let material = build_material(torus.surface.as_ref(), torus.color);

        scene.add_primitive(Arc::new(Torus::new(
            torus.center.into_vector(),
            torus.major_radius,
            torus.minor_radius,
            torus.rotation.into_vector(),
            material,
        )));
    }

    for tangle_cube in &stub.tanglecubes {
        let material = build_material(tangle_cube.surface.as_ref(), tangle_cube.color);

        scene.add_primitive(Arc::new(TangleCube::new(
            tangle_cube.center.into_vector(),
            tangle_cube.size,
            material,
        )));
    }

    for obj in &stub.obj {
        let material = build_material(obj.surface.as_ref(), obj.color);

        let triangles = obj_loader::load_from_path(
            &obj.file,
            obj.scale,
            obj.offset.into_vector(),
            obj.rotation.into_vector(),
        )?;

        for triangle in triangles {
            scene.add_primitive(Arc::new(Triangle::new(
                triangle.a, triangle.b, triangle.c, material,
            )));
        }
    }

    Ok(())
}

/// Unknown material type strings keep the default kind, like any other
/// absent field.
fn build_material(stub: Option<&MaterialStub>, entry_color: Option<ColorStub>) -> Material {
    let mut material = Material {
        color: entry_color.map_or(Color::WHITE, |c| c.into_color_with(Color::WHITE)),
        ..Material::default()
    };

    let stub = match stub {
        Some(stub) => stub,
        None => return material,
    };

    if let Some(kind) = &stub.kind {
        match kind.as_str() {
            "flat" | "flat_color" => material.kind = MaterialKind::Flat,
            "lambertian" => material.kind = MaterialKind::Lambertian,
            "metal" => material.kind = MaterialKind::Metal,
            "dielectric" | "glass" => material.kind = MaterialKind::Dielectric,
            "emissive" | "light" => material.kind = MaterialKind::Emissive,
            _ => {}
        }
    }

    if let Some(roughness) = stub.roughness {
        material.roughness = roughness;
    }
    if let Some(metalness) = stub.metalness {
        material.metalness = metalness;
    }
    if let Some(reflectivity) = stub.reflectivity {
        material.reflectivity = reflectivity;
    }
    if let Some(transparency) = stub.transparency {
        material.transparency = transparency;
    }
    if let Some(refractive_index) = stub.refractive_index {
        material.refractive_index = refractive_index;
    }
    if let Some(emissive_intensity) = stub.emissive_intensity {
        material.emissive_intensity = emissive_intensity;
    }
    if let Some(color) = stub.color {
        material.color = color.into_color_with(material.color);
    }

    material
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    camera: CameraStub,
    lights: Option<LightsStub>,
    primitives: Option<PrimitivesStub>,
}

#[derive(Debug, Deserialize)]
struct CameraStub {
    position: Vec3Stub,
    rotation: Vec3Stub,
    resolution: ResolutionStub,
    #[serde(rename = "fieldOfView")]
    field_of_view: f64,
}

#[derive(Debug, Deserialize)]
struct ResolutionStub {
    width: usize,
    height: usize,
}

#[derive(Debug, Default, Deserialize)]
struct LightsStub {
    ambient: Option<f64>,
    #[serde(default)]
    point: Vec<PointLightStub>,
    #[serde(default)]
    directional: Vec<DirectionalLightStub>,
}

#[derive(Debug, Deserialize)]
struct PointLightStub {
    #[serde(flatten)]
    position: Vec3Stub,
    #[serde(default = "default_intensity")]
    intensity: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionalLightStub {
    position: Vec3Stub,
    direction: Vec3Stub,
    #[serde(default = "default_intensity")]
    intensity: f64,
}

#[derive(Debug, Default, Deserialize)]
struct PrimitivesStub {
    #[serde(default)]
    spheres: Vec<SphereStub>,
    #[serde(default)]
    planes: Vec<PlaneStub>,
    #[serde(default)]
    cylinders: Vec<ConicStub>,
    #[serde(default)]
    cones: Vec<ConicStub>,
    #[serde(default)]
    triangles: Vec<TriangleStub>,
    #[serde(default)]
    torus: Vec<TorusStub>,
    #[serde(default)]
    tanglecubes: Vec<TangleCubeStub>,
    #[serde(default)]
    obj: Vec<ObjStub>,
}

#[derive(Debug, Deserialize)]
struct SphereStub {
    x: f64,
    y: f64,
    z: f64,
    r: f64,
    color: Option<ColorStub>,
    #[serde(rename = "material")]
    surface: Option<MaterialStub>,
}

#[derive(Debug, Deserialize)]
struct PlaneStub {
    axis: String,
    position: f64,
    color: Option<ColorStub>,
    #[serde(rename = "material")]
    surface: Option<MaterialStub>,
}

/// Shared by cylinders and cones: a base center, radius, optional height
/// (infinite when absent) and rotation.
#[derive(Debug, Deserialize)]
struct ConicStub {
    #[serde(rename = "baseCenter")]
    base_center: Vec3Stub,
    radius: f64,
    #[serde(default = "default_height")]
    height: f64,
    #[serde(default)]
    rotation: Vec3Stub,
    color: Option<ColorStub>,
    #[serde(rename = "material")]
    surface: Option<MaterialStub>,
}

#[derive(Debug, Deserialize)]
struct TriangleStub {
    a: Vec3Stub,
    b: Vec3Stub,
    c: Vec3Stub,
    color: Option<ColorStub>,
    #[serde(rename = "material")]
    surface: Option<MaterialStub>,
}

#[derive(Debug, Deserialize)]
struct TorusStub {
    center: Vec3Stub,
    #[serde(rename = "majorRadius")]
    major_radius: f64,
    #[serde(rename = "minorRadius", default = "default_minor_radius")]
    minor_radius: f64,
    #[serde(default)]
    rotation: Vec3Stub,
    color: Option<ColorStub>,
    #[serde(rename = "material")]
    surface: Option<MaterialStub>,
}

#[derive(Debug, Deserialize)]
struct TangleCubeStub {
    center: Vec3Stub,
    size: f64,
    color: Option<ColorStub>,
    #[serde(rename = "material")]
    surface: Option<MaterialStub>,
}

#[derive(Debug, Deserialize)]
struct ObjStub {
    file: String,
    #[serde(default = "default_scale")]
    scale: f64,
    #[serde(default)]
    offset: Vec3Stub,
    #[serde(default)]
    rotation: Vec3Stub,
    color: Option<ColorStub>,
    #[serde(rename = "material")]
    surface: Option<MaterialStub>,
}

#[derive(Debug, Deserialize)]
struct MaterialStub {
    #[serde(rename = "type")]
    kind: Option<String>,
    roughness: Option<f64>,
    metalness: Option<f64>,
    reflectivity: Option<f64>,
    transparency: Option<f64>,
    #[serde(rename = "refractiveIndex")]
    refractive_index: Option<f64>,
    #[serde(rename = "emissiveIntensity")]
    emissive_intensity: Option<f64>,
    color: Option<ColorStub>,
}

#[derive(Debug, Default, Copy, Clone, Deserialize)]
struct Vec3Stub {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    z: f64,
}

impl Vec3Stub {
    fn into_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
struct ColorStub {
    r: Option<i32>,
    g: Option<i32>,
    b: Option<i32>,
}

impl ColorStub {
    /// Channels left out of the block keep the fallback color's value.
    fn into_color_with(self, fallback: Color) -> Color {
        Color::new(
            self.r.unwrap_or_else(|| fallback.r()),
            self.g.unwrap_or_else(|| fallback.g()),
            self.b.unwrap_or_else(|| fallback.b()),
        )
    }
}

fn default_intensity() -> f64 {
    1.0
}

fn default_height() -> f64 {
    f64::INFINITY
}

fn default_minor_radius() -> f64 {
    0.5
}

fn default_scale() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen::light::LightKind;

    const MINIMAL: &str = r#"{
        camera: {
            position: {x: 0, y: 0, z: -5},
            rotation: {},
            resolution: {width: 320, height: 240},
            fieldOfView: 70,
        },
    }"#;

    #[test]
    fn minimal_scene_has_camera_only() {
        let scene = SceneLoader::load_from_str(MINIMAL).unwrap();

        assert_eq!(scene.camera.fov, 70.0);
        assert_eq!((scene.camera.width, scene.camera.height), (320, 240));
        assert_eq!(scene.camera.position, Vector3::new(0.0, 0.0, -5.0));
        assert!(scene.primitives().is_empty());
        assert!(scene.lights().is_empty());
    }

    #[test]
    fn missing_camera_is_an_error() {
        let result = SceneLoader::load_from_str("{ lights: {} }");

        assert!(matches!(result, Err(LoaderError::Format(_))));
    }

    #[test]
    fn full_scene_loads_every_kind() {
        let scene = SceneLoader::load_from_str(
            r#"{
            camera: {
                position: {x: 0, y: 1, z: -10},
                rotation: {x: 0, y: 0, z: 0},
                resolution: {width: 800, height: 600},
                fieldOfView: 60,
            },
            lights: {
                ambient: 0.2,
                point: [{x: 5, y: 5, z: -5}],
                directional: [
                    {position: {y: 10}, direction: {y: -1}, intensity: 0.5},
                ],
            },
            primitives: {
                spheres: [{x: 0, y: 0, z: 5, r: 1, color: {r: 255, g: 0, b: 0}}],
                planes: [{axis: "y", position: -2}],
                cylinders: [{baseCenter: {x: -3}, radius: 1, height: 2}],
                cones: [{baseCenter: {x: 3}, radius: 1, height: 2, rotation: {z: 45}}],
                triangles: [{a: {x: -1}, b: {x: 1}, c: {y: 1}}],
                torus: [{center: {z: 8}, majorRadius: 2, minorRadius: 0.5}],
                tanglecubes: [{center: {z: 12}, size: 1}],
            },
        }"#,
        )
        .unwrap();

        assert_eq!(scene.primitives().len(), 7);
        assert_eq!(scene.lights().len(), 3);
        assert_eq!(scene.lights()[0].kind(), LightKind::Ambient);
        assert_eq!(scene.lights()[1].kind(), LightKind::Point);
        assert_eq!(scene.lights()[1].intensity(), 1.0);
        assert_eq!(scene.lights()[2].kind(), LightKind::Directional);
        assert_eq!(scene.lights()[2].intensity(), 0.5);

        assert_eq!(scene.primitives()[0].color(), Color::new(255, 0, 0));
        assert_eq!(scene.primitives()[1].color(), Color::WHITE);
    }

    #[test]
    fn ambient_out_of_range_is_rejected() {
        let result = SceneLoader::load_from_str(
            r#"{
            camera: {
                position: {}, rotation: {},
                resolution: {width: 10, height: 10}, fieldOfView: 60,
            },
            lights: {ambient: 1.5},
        }"#,
        );

        assert!(matches!(result, Err(LoaderError::Invalid(_))));
    }

    #[test]
    fn invalid_plane_axis_is_rejected() {
        let result = SceneLoader::load_from_str(
            r#"{
            camera: {
                position: {}, rotation: {},
                resolution: {width: 10, height: 10}, fieldOfView: 60,
            },
            primitives: {planes: [{axis: "w", position: 0}]},
        }"#,
        );

        assert!(matches!(result, Err(LoaderError::Invalid(_))));
    }

    #[test]
    fn material_block_overrides_defaults() {
        let scene = SceneLoader::load_from_str(
            r#"{
            camera: {
                position: {}, rotation: {},
                resolution: {width: 10, height: 10}, fieldOfView: 60,
            },
            primitives: {
                spheres: [{
                    x: 0, y: 0, z: 5, r: 1,
                    color: {r: 10, g: 20, b: 30},
                    material: {
                        type: "metal",
                        roughness: 0.25,
                        reflectivity: 0.9,
                        color: {r: 200},
                    },
                }],
            },
        }"#,
        )
        .unwrap();

        let material = scene.primitives()[0].material();
        assert_eq!(material.kind, MaterialKind::Metal);
        assert_eq!(material.roughness, 0.25);
        assert_eq!(material.reflectivity, 0.9);
        // Channels missing from the material color keep the entry color.
        assert_eq!(material.color, Color::new(200, 20, 30));
    }

    #[test]
    fn material_type_aliases_map() {
        for (name, kind) in [
            ("flat", MaterialKind::Flat),
            ("flat_color", MaterialKind::Flat),
            ("glass", MaterialKind::Dielectric),
            ("light", MaterialKind::Emissive),
        ] {
            let scene = SceneLoader::load_from_str(&format!(
                r#"{{
                camera: {{
                    position: {{}}, rotation: {{}},
                    resolution: {{width: 10, height: 10}}, fieldOfView: 60,
                }},
                primitives: {{
                    spheres: [{{x: 0, y: 0, z: 5, r: 1, material: {{type: "{name}"}}}}],
                }},
            }}"#
            ))
            .unwrap();

            assert_eq!(scene.primitives()[0].material().kind, kind);
        }
    }

    #[test]
    fn cylinder_height_defaults_to_infinite() {
        let scene = SceneLoader::load_from_str(
            r#"{
            camera: {
                position: {}, rotation: {},
                resolution: {width: 10, height: 10}, fieldOfView: 60,
            },
            primitives: {cylinders: [{baseCenter: {}, radius: 1}]},
        }"#,
        )
        .unwrap();

        // An infinite cylinder has no caps, so a ray high above the base
        // still hits the lateral surface.
        let ray = lumen::Ray::new(Vector3::new(0.0, 500.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(scene.primitives()[0].intersect(&ray).is_some());
    }
}
