use crate::color::Color;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MaterialKind {
    /// Flat color, no lighting response beyond the common pipeline.
    Flat,
    Lambertian,
    Metal,
    /// Transmission is carried as data only; no transport path exists for it.
    Dielectric,
    Emissive,
}

/// Shading parameters, copied by value into each primitive at construction.
/// Scalar parameters are [0, 1] by convention but not enforced.
#[derive(Debug, Copy, Clone)]
pub struct Material {
    pub kind: MaterialKind,
    pub roughness: f64,
    pub metalness: f64,
    pub reflectivity: f64,
    pub transparency: f64,
    pub refractive_index: f64,
    pub emissive_intensity: f64,
    pub color: Color,
}

impl Material {
    pub fn new(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            color,
            ..Self::default()
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Lambertian,
            roughness: 0.5,
            metalness: 0.0,
            reflectivity: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
            emissive_intensity: 0.0,
            color: Color::WHITE,
        }
    }
}
