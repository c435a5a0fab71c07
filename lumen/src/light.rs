use std::sync::Arc;

use cgmath::Vector3;

use crate::math::normalize_safe;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Point,
    Directional,
    Composite,
}

/// The kind tag lets the shading loop tell ambient and aggregate lights
/// apart without inspecting concrete types.
pub trait Light: Send + Sync {
    /// Unit direction from a surface point toward the light.
    fn direction_from(&self, point: Vector3<f64>) -> Vector3<f64>;

    fn intensity(&self) -> f64;

    fn kind(&self) -> LightKind;
}

/// Uniform base illumination. The position plays no role in shading and is
/// kept only so the light answers the same queries as the others.
pub struct AmbientLight {
    position: Vector3<f64>,
    intensity: f64,
}

impl AmbientLight {
    pub fn new(position: Vector3<f64>, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

impl Light for AmbientLight {
    fn direction_from(&self, point: Vector3<f64>) -> Vector3<f64> {
        normalize_safe(self.position - point)
    }

    fn intensity(&self) -> f64 {
        self.intensity
    }

    fn kind(&self) -> LightKind {
        LightKind::Ambient
    }
}

pub struct PointLight {
    position: Vector3<f64>,
    intensity: f64,
}

impl PointLight {
    pub fn new(position: Vector3<f64>, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

impl Light for PointLight {
    fn direction_from(&self, point: Vector3<f64>) -> Vector3<f64> {
        normalize_safe(self.position - point)
    }

    fn intensity(&self) -> f64 {
        self.intensity
    }

    fn kind(&self) -> LightKind {
        LightKind::Point
    }
}

pub struct DirectionalLight {
    position: Vector3<f64>,
    direction: Vector3<f64>,
    intensity: f64,
}

impl DirectionalLight {
    pub fn new(position: Vector3<f64>, direction: Vector3<f64>, intensity: f64) -> Self {
        Self {
            position,
            direction: normalize_safe(direction),
            intensity,
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }
}

impl Light for DirectionalLight {
    /// Constant regardless of the queried point.
    fn direction_from(&self, _point: Vector3<f64>) -> Vector3<f64> {
        self.direction
    }

    fn intensity(&self) -> f64 {
        self.intensity
    }

    fn kind(&self) -> LightKind {
        LightKind::Directional
    }
}

/// Aggregates lights for intensity queries. A single representative
/// direction is ill-defined for a group, so `direction_from` answers with
/// the first child (up axis when empty) instead of carrying any per-call
/// state; repeated queries always agree.
pub struct CompositeLight {
    children: Vec<Arc<dyn Light>>,
}

impl CompositeLight {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, light: Arc<dyn Light>) {
        self.children.push(light);
    }

    pub fn children(&self) -> &[Arc<dyn Light>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for CompositeLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Light for CompositeLight {
    fn direction_from(&self, point: Vector3<f64>) -> Vector3<f64> {
        match self.children.first() {
            Some(light) => light.direction_from(point),
            None => Vector3::new(0.0, 1.0, 0.0),
        }
    }

    /// Sum of the children's intensities, clamped to 1.
    fn intensity(&self) -> f64 {
        self.children
            .iter()
            .map(|light| light.intensity())
            .sum::<f64>()
            .min(1.0)
    }

    fn kind(&self) -> LightKind {
        LightKind::Composite
    }
}
