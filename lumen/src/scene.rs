use std::sync::Arc;

use crate::camera::Camera;
use crate::light::{CompositeLight, Light};
use crate::primitive::{Composite, Primitive};

/// A camera plus the root aggregates for geometry and lights. The root
/// composites are the single source of truth; flat iteration is derived
/// from their children, so content can never end up in one bookkeeping
/// structure but not the other.
pub struct Scene {
    pub camera: Camera,
    root: Composite,
    lights: CompositeLight,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            root: Composite::new(),
            lights: CompositeLight::new(),
        }
    }

    /// Returns whether the primitive was added (duplicates are rejected by
    /// the root composite).
    pub fn add_primitive(&mut self, primitive: Arc<dyn Primitive>) -> bool {
        self.root.push(primitive)
    }

    pub fn add_light(&mut self, light: Arc<dyn Light>) {
        self.lights.push(light);
    }

    pub fn root(&self) -> &Composite {
        &self.root
    }

    pub fn primitives(&self) -> &[Arc<dyn Primitive>] {
        self.root.children()
    }

    pub fn light_root(&self) -> &CompositeLight {
        &self.lights
    }

    pub fn lights(&self) -> &[Arc<dyn Light>] {
        self.lights.children()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Camera::new())
    }
}
