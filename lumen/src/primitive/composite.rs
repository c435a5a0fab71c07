use std::sync::Arc;

use cgmath::{Vector3, Zero};

use super::{Hit, Primitive};
use crate::material::Material;
use crate::{Ray, HIT_EPSILON};

/// Aggregate of primitives behind the same interface, so a whole hierarchy
/// can be intersected as one unit. Children may themselves be composites.
pub struct Composite {
    children: Vec<Arc<dyn Primitive>>,
    material: Material,
}

impl Composite {
    pub fn new() -> Self {
        Self::with_material(Material::default())
    }

    pub fn with_material(material: Material) -> Self {
        Self {
            children: Vec::new(),
            material,
        }
    }

    /// Adds a child. Self-insertion and duplicate handles (same allocation)
    /// are rejected; returns whether the child was added.
    pub fn push(&mut self, child: Arc<dyn Primitive>) -> bool {
        let child_addr = Arc::as_ptr(&child) as *const ();
        if child_addr == self as *const Self as *const () {
            return false;
        }

        if self.children.iter().any(|c| Arc::ptr_eq(c, &child)) {
            return false;
        }

        self.children.push(child);
        true
    }

    pub fn children(&self) -> &[Arc<dyn Primitive>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for Composite {
    fn default() -> Self {
        Self::new()
    }
}

impl Primitive for Composite {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        self.resolve(ray).map(|hit| hit.distance)
    }

    /// Answer with the composite's own material when queried without a
    /// resolved hit; shading queries normally go to the leaf named by the
    /// returned [`Hit`].
    fn normal_at(&self, _point: Vector3<f64>) -> Vector3<f64> {
        Vector3::new(0.0, 1.0, 0.0)
    }

    fn material(&self) -> &Material {
        &self.material
    }

    /// Arithmetic mean of the children's centers.
    fn center(&self) -> Vector3<f64> {
        if self.children.is_empty() {
            return Vector3::zero();
        }

        let sum = self
            .children
            .iter()
            .fold(Vector3::zero(), |acc, child| acc + child.center());

        sum / self.children.len() as f64
    }

    fn resolve(&self, ray: &Ray) -> Option<Hit<'_>> {
        let mut nearest: Option<Hit> = None;

        for child in &self.children {
            if let Some(hit) = child.resolve(ray) {
                if hit.distance <= HIT_EPSILON {
                    continue;
                }

                if nearest
                    .as_ref()
                    .map_or(true, |n| hit.distance < n.distance)
                {
                    nearest = Some(hit);
                }
            }
        }

        nearest
    }
}
