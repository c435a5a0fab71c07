use cgmath::Vector3;
use criterion::{criterion_group, criterion_main, Criterion};

use lumen::material::Material;
use lumen::primitive::{Primitive, Sphere, Torus};
use lumen::Ray;

pub fn sphere_intersect(c: &mut Criterion) {
    let sphere = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Material::default());
    let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));

    c.bench_function("sphere", |b| b.iter(|| sphere.intersect(&ray)));
}

pub fn torus_march(c: &mut Criterion) {
    let torus = Torus::new(
        Vector3::new(0.0, 0.0, 5.0),
        2.0,
        0.5,
        Vector3::new(0.0, 0.0, 0.0),
        Material::default(),
    );
    let ray = Ray::new(Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));

    c.bench_function("torus", |b| b.iter(|| torus.intersect(&ray)));
}

criterion_group!(benches, sphere_intersect, torus_march);
criterion_main!(benches);
