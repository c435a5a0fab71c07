//! Wavefront OBJ ingestion: `v`/`f` records become a flat list of world
//! space triangles, transformed by scale, Euler rotation (degrees, X then Y
//! then Z) and offset. Malformed records are skipped; only an unreadable
//! file is an error.

use std::path::Path;

use cgmath::{Deg, Matrix3, Vector3};

use rayon::prelude::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("could not read OBJ file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Copy, Clone)]
pub struct ParsedTriangle {
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,
    pub c: Vector3<f64>,
}

pub fn load_from_path<P: AsRef<Path>>(
    path: P,
    scale: f64,
    offset: Vector3<f64>,
    rotation: Vector3<f64>,
) -> Result<Vec<ParsedTriangle>, ObjError> {
    let text = std::fs::read_to_string(path)?;

    Ok(parse(&text, scale, offset, rotation))
}

pub fn parse(
    text: &str,
    scale: f64,
    offset: Vector3<f64>,
    rotation: Vector3<f64>,
) -> Vec<ParsedTriangle> {
    let rot = Matrix3::from_angle_z(Deg(rotation.z))
        * Matrix3::from_angle_y(Deg(rotation.y))
        * Matrix3::from_angle_x(Deg(rotation.x));

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let vertex_lines: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| line.starts_with("v "))
        .collect();
    let face_lines: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| line.starts_with("f "))
        .collect();

    let vertices: Vec<Vector3<f64>> = vertex_lines
        .par_iter()
        .map(|line| {
            let v = parse_vertex(line);

            rot * (v * scale) + offset
        })
        .collect();

    face_lines
        .par_iter()
        .flat_map_iter(|line| parse_face(line, &vertices))
        .collect()
}

/// Missing coordinates read as zero, like a partial `v` record would.
fn parse_vertex(line: &str) -> Vector3<f64> {
    let mut coords = line[2..]
        .split_whitespace()
        .map(|token| token.parse::<f64>().unwrap_or(0.0));

    Vector3::new(
        coords.next().unwrap_or(0.0),
        coords.next().unwrap_or(0.0),
        coords.next().unwrap_or(0.0),
    )
}

/// Fan-triangulates a polygonal face. Only the vertex index of each
/// `v/vt/vn` token is used; unparsable tokens and out-of-range indices drop
/// the affected triangles.
fn parse_face(line: &str, vertices: &[Vector3<f64>]) -> Vec<ParsedTriangle> {
    let indices: Vec<usize> = line[2..]
        .split_whitespace()
        .filter_map(|token| {
            let index = token.split('/').next()?;

            index
                .parse::<i64>()
                .ok()
                .and_then(|i| usize::try_from(i - 1).ok())
        })
        .collect();

    if indices.len() < 3 {
        return Vec::new();
    }

    let mut triangles = Vec::with_capacity(indices.len() - 2);
    for j in 1..indices.len() - 1 {
        let (i0, i1, i2) = (indices[0], indices[j], indices[j + 1]);

        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }

        triangles.push(ParsedTriangle {
            a: vertices[i0],
            b: vertices[i1],
            c: vertices[i2],
        });
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    const QUAD: &str = "\
# a unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    #[test]
    fn quad_becomes_two_triangles() {
        let triangles = parse(QUAD, 1.0, Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0));

        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].a, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(triangles[0].c, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles[1].b, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles[1].c, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn scale_rotation_offset_apply_in_order() {
        let triangles = parse(
            "v 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\n",
            2.0,
            Vector3::new(10.0, 0.0, 0.0),
            Vector3::new(0.0, 90.0, 0.0),
        );

        // (1, 0, 0) scales to (2, 0, 0), yaws onto (0, 0, -2), then shifts.
        assert!((triangles[0].a - Vector3::new(10.0, 0.0, -2.0)).magnitude() < 1e-9);
    }

    #[test]
    fn slash_tokens_use_vertex_index_only() {
        let triangles = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/2 3/3/3\n",
            1.0,
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
        );

        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].b, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn out_of_range_faces_are_dropped() {
        let triangles = parse(
            "v 0 0 0\nv 1 0 0\nf 1 2 9\nf 1 2\n",
            1.0,
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
        );

        assert!(triangles.is_empty());
    }
}
