//! Geometry normalization: recentering and normal synthesis.

use glam::{DVec3, Vec3};

/// Normal assigned to vertices that no usable face touches. Points along the view axis.
pub const DEFAULT_NORMAL: Vec3 = Vec3::Z;

/// Faces whose edge cross product has a squared length below this are degenerate.
const DEGENERATE_CROSS_LENGTH_SQ: f32 = 1e-24;

/// Returns the arithmetic mean of the vertex positions, or `None` for an empty set.
///
/// Accumulates in double precision so large meshes do not drift.
pub fn centroid(vertices: &[Vec3]) -> Option<DVec3> {
    if vertices.is_empty() {
        return None;
    }
    let sum = vertices
        .iter()
        .fold(DVec3::ZERO, |acc, v| acc + v.as_dvec3());
    #[allow(clippy::cast_precision_loss)]
    Some(sum / vertices.len() as f64)
}

/// Translates the vertices so their centroid sits at the origin.
pub fn recenter(vertices: &mut [Vec3]) {
    let Some(center) = centroid(vertices) else {
        return;
    };
    for v in vertices.iter_mut() {
        *v = (v.as_dvec3() - center).as_vec3();
    }
}

/// Unit normal of a face from its first three vertices, `None` if they are collinear.
pub fn face_normal(vertices: &[Vec3], face: &[u32]) -> Option<Vec3> {
    let [a, b, c] = face.get(..3)? else {
        return None;
    };
    let v0 = vertices[*a as usize];
    let e1 = vertices[*b as usize] - v0;
    let e2 = vertices[*c as usize] - v0;
    let n = e1.cross(e2);
    if !n.is_finite() || n.length_squared() < DEGENERATE_CROSS_LENGTH_SQ {
        return None;
    }
    Some(n.normalize())
}

/// Computes one normal per vertex by averaging the unit normals of its faces.
///
/// Degenerate faces contribute nothing. A vertex with no usable faces, or whose face
/// normals cancel out, gets [`DEFAULT_NORMAL`].
pub fn compute_normals(vertices: &[Vec3], faces: &[Vec<u32>]) -> Vec<Vec3> {
    let mut sums = vec![Vec3::ZERO; vertices.len()];
    let mut counts = vec![0u32; vertices.len()];

    for face in faces {
        let Some(normal) = face_normal(vertices, face) else {
            continue;
        };
        for &vi in face {
            sums[vi as usize] += normal;
            counts[vi as usize] += 1;
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| {
            if count == 0 {
                return DEFAULT_NORMAL;
            }
            #[allow(clippy::cast_precision_loss)]
            let average = sum / count as f32;
            average.try_normalize().unwrap_or(DEFAULT_NORMAL)
        })
        .collect()
}
