//! Polygon meshes loaded from Wavefront OBJ files.

use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::error::{MeshviewError, Result};
use crate::geometry;
use crate::record::{records, Dialect, Record};

/// Scale applied to parsed vertex positions unless overridden.
pub const DEFAULT_VERTEX_SCALE: f32 = 10.0;

/// How raw OBJ coordinates are mapped into viewer space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshLoadOptions {
    /// Interchange Y and Z on every vertex and normal.
    pub swap_yz: bool,
    /// Uniform scale applied to vertex positions after the swap.
    pub scale: f32,
}

impl MeshLoadOptions {
    /// Options with the default scale.
    pub fn new(swap_yz: bool) -> Self {
        Self {
            swap_yz,
            scale: DEFAULT_VERTEX_SCALE,
        }
    }

    /// Overrides the vertex scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    fn orient(self, v: Vec3) -> Vec3 {
        if self.swap_yz {
            Vec3::new(v.x, v.z, v.y)
        } else {
            v
        }
    }
}

impl Default for MeshLoadOptions {
    fn default() -> Self {
        Self::new(false)
    }
}

/// An immutable polygon mesh.
///
/// Invariants: every face index is `< vertices.len()`, and `normals` is either empty
/// or index-aligned with `vertices`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Vec<u32>>,
    normals: Vec<Vec3>,
    material_library: Option<PathBuf>,
    material_name: Option<String>,
}

impl Mesh {
    /// Builds a mesh, checking the index and normal invariants.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Vec<u32>>, normals: Vec<Vec3>) -> Result<Self> {
        let count = vertices.len();
        if let Some((fi, bad)) = faces.iter().enumerate().find_map(|(fi, face)| {
            face.iter()
                .find(|&&i| i as usize >= count)
                .map(|&i| (fi, i))
        }) {
            return Err(MeshviewError::InvalidMesh(format!(
                "face {fi} references vertex {bad} but the mesh has {count} vertices"
            )));
        }
        if !normals.is_empty() && normals.len() != count {
            return Err(MeshviewError::InvalidMesh(format!(
                "{} normals for {count} vertices",
                normals.len()
            )));
        }
        Ok(Self {
            vertices,
            faces,
            normals,
            material_library: None,
            material_name: None,
        })
    }

    /// Loads, recenters, and (if needed) derives normals for the OBJ file at `path`.
    pub fn load(path: impl AsRef<Path>, options: MeshLoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MeshviewError::io(path, e))?;
        let mesh = Self::parse(path, &text, options)?.recenter();
        let mesh = if mesh.has_normals() {
            mesh
        } else {
            mesh.with_computed_normals()
        };
        log::info!(
            "loaded {}: {} vertices, {} faces",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }

    /// Parses OBJ text without normalizing it.
    ///
    /// `path` is used for error messages and to resolve `mtllib` references.
    pub fn parse(path: &Path, text: &str, options: MeshLoadOptions) -> Result<Self> {
        let mut vertices: Vec<Vec3> = Vec::new();
        let mut parsed_normals: Vec<Vec3> = Vec::new();
        let mut faces: Vec<(usize, Vec<u32>)> = Vec::new();
        let mut material_library = None;
        let mut material_name = None;

        let malformed = |line: usize, reason: String| MeshviewError::MalformedAsset {
            path: path.to_path_buf(),
            line,
            reason,
        };

        for item in records(path, text, Dialect::Obj) {
            let (line, record) = item?;
            match record {
                Record::Vertex(v) => vertices.push(options.orient(v) * options.scale),
                Record::Normal(n) => parsed_normals.push(options.orient(n)),
                Record::Face(refs) => {
                    let face = refs
                        .iter()
                        .map(|&r| resolve_reference(r, vertices.len()))
                        .collect::<std::result::Result<Vec<u32>, String>>()
                        .map_err(|reason| malformed(line, reason))?;
                    faces.push((line, face));
                }
                Record::MaterialLibrary(file) => {
                    let dir = path.parent().unwrap_or_else(|| Path::new(""));
                    material_library = Some(dir.join(file));
                }
                Record::UseMaterial(name) => {
                    material_name.get_or_insert_with(|| name.to_string());
                }
                Record::NewMaterial(_) | Record::DiffuseMap(_) | Record::Other { .. } => {}
            }
        }

        let count = vertices.len();
        if let Some((line, face)) = faces
            .iter()
            .find(|(_, face)| face.iter().any(|&i| i as usize >= count))
        {
            return Err(malformed(
                *line,
                format!("face {face:?} references a vertex past the {count} defined"),
            ));
        }

        let normals = if parsed_normals.is_empty() {
            Vec::new()
        } else if parsed_normals.len() == count {
            parsed_normals
                .into_iter()
                .map(|n| n.try_normalize().unwrap_or(geometry::DEFAULT_NORMAL))
                .collect()
        } else {
            log::warn!(
                "{}: {} normals for {count} vertices, normals will be recomputed",
                path.display(),
                parsed_normals.len()
            );
            Vec::new()
        };

        let faces = faces.into_iter().map(|(_, face)| face).collect();
        let mut mesh = Self::new(vertices, faces, normals)?;
        mesh.material_library = material_library;
        mesh.material_name = material_name;
        Ok(mesh)
    }

    /// Returns a copy translated so the vertex centroid is at the origin.
    #[must_use]
    pub fn recenter(mut self) -> Self {
        geometry::recenter(&mut self.vertices);
        self
    }

    /// Returns a copy whose normals are synthesized from the face geometry.
    #[must_use]
    pub fn with_computed_normals(mut self) -> Self {
        self.normals = geometry::compute_normals(&self.vertices, &self.faces);
        self
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Faces as 0-based vertex index lists.
    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    /// Per-vertex normals, empty if none were parsed or computed yet.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Whether the mesh carries normals.
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Companion material library named by `mtllib`, resolved against the OBJ directory.
    pub fn material_library(&self) -> Option<&Path> {
        self.material_library.as_deref()
    }

    /// First material named by `usemtl`.
    pub fn material_name(&self) -> Option<&str> {
        self.material_name.as_deref()
    }

    /// Number of triangles after fan triangulation of every face.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len().saturating_sub(2)).sum()
    }
}

/// Turns an OBJ vertex reference into a 0-based index.
///
/// Positive references are 1-based; negative ones count back from the vertices
/// defined so far.
fn resolve_reference(reference: i64, defined: usize) -> std::result::Result<u32, String> {
    let index = match reference {
        0 => return Err("vertex reference 0 is invalid (references are 1-based)".to_string()),
        r if r > 0 => r - 1,
        r => i64::try_from(defined).unwrap_or(i64::MAX) + r,
    };
    if index < 0 {
        return Err(format!(
            "relative vertex reference {reference} reaches before the first vertex"
        ));
    }
    u32::try_from(index).map_err(|_| format!("vertex reference {reference} is too large"))
}
