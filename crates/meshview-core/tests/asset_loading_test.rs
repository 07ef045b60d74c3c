//! Integration tests for loading assets from disk.
//!
//! Each test works in its own temporary directory so the tests can run in parallel.

use std::path::{Path, PathBuf};

use meshview_core::*;

const TRIANGLE: &str = "\
# single triangle
v 0 0 0
v 3 0 0
v 0 3 0
f 1 2 3
";

const PYRAMID: &str = "\
mtllib pyramid.mtl
usemtl stone
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
v 0 2 0
f 1 2 3 4
f 1 5 2
f 2 5 3
f 3 5 4
f 4 5 1
";

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir =
            std::env::temp_dir().join(format!("meshview_it_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.0.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// Hands out sequential ids without touching a GPU.
#[derive(Default)]
struct CountingUploader {
    uploads: u32,
}

impl TextureUploader for CountingUploader {
    fn upload(&mut self, path: &Path) -> Result<TextureHandle> {
        if !path.exists() {
            return Err(MeshviewError::TextureLoad {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }
        self.uploads += 1;
        Ok(TextureHandle {
            id: self.uploads,
            source: path.to_path_buf(),
            width: 1,
            height: 1,
        })
    }
}

fn load_set(catalog: &AssetCatalog) -> ObjectSet<Mesh> {
    let meshes = catalog
        .meshes()
        .iter()
        .map(|p| Mesh::load(p, MeshLoadOptions::default()))
        .collect::<Result<Vec<_>>>()
        .unwrap();
    ObjectSet::new(meshes).unwrap()
}

#[test]
fn test_two_meshes_cycle() {
    let dir = TempDir::new("cycle");
    dir.write("a_triangle.obj", TRIANGLE);
    dir.write("b_pyramid.obj", PYRAMID);
    dir.write("readme.txt", "not a mesh");

    let catalog = AssetCatalog::scan(&dir.0, "obj").unwrap();
    let mut set = load_set(&catalog);

    assert_eq!(set.len(), 2);
    assert_eq!(set.active().vertex_count(), 3);
    assert_eq!(set.next().vertex_count(), 5);
    assert_eq!(set.active_index(), 1);
    set.next();
    assert_eq!(set.active_index(), 0);
}

#[test]
fn test_loaded_meshes_are_normalized() {
    let dir = TempDir::new("normalized");
    let path = dir.write("pyramid.obj", PYRAMID);

    let mesh = Mesh::load(&path, MeshLoadOptions::default()).unwrap();
    let center = geometry::centroid(mesh.vertices()).unwrap();
    assert!(center.length() < 1e-5, "centroid {center:?}");
    assert_eq!(mesh.normals().len(), mesh.vertex_count());
    for n in mesh.normals() {
        assert!((n.length() - 1.0).abs() < 1e-5);
    }
    // The apex only touches the four sloped sides, which all lean upward.
    assert!(mesh.normals()[4].y > 0.9);
}

#[test]
fn test_mesh_with_material_library() {
    let dir = TempDir::new("materials");
    let obj = dir.write("pyramid.obj", PYRAMID);
    dir.write("stone.png", "placeholder");
    dir.write(
        "pyramid.mtl",
        "newmtl stone\nKd 0.6 0.5 0.4\nmap_Kd stone.png\nnewmtl moss\nmap_Kd missing.png\n",
    );

    let mesh = Mesh::load(&obj, MeshLoadOptions::default()).unwrap();
    let library_path = mesh.material_library().unwrap();
    let mut uploader = CountingUploader::default();
    let library = MaterialLibrary::load(library_path, &mut uploader).unwrap();

    assert_eq!(uploader.uploads, 1);
    let stone = library.get(mesh.material_name().unwrap()).unwrap();
    assert_eq!(stone.diffuse_color(), Some(Vec3::new(0.6, 0.5, 0.4)));
    assert_eq!(stone.diffuse_texture().unwrap().source, dir.0.join("stone.png"));
    assert!(library.get("moss").unwrap().diffuse_texture().is_none());
}

#[test]
fn test_malformed_material_file() {
    let dir = TempDir::new("malformed_mtl");
    let path = dir.write("bad.mtl", "# comment\n\nKa 1 1 1\nnewmtl late\n");

    let err = MaterialLibrary::load(&path, &mut CountingUploader::default()).unwrap_err();
    match err {
        MeshviewError::MalformedAsset { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_unreadable_mesh_reports_path() {
    let err = Mesh::load("/no/such/mesh.obj", MeshLoadOptions::default()).unwrap_err();
    assert!(matches!(err, MeshviewError::Io { .. }));
    assert!(err.to_string().contains("/no/such/mesh.obj"));
}

/// Cross-checks the parser against tobj on the same file.
#[test]
fn test_matches_tobj() {
    let dir = TempDir::new("tobj");
    let text = PYRAMID
        .replace("mtllib pyramid.mtl\n", "")
        .replace("usemtl stone\n", "");
    let path = dir.write("pyramid.obj", &text);

    let (models, _) = tobj::load_obj(
        &path,
        &tobj::LoadOptions {
            single_index: false,
            triangulate: false,
            ..Default::default()
        },
    )
    .unwrap();
    let reference = &models[0].mesh;

    let mesh = Mesh::parse(&path, &text, MeshLoadOptions::new(false).with_scale(1.0)).unwrap();

    let positions: Vec<f32> = mesh.vertices().iter().flat_map(|v| v.to_array()).collect();
    assert_eq!(positions, reference.positions);

    let indices: Vec<u32> = mesh.faces().iter().flatten().copied().collect();
    assert_eq!(indices, reference.indices);
    assert_eq!(mesh.triangle_count(), 6);
}
