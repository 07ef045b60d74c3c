//! Loading an asset directory into the viewer's object set, without a GPU.

use std::path::{Path, PathBuf};

use glam::Vec3;
use meshview::{load_object_set, open_frame_source, Playback};
use meshview_core::*;

const CUBE_CORNER: &str = "\
mtllib corner.mtl
usemtl red
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

const STRIP: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("meshview_app_{name}_{}", std::process::id()));
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

/// Rejects every texture, like a GPU uploader would for unreadable images.
struct RejectingUploader;

impl TextureUploader for RejectingUploader {
    fn upload(&mut self, path: &Path) -> Result<TextureHandle> {
        Err(MeshviewError::TextureLoad {
            path: path.to_path_buf(),
            reason: "not an image".to_string(),
        })
    }
}

fn options() -> ViewerOptions {
    ViewerOptions {
        default_color: Vec3::new(0.5, 0.5, 0.5),
        ..ViewerOptions::default()
    }
}

#[test]
fn test_materials_pick_the_base_color() {
    let dir = TempDir::new("colors");
    dir.write("a_corner.obj", CUBE_CORNER);
    dir.write("b_strip.obj", STRIP);
    dir.write("corner.mtl", "newmtl red\nKd 1 0 0\nmap_Kd red.png\n");

    let catalog = AssetCatalog::scan(&dir.0, "obj").unwrap();
    let mut objects = load_object_set(&catalog, &options(), &mut RejectingUploader).unwrap();

    assert_eq!(objects.len(), 2);
    let corner = objects.active();
    assert_eq!(corner.name, "a_corner.obj");
    assert!(corner.material.as_ref().unwrap().diffuse_texture().is_none());
    assert_eq!(corner.style(options().default_color).base_color, Vec3::X);

    let strip = objects.next();
    assert!(strip.material.is_none());
    assert_eq!(
        strip.style(options().default_color).base_color,
        Vec3::new(0.5, 0.5, 0.5)
    );
}

#[test]
fn test_loaded_meshes_use_configured_scale() {
    let dir = TempDir::new("scale");
    dir.write("strip.obj", STRIP);

    let catalog = AssetCatalog::scan(&dir.0, "obj").unwrap();
    let objects = load_object_set(&catalog, &options(), &mut RejectingUploader).unwrap();
    let mesh = &objects.active().mesh;

    // A unit square scaled by 10 and recentered spans -5..5.
    let max_x = mesh.vertices().iter().map(|v| v.x).fold(f32::MIN, f32::max);
    assert!((max_x - 5.0).abs() < 1e-5, "max x {max_x}");
    assert_eq!(mesh.normals().len(), 4);
}

#[test]
fn test_missing_material_library_is_not_fatal() {
    let dir = TempDir::new("nomtl");
    dir.write("corner.obj", CUBE_CORNER);

    let catalog = AssetCatalog::scan(&dir.0, "obj").unwrap();
    let objects = load_object_set(&catalog, &options(), &mut RejectingUploader).unwrap();
    assert!(objects.active().material.is_none());
}

#[test]
fn test_malformed_material_library_is_fatal() {
    let dir = TempDir::new("badmtl");
    dir.write("corner.obj", CUBE_CORNER);
    dir.write("corner.mtl", "Kd 1 0 0\n");

    let catalog = AssetCatalog::scan(&dir.0, "obj").unwrap();
    let err = load_object_set(&catalog, &options(), &mut RejectingUploader).unwrap_err();
    assert!(matches!(err, MeshviewError::MalformedAsset { line: 1, .. }));
}

#[test]
fn test_default_video_is_looked_up_in_the_asset_dir() {
    let dir = TempDir::new("novideo");
    dir.write("strip.obj", STRIP);

    let catalog = AssetCatalog::scan(&dir.0, "obj").unwrap();
    let video = catalog.sibling(&options().video_file_name);
    assert_eq!(video, dir.0.join("trackedvideo.mp4"));

    let err = open_frame_source(&video).err().unwrap();
    assert!(err.is_fatal_startup());
    assert!(err.to_string().contains("trackedvideo.mp4"));
}

#[test]
fn test_gif_plays_in_a_loop() {
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba, RgbaImage};

    let dir = TempDir::new("gif");
    let path = dir.0.join("clip.gif");
    {
        let mut encoder = GifEncoder::new(std::fs::File::create(&path).unwrap());
        for shade in [0u8, 255] {
            let image = RgbaImage::from_pixel(6, 3, Rgba([shade, shade, shade, 255]));
            encoder
                .encode_frame(Frame::from_parts(image, 0, 0, Delay::from_numer_denom_ms(33, 1)))
                .unwrap();
        }
    }

    let mut playback = Playback::new(open_frame_source(&path).unwrap());
    for _ in 0..5 {
        let frame = playback.next_frame().unwrap();
        assert_eq!((frame.width, frame.height), (6, 3));
    }
    assert_eq!(playback.loops(), 2);
}
