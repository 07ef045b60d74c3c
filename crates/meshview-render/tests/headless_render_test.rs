//! Headless rendering integration tests.
//!
//! These tests need a GPU adapter (real or software fallback) and are ignored by
//! default. Run them with: cargo test -p meshview-render -- --ignored

use meshview_core::{CameraState, Mesh, MeshLoadOptions, ViewerOptions};
use meshview_render::*;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

fn context() -> (GpuContext, ViewerContext) {
    let gpu = pollster::block_on(GpuContext::new_headless()).expect("no GPU adapter available");
    let viewer = ViewerContext::new(
        &gpu,
        WIDTH,
        HEIGHT,
        wgpu::TextureFormat::Rgba8Unorm,
        glam::Vec3::ZERO,
    );
    (gpu, viewer)
}

fn options() -> ViewerOptions {
    ViewerOptions {
        window_width: WIDTH * 2,
        window_height: HEIGHT,
        viewer_width: WIDTH,
        ..ViewerOptions::default()
    }
}

fn render(viewer: &ViewerContext, renderable: Option<&Renderable>) -> Vec<u8> {
    let uniforms = FrameUniforms::new(&CameraState::new(15.0), &options());
    viewer.update_frame(&uniforms);
    let mut encoder = viewer
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    viewer.render(&mut encoder, renderable);
    viewer.queue().submit(std::iter::once(encoder.finish()));
    viewer.capture().expect("capture failed")
}

fn quad() -> Mesh {
    let text = "v -1 -1 0\nv 1 -1 0\nv 1 1 0\nv -1 1 0\nf 1 2 3 4\n";
    Mesh::parse(
        std::path::Path::new("quad.obj"),
        text,
        MeshLoadOptions::new(false).with_scale(3.0),
    )
    .unwrap()
    .recenter()
    .with_computed_normals()
}

#[test]
#[ignore = "requires a GPU adapter"]
fn test_empty_frame_is_background() {
    let (_gpu, viewer) = context();
    let pixels = render(&viewer, None);
    assert_eq!(pixels.len(), (WIDTH * HEIGHT * 4) as usize);
    assert!(pixels.chunks(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
#[ignore = "requires a GPU adapter"]
fn test_lit_quad_covers_center() {
    let (_gpu, viewer) = context();
    let renderable = Renderable::compile(&viewer, &quad(), &ObjectStyle::default());
    assert!(renderable.is_lit());
    assert_eq!(renderable.vertex_count(), 6);

    let pixels = render(&viewer, Some(&renderable));
    let center = ((HEIGHT / 2 * WIDTH + WIDTH / 2) * 4) as usize;
    assert!(pixels[center] > 0, "center pixel should be lit");
    assert_eq!(&pixels[0..4], &[0, 0, 0, 255], "corner should be background");

    // Replaying the same bundle again gives the same image.
    assert_eq!(render(&viewer, Some(&renderable)), pixels);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn test_unlit_quad_uses_base_color() {
    let (_gpu, viewer) = context();
    let mesh = Mesh::new(quad().vertices().to_vec(), quad().faces().to_vec(), vec![]).unwrap();
    let style = ObjectStyle {
        base_color: glam::Vec3::new(1.0, 0.0, 0.0),
    };
    let renderable = Renderable::compile(&viewer, &mesh, &style);
    assert!(!renderable.is_lit());

    let pixels = render(&viewer, Some(&renderable));
    let center = ((HEIGHT / 2 * WIDTH + WIDTH / 2) * 4) as usize;
    assert_eq!(&pixels[center..center + 4], &[255, 0, 0, 255]);
}
