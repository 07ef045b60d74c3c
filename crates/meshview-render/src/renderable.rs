//! Meshes compiled into replayable GPU command bundles.

use glam::Vec3;
use meshview_core::Mesh;

use crate::buffer;
use crate::viewer::{ViewerContext, DEPTH_FORMAT};

/// Interleaved vertex: normal first, then position.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub normal: [f32; 3],
    pub position: [f32; 3],
}

/// Per-object uniforms.
/// Note: Layout must match WGSL `ObjectUniforms` exactly (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct ObjectUniforms {
    pub base_color: [f32; 4],
    /// 0 = unlit, 1 = lit
    pub lighting: u32,
    pub _pad: [u32; 3],
}

/// Appearance of one compiled object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectStyle {
    /// Color modulated by the light.
    pub base_color: Vec3,
}

impl Default for ObjectStyle {
    fn default() -> Self {
        Self {
            base_color: Vec3::ONE,
        }
    }
}

/// Expands the faces of `mesh` into a triangle list.
///
/// Faces are fan-triangulated around their first vertex. Every emitted vertex carries
/// its normal, or zero when the mesh has none.
pub fn triangulate(mesh: &Mesh) -> Vec<MeshVertex> {
    let vertices = mesh.vertices();
    let normals = mesh.normals();
    let vertex = |i: u32| MeshVertex {
        normal: normals.get(i as usize).copied().unwrap_or(Vec3::ZERO).to_array(),
        position: vertices[i as usize].to_array(),
    };

    let mut out = Vec::with_capacity(mesh.triangle_count() * 3);
    for face in mesh.faces() {
        let Some((&first, rest)) = face.split_first() else {
            continue;
        };
        for pair in rest.windows(2) {
            out.push(vertex(first));
            out.push(vertex(pair[0]));
            out.push(vertex(pair[1]));
        }
    }
    out
}

/// A mesh uploaded once and recorded into a [`wgpu::RenderBundle`].
///
/// Drawing replays the bundle; the pass state it sets does not leak out of it.
pub struct Renderable {
    bundle: wgpu::RenderBundle,
    vertex_count: u32,
    lit: bool,
    // Referenced by the bundle; kept alive for as long as it is.
    _vertex_buffer: wgpu::Buffer,
    _uniform_buffer: wgpu::Buffer,
    _bind_group: wgpu::BindGroup,
}

impl Renderable {
    /// Vertex buffer layout matching [`MeshVertex`].
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    /// Uploads `mesh` and records its draw commands.
    ///
    /// Lighting is enabled exactly when the mesh has normals.
    pub fn compile(context: &ViewerContext, mesh: &Mesh, style: &ObjectStyle) -> Self {
        let device = &context.device;
        let vertices = triangulate(mesh);
        let vertex_count = u32::try_from(vertices.len()).unwrap_or(u32::MAX);
        let lit = mesh.has_normals();

        let vertex_buffer = buffer::create_vertex_buffer(device, &vertices, Some("mesh vertices"));
        let uniform_buffer = buffer::create_uniform_buffer(
            device,
            &ObjectUniforms {
                base_color: style.base_color.extend(1.0).to_array(),
                lighting: u32::from(lit),
                _pad: [0; 3],
            },
            Some("object uniforms"),
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &context.object_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let color_formats = [Some(context.color_format)];
        let mut encoder = device.create_render_bundle_encoder(&wgpu::RenderBundleEncoderDescriptor {
            label: Some("mesh bundle encoder"),
            color_formats: &color_formats,
            depth_stencil: Some(wgpu::RenderBundleDepthStencil {
                format: DEPTH_FORMAT,
                depth_read_only: false,
                stencil_read_only: true,
            }),
            sample_count: 1,
            multiview: None,
        });
        encoder.set_pipeline(&context.pipeline);
        encoder.set_bind_group(0, &context.frame_bind_group, &[]);
        encoder.set_bind_group(1, &bind_group, &[]);
        // Empty buffers cannot be bound.
        if vertex_count > 0 {
            encoder.set_vertex_buffer(0, vertex_buffer.slice(..));
            encoder.draw(0..vertex_count, 0..1);
        }
        let bundle = encoder.finish(&wgpu::RenderBundleDescriptor {
            label: Some("mesh bundle"),
        });

        log::debug!("compiled renderable: {} triangles, lit: {lit}", vertex_count / 3);

        Self {
            bundle,
            vertex_count,
            lit,
            _vertex_buffer: vertex_buffer,
            _uniform_buffer: uniform_buffer,
            _bind_group: bind_group,
        }
    }

    /// Replays the recorded commands into `pass`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.execute_bundles(std::iter::once(&self.bundle));
    }

    /// Number of vertices drawn (three per triangle).
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Whether the object is shaded with the light.
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layouts() {
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 32);
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            vec![vec![0, 1, 2, 3]],
            vec![Vec3::Z; 4],
        )
        .unwrap();
        let vertices = triangulate(&mesh);
        let positions: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ]
        );
        assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_missing_normals_are_zero() {
        let mesh =
            Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![vec![0, 1, 2]], vec![]).unwrap();
        let vertices = triangulate(&mesh);
        assert_eq!(vertices.len(), 3);
        assert!(vertices.iter().all(|v| v.normal == [0.0; 3]));
    }
}
