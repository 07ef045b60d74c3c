//! Offscreen render target and pipeline for the mesh viewport.

use std::num::NonZeroU64;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use meshview_core::{CameraState, ViewerOptions};

use crate::buffer::{self, aligned_bytes_per_row};
use crate::context::GpuContext;
use crate::error::{RenderError, RenderResult};
use crate::renderable::Renderable;

/// Depth format of the viewer target.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame uniforms shared by every renderable.
/// Note: Layout must match WGSL `FrameUniforms` exactly (240 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub model_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Inverse transpose of `model_view`, for transforming normals.
    pub normal_matrix: [[f32; 4]; 4],
    /// Normalized eye-space light direction (w unused).
    pub light_dir: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
}

impl FrameUniforms {
    /// Builds the uniforms for one tick from the camera and the static options.
    pub fn new(camera: &CameraState, options: &ViewerOptions) -> Self {
        let cam = &options.camera;
        let model_view = camera.model_view(cam.pan_divisor);
        let projection = Mat4::perspective_rh(
            cam.fov_degrees.to_radians(),
            options.viewer_aspect(),
            cam.near,
            cam.far,
        );
        let light = &options.lighting;
        let light_dir = light.direction.try_normalize().unwrap_or(Vec3::Z);
        Self {
            model_view: model_view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            normal_matrix: model_view.inverse().transpose().to_cols_array_2d(),
            light_dir: light_dir.extend(0.0).to_array(),
            ambient: light.ambient.extend(1.0).to_array(),
            diffuse: light.diffuse.extend(1.0).to_array(),
        }
    }
}

/// GPU state needed to draw into the mesh viewport.
///
/// Built once and handed to [`Renderable::compile`] and to every frame.
pub struct ViewerContext {
    pub(crate) device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pub(crate) color_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    pub(crate) pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    pub(crate) frame_bind_group: wgpu::BindGroup,
    pub(crate) object_bind_group_layout: wgpu::BindGroupLayout,
}

impl ViewerContext {
    /// Creates the viewer target (`width` x `height`) and the mesh pipeline.
    ///
    /// `color_format` must match the composite texture so the result can be copied into it.
    pub fn new(
        gpu: &GpuContext,
        width: u32,
        height: u32,
        color_format: wgpu::TextureFormat,
        background: Vec3,
    ) -> Self {
        let device = &gpu.device;
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };

        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("viewer color target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("viewer depth target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(240),
                    },
                    count: None,
                }],
            });

        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(32),
                    },
                    count: None,
                }],
            });

        let frame_buffer = buffer::create_uniform_buffer(
            device,
            &FrameUniforms::new(&CameraState::new(1.0), &ViewerOptions::default()),
            Some("frame uniforms"),
        );
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Renderable::vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            device: Arc::clone(&gpu.device),
            queue: Arc::clone(&gpu.queue),
            color_format,
            width: size.width,
            height: size.height,
            clear_color: wgpu::Color {
                r: f64::from(background.x),
                g: f64::from(background.y),
                b: f64::from(background.z),
                a: 1.0,
            },
            color_texture,
            color_view,
            depth_view,
            pipeline,
            frame_buffer,
            frame_bind_group,
            object_bind_group_layout,
        }
    }

    /// Target width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The rendered color target, ready to be copied into the composite.
    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color_texture
    }

    /// The device this context renders with.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The queue this context submits to.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Writes the frame uniforms read by every renderable.
    pub fn update_frame(&self, uniforms: &FrameUniforms) {
        buffer::update_uniform_buffer(&self.queue, &self.frame_buffer, uniforms);
    }

    /// Clears color and depth, then replays `renderable` if there is one.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, renderable: Option<&Renderable>) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Viewer Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        if let Some(renderable) = renderable {
            renderable.draw(&mut render_pass);
        }
    }

    /// Reads the color target back as tightly packed RGBA8 rows.
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn capture(&self) -> RenderResult<Vec<u8>> {
        let bytes_per_row = aligned_bytes_per_row(self.width);
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("viewer capture buffer"),
            size: u64::from(bytes_per_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("viewer capture encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        rx.recv()
            .map_err(|_| RenderError::BufferMapFailed)?
            .map_err(|_| RenderError::BufferMapFailed)?;

        let data = slice.get_mapped_range();
        let row_bytes = (self.width * 4) as usize;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        for row in 0..self.height {
            let start = (row * bytes_per_row) as usize;
            pixels.extend_from_slice(&data[start..start + row_bytes]);
        }
        drop(data);
        staging.unmap();
        Ok(pixels)
    }
}
