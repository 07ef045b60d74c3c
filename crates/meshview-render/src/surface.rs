//! The window surface shared by the viewer thread and the video loop.
//!
//! Both producers draw into one persistent composite texture, each into its own
//! [`Viewport`]. Presenting blits the whole composite to the swapchain. Only
//! swapchain acquisition and presentation are serialized.

use std::sync::{Arc, Mutex, PoisonError};

use image::RgbaImage;

use crate::context::GpuContext;
use crate::error::{RenderError, RenderResult};

/// A rectangle of the composite texture, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Splits a `width` x `height` area at column `split` into left and right viewports.
    pub fn split_columns(width: u32, height: u32, split: u32) -> (Self, Self) {
        let split = split.min(width);
        (
            Self::new(0, 0, split, height),
            Self::new(split, 0, width - split, height),
        )
    }

    /// Whether the two rectangles share any pixel.
    #[cfg(test)]
    fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    fn origin(&self) -> wgpu::Origin3d {
        wgpu::Origin3d {
            x: self.x,
            y: self.y,
            z: 0,
        }
    }

    fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

/// Composite format that stores pixels the same way the swapchain expects them.
pub fn composite_format_for(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if surface_format.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

struct SwapChain {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

/// Fullscreen blit from the composite to the swapchain image.
struct BlitPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl BlitPass {
    fn new(
        device: &wgpu::Device,
        composite_view: &wgpu::TextureView,
        output_format: wgpu::TextureFormat,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Group Layout"),
            entries: &[
                // Composite texture
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: output_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Blit Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(composite_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            pipeline,
            bind_group,
        }
    }

    fn render(&self, encoder: &mut wgpu::CommandEncoder, output_view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1); // Fullscreen triangle
    }
}

/// The presentation surface plus the composite both producers write into.
pub struct SharedSurface {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    swap_chain: Mutex<SwapChain>,
    composite: wgpu::Texture,
    composite_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    blit: BlitPass,
}

impl SharedSurface {
    /// Configures `surface` at `width` x `height` and creates a matching composite.
    pub fn new(
        gpu: &GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        let device = &gpu.device;
        let width = width.max(1);
        let height = height.max(1);

        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::UnsupportedSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(device, &config);

        let composite_format = composite_format_for(surface_format);
        let composite = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("composite"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: composite_format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let composite_view = composite.create_view(&wgpu::TextureViewDescriptor::default());
        let blit = BlitPass::new(device, &composite_view, surface_format);

        log::info!("surface {width}x{height}, format {surface_format:?}");

        Ok(Self {
            device: Arc::clone(&gpu.device),
            queue: Arc::clone(&gpu.queue),
            swap_chain: Mutex::new(SwapChain { surface, config }),
            composite,
            composite_format,
            width,
            height,
            blit,
        })
    }

    /// Format of the composite texture. Offscreen targets copied into it must match.
    pub fn composite_format(&self) -> wgpu::TextureFormat {
        self.composite_format
    }

    /// Composite size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn check_region(&self, region: Viewport) -> RenderResult<()> {
        let fits = region.x.checked_add(region.width).is_some_and(|r| r <= self.width)
            && region.y.checked_add(region.height).is_some_and(|b| b <= self.height);
        if fits {
            Ok(())
        } else {
            Err(RenderError::RegionOutOfBounds {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                surface_width: self.width,
                surface_height: self.height,
            })
        }
    }

    /// Uploads `image` into `region`. The image must be exactly the region's size.
    pub fn write_pixels(&self, region: Viewport, image: &RgbaImage) -> RenderResult<()> {
        self.check_region(region)?;
        let expected = region.width as usize * region.height as usize * 4;
        if image.dimensions() != (region.width, region.height) {
            return Err(RenderError::PixelSizeMismatch {
                expected,
                actual: image.as_raw().len(),
            });
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.composite,
                mip_level: 0,
                origin: region.origin(),
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(region.width * 4),
                rows_per_image: Some(region.height),
            },
            region.extent(),
        );
        Ok(())
    }

    /// Records a copy of `source` (same size as `region`) into `region`.
    pub fn copy_from_texture(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::Texture,
        region: Viewport,
    ) -> RenderResult<()> {
        self.check_region(region)?;
        encoder.copy_texture_to_texture(
            wgpu::TexelCopyTextureInfo {
                texture: source,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyTextureInfo {
                texture: &self.composite,
                mip_level: 0,
                origin: region.origin(),
                aspect: wgpu::TextureAspect::All,
            },
            region.extent(),
        );
        Ok(())
    }

    /// Blits the composite to the next swapchain image and presents it.
    ///
    /// Lost or outdated surfaces are reconfigured and the frame is skipped.
    pub fn present(&self) -> RenderResult<()> {
        let swap_chain = self
            .swap_chain
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let output = match swap_chain.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                swap_chain.surface.configure(&self.device, &swap_chain.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout");
                return Ok(());
            }
            Err(wgpu::SurfaceError::Other) => {
                log::warn!("Surface error: other");
                return Ok(());
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("present encoder"),
            });
        self.blit.render(&mut encoder, &view);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
