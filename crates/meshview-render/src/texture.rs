//! Material texture upload.

use std::path::Path;
use std::sync::Arc;

use meshview_core::{MeshviewError, Result, TextureHandle, TextureUploader};

/// Loads image files and uploads them as sRGB textures.
///
/// The uploader owns every texture it creates; they are released when it is dropped.
pub struct GpuTextureUploader {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    textures: Vec<wgpu::Texture>,
}

impl GpuTextureUploader {
    /// Creates an uploader bound to a device and queue.
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            textures: Vec::new(),
        }
    }

    /// Number of textures uploaded so far.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl TextureUploader for GpuTextureUploader {
    fn upload(&mut self, path: &Path) -> Result<TextureHandle> {
        let texture_error = |reason: String| MeshviewError::TextureLoad {
            path: path.to_path_buf(),
            reason,
        };

        let image = image::open(path)
            .map_err(|e| texture_error(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(texture_error("image has zero dimensions".to_string()));
        }
        let id = u32::try_from(self.textures.len())
            .map_err(|_| texture_error("too many textures".to_string()))?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let label = path.display().to_string();
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        log::info!("uploaded texture {} ({width}x{height})", path.display());
        self.textures.push(texture);

        Ok(TextureHandle {
            id,
            source: path.to_path_buf(),
            width,
            height,
        })
    }
}
