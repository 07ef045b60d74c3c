//! Rendering error types.

use meshview_core::MeshviewError;
use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// The surface reports no usable texture format.
    #[error("surface has no supported texture format")]
    UnsupportedSurfaceFormat,

    /// A write or copy targeted pixels outside the composite texture.
    #[error("region {x},{y} {width}x{height} lies outside the {surface_width}x{surface_height} surface")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        surface_width: u32,
        surface_height: u32,
    },

    /// Pixel data does not match the size of the region it is written to.
    #[error("expected {expected} bytes of pixel data, got {actual}")]
    PixelSizeMismatch { expected: usize, actual: usize },

    /// Reading a texture back from the GPU failed.
    #[error("buffer mapping failed")]
    BufferMapFailed,

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for MeshviewError {
    fn from(err: RenderError) -> Self {
        MeshviewError::Render(err.to_string())
    }
}
