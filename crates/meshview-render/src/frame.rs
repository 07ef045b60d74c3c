//! Decoded video frames and their conversion for the composite surface.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use meshview_core::{MeshviewError, Result};

/// Channel order of a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb8,
    /// Blue-green-red, as produced by most video decoders.
    Bgr8,
    Rgba8,
}

impl PixelLayout {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// One decoded frame, rows top to bottom, tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// Wraps raw pixel data, checking its length against the dimensions.
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(MeshviewError::FrameDecode(format!(
                "{width}x{height} {layout:?} frame needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Converts to RGBA with an opaque alpha channel.
    pub fn to_rgba(&self) -> Result<RgbaImage> {
        let data = match self.layout {
            PixelLayout::Rgba8 => self.data.clone(),
            PixelLayout::Rgb8 => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], u8::MAX])
                .collect(),
            PixelLayout::Bgr8 => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0], u8::MAX])
                .collect(),
        };
        RgbaImage::from_raw(self.width, self.height, data).ok_or_else(|| {
            MeshviewError::FrameDecode(format!(
                "frame data does not fill {}x{}",
                self.width, self.height
            ))
        })
    }
}

/// Converts `frame` to RGBA and resizes it to exactly `width` x `height`.
pub fn prepare_frame(frame: &VideoFrame, width: u32, height: u32) -> Result<RgbaImage> {
    let rgba = frame.to_rgba()?;
    if rgba.dimensions() == (width, height) {
        return Ok(rgba);
    }
    Ok(imageops::resize(&rgba, width, height, FilterType::Triangle))
}
