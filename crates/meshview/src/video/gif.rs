//! In-process decoding of animated GIFs.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Frames};
use meshview_core::{MeshviewError, Result};
use meshview_render::{PixelLayout, VideoFrame};

use super::FrameSource;

/// Animated GIF source. Frame delays are ignored; playback is paced by the caller.
pub struct GifSource {
    path: PathBuf,
    frames: Frames<'static>,
}

impl GifSource {
    pub fn open(path: &Path) -> Result<Self> {
        let frames = decode(path).map_err(|reason| MeshviewError::VideoUnavailable {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            frames,
        })
    }
}

impl FrameSource for GifSource {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>> {
        let Some(frame) = self.frames.next() else {
            return Ok(None);
        };
        let buffer = frame
            .map_err(|e| MeshviewError::FrameDecode(e.to_string()))?
            .into_buffer();
        let (width, height) = buffer.dimensions();
        VideoFrame::new(width, height, PixelLayout::Rgba8, buffer.into_raw()).map(Some)
    }

    fn rewind(&mut self) -> Result<()> {
        self.frames = decode(&self.path).map_err(MeshviewError::FrameDecode)?;
        Ok(())
    }
}

fn decode(path: &Path) -> std::result::Result<Frames<'static>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| e.to_string())?;
    Ok(decoder.into_frames())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba, RgbaImage};

    fn write_gif(path: &Path, colors: &[[u8; 4]]) {
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        for color in colors {
            let image = RgbaImage::from_pixel(4, 2, Rgba(*color));
            encoder
                .encode_frame(Frame::from_parts(image, 0, 0, Delay::from_numer_denom_ms(40, 1)))
                .unwrap();
        }
    }

    #[test]
    fn test_gif_frames_and_rewind() {
        let dir = std::env::temp_dir().join(format!("meshview-gif-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("clip.gif");
        write_gif(&path, &[[255, 0, 0, 255], [0, 0, 255, 255]]);

        let mut source = GifSource::open(&path).unwrap();
        let first = source.next_frame().unwrap().unwrap();
        assert_eq!((first.width, first.height), (4, 2));
        assert_eq!(first.layout, PixelLayout::Rgba8);
        // Palette quantization may shift the exact values.
        assert!(first.data[0] > first.data[2]);
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());

        source.rewind().unwrap();
        let again = source.next_frame().unwrap().unwrap();
        assert_eq!(again.data, first.data);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_garbage_gif_is_unavailable() {
        let dir = std::env::temp_dir().join(format!("meshview-badgif-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.gif");
        std::fs::write(&path, b"not a gif").unwrap();

        let err = GifSource::open(&path).err().unwrap();
        assert!(err.is_fatal_startup());

        std::fs::remove_dir_all(&dir).ok();
    }
}
