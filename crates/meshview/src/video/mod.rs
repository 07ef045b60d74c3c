//! Looping video playback for the right viewport.

mod ffmpeg;
mod gif;

use std::path::Path;

use meshview_core::{MeshviewError, Result};
use meshview_render::VideoFrame;

pub use ffmpeg::FfmpegSource;
pub use gif::GifSource;

/// A decoder yielding frames in presentation order.
pub trait FrameSource {
    /// Decodes the next frame. `Ok(None)` means end of stream.
    fn next_frame(&mut self) -> Result<Option<VideoFrame>>;

    /// Seeks back to the first frame.
    fn rewind(&mut self) -> Result<()>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>> {
        (**self).next_frame()
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

/// Endless playback over a [`FrameSource`]: end of stream rewinds to the start.
pub struct Playback<S> {
    source: S,
    frames_played: u64,
    loops: u64,
}

impl<S: FrameSource> Playback<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            frames_played: 0,
            loops: 0,
        }
    }

    /// Returns the next frame, restarting the stream once if it has ended.
    ///
    /// A stream that is still empty right after a rewind is an error.
    pub fn next_frame(&mut self) -> Result<VideoFrame> {
        if let Some(frame) = self.source.next_frame()? {
            self.frames_played += 1;
            return Ok(frame);
        }

        self.source.rewind()?;
        self.loops += 1;
        log::info!(
            "video reached end after {} frames, restarting (loop {})",
            self.frames_played,
            self.loops
        );
        self.frames_played = 0;

        match self.source.next_frame()? {
            Some(frame) => {
                self.frames_played = 1;
                Ok(frame)
            }
            None => Err(MeshviewError::FrameDecode("empty stream".to_string())),
        }
    }

    /// Number of times the stream has been restarted.
    pub fn loops(&self) -> u64 {
        self.loops
    }
}

/// Opens `path` with the decoder matching its extension.
///
/// `.gif` files are decoded in-process; everything else goes through ffmpeg.
pub fn open_frame_source(path: &Path) -> Result<Box<dyn FrameSource>> {
    if !path.is_file() {
        return Err(MeshviewError::VideoUnavailable {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }

    let is_gif = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));

    let source: Box<dyn FrameSource> = if is_gif {
        Box::new(GifSource::open(path)?)
    } else {
        Box::new(FfmpegSource::open(path)?)
    };
    log::info!("opened video {}", path.display());
    Ok(source)
}
