//! Video decoding through an `ffmpeg` child process.

use std::path::{Path, PathBuf};

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, OutputVideoFrame};
use ffmpeg_sidecar::iter::FfmpegIterator;
use meshview_core::{MeshviewError, Result};
use meshview_render::{PixelLayout, VideoFrame};

use super::FrameSource;

/// Decodes any container ffmpeg understands into packed RGB frames.
///
/// Requires an `ffmpeg` binary on `PATH`.
pub struct FfmpegSource {
    path: PathBuf,
    child: FfmpegChild,
    events: FfmpegIterator,
    /// First frame, decoded while opening to prove the file is readable.
    pending: Option<VideoFrame>,
    /// Last error ffmpeg reported since the process was (re)started.
    error: Option<String>,
}

impl FfmpegSource {
    /// Starts decoding `path` and waits for its first frame.
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| MeshviewError::VideoUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let (child, events) = spawn(path).map_err(|e| unavailable(e.to_string()))?;
        let mut source = Self {
            path: path.to_path_buf(),
            child,
            events,
            pending: None,
            error: None,
        };

        match source.decode_next() {
            Ok(Some(frame)) => {
                log::debug!(
                    "{}: first frame {}x{}",
                    path.display(),
                    frame.width,
                    frame.height
                );
                source.pending = Some(frame);
                Ok(source)
            }
            Ok(None) => Err(unavailable("ffmpeg produced no frames".to_string())),
            Err(e) => Err(unavailable(e.to_string())),
        }
    }

    fn decode_next(&mut self) -> Result<Option<VideoFrame>> {
        next_output_frame(&mut self.events, &mut self.error)
    }

    fn stop(&mut self) {
        if let Err(e) = self.child.kill() {
            log::debug!("ffmpeg already exited: {e}");
        }
        if let Err(e) = self.child.wait() {
            log::warn!("failed to reap ffmpeg for {}: {e}", self.path.display());
        }
    }
}

impl FrameSource for FfmpegSource {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>> {
        if let Some(frame) = self.pending.take() {
            return Ok(Some(frame));
        }
        self.decode_next()
    }

    fn rewind(&mut self) -> Result<()> {
        self.stop();
        let (child, events) = spawn(&self.path)?;
        self.child = child;
        self.events = events;
        self.pending = None;
        self.error = None;
        Ok(())
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn(path: &Path) -> Result<(FfmpegChild, FfmpegIterator)> {
    let mut command = FfmpegCommand::new();
    command.input(path.to_string_lossy().into_owned()).rawvideo();

    let mut child = command
        .spawn()
        .map_err(|e| MeshviewError::io(path, e))?;
    let events = child
        .iter()
        .map_err(|e| MeshviewError::FrameDecode(format!("cannot read ffmpeg output: {e}")))?;
    Ok((child, events))
}

/// Pulls events until the next frame or the end of the stream.
///
/// Errors are remembered in `error` across calls. A stream that ends after any error
/// failed, even if it produced frames before or after it.
fn next_output_frame(
    events: &mut impl Iterator<Item = FfmpegEvent>,
    error: &mut Option<String>,
) -> Result<Option<VideoFrame>> {
    for event in events {
        match event {
            FfmpegEvent::OutputFrame(frame) => return to_video_frame(frame).map(Some),
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message)
            | FfmpegEvent::Error(message) => {
                log::warn!("ffmpeg: {message}");
                *error = Some(message);
            }
            FfmpegEvent::Done => break,
            _ => {}
        }
    }
    match error.take() {
        Some(message) => Err(MeshviewError::FrameDecode(message)),
        None => Ok(None),
    }
}

fn to_video_frame(frame: OutputVideoFrame) -> Result<VideoFrame> {
    if frame.pix_fmt != "rgb24" {
        return Err(MeshviewError::FrameDecode(format!(
            "unexpected ffmpeg pixel format {}",
            frame.pix_fmt
        )));
    }
    VideoFrame::new(frame.width, frame.height, PixelLayout::Rgb8, frame.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_end_of_stream() {
        let mut events = vec![
            FfmpegEvent::Log(LogLevel::Info, "Stream #0:0: Video: h264".to_string()),
            FfmpegEvent::Done,
        ]
        .into_iter();
        let mut error = None;
        assert!(next_output_frame(&mut events, &mut error).unwrap().is_none());
    }

    #[test]
    fn test_error_before_done_fails_the_stream() {
        let mut events = vec![
            FfmpegEvent::Log(LogLevel::Error, "corrupt macroblock".to_string()),
            FfmpegEvent::Log(LogLevel::Warning, "concealing errors".to_string()),
            FfmpegEvent::Done,
        ]
        .into_iter();
        let mut error = None;
        let err = next_output_frame(&mut events, &mut error).unwrap_err();
        assert!(matches!(err, MeshviewError::FrameDecode(ref msg) if msg == "corrupt macroblock"));
    }

    #[test]
    fn test_error_seen_in_an_earlier_call_is_reported_at_the_end() {
        // The error arrived while an earlier frame was being pulled.
        let mut error = Some("Invalid data found when processing input".to_string());
        let mut events = vec![FfmpegEvent::Done].into_iter();
        let err = next_output_frame(&mut events, &mut error).unwrap_err();
        assert!(matches!(err, MeshviewError::FrameDecode(_)));
        assert!(error.is_none());
    }

    #[test]
    fn test_fatal_without_done_fails_the_stream() {
        let mut events = vec![FfmpegEvent::Error("broken pipe".to_string())].into_iter();
        let mut error = None;
        assert!(next_output_frame(&mut events, &mut error).is_err());
    }
}
