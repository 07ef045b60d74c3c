//! meshview: an interactive OBJ viewer composited next to a looping video.
//!
//! The window is split in two columns. The left one shows the meshes of an asset
//! directory, one at a time, drawn by a background [`viewer`] thread; the right one
//! plays a [`video`] on the event-loop thread. See [`run`].

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Cursor deltas arrive as f64 and are consumed as f32
#![allow(clippy::cast_possible_truncation)]

pub mod app;
pub mod assets;
pub mod video;
pub mod viewer;

pub use app::{run, AppEvent, RunConfig};
pub use assets::{compile_object_set, load_object_set, LoadedMesh};
pub use video::{open_frame_source, FfmpegSource, FrameSource, GifSource, Playback};
pub use viewer::{ViewerHandle, ViewerTask};
