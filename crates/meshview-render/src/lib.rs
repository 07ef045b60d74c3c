//! Rendering backend for meshview.
//!
//! This crate provides the wgpu side of the viewer:
//! - [`GpuContext`] for device setup, windowed or headless
//! - [`ViewerContext`], the mesh viewport's pipeline and offscreen target
//! - [`Renderable`], a mesh compiled once into a replayable render bundle
//! - [`SharedSurface`], the composite both producers write into before presenting
//! - [`GpuTextureUploader`] and video [`frame`] conversion

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Pixel sizes move between u32 and usize freely
#![allow(clippy::cast_possible_truncation)]

pub mod buffer;
pub mod context;
pub mod error;
pub mod frame;
pub mod renderable;
pub mod surface;
pub mod texture;
pub mod viewer;

pub use context::GpuContext;
pub use error::{RenderError, RenderResult};
pub use frame::{prepare_frame, PixelLayout, VideoFrame};
pub use renderable::{MeshVertex, ObjectStyle, Renderable};
pub use surface::{SharedSurface, Viewport};
pub use texture::GpuTextureUploader;
pub use viewer::{FrameUniforms, ViewerContext};
