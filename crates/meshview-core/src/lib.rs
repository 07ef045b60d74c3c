//! Core of meshview.
//!
//! This crate holds everything that does not touch the GPU:
//! - [`record`]: the line grammar shared by OBJ and MTL files
//! - [`Mesh`] and [`MaterialLibrary`] loading, plus [`geometry`] normalization
//! - [`CameraController`], the orbit camera driven by [`InputEvent`]s
//! - [`ObjectSet`] and [`AssetCatalog`] for cycling through a directory of meshes
//! - [`ViewerOptions`], the serde-backed configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Camera and pixel math converts between integer sizes and floats freely
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod camera;
pub mod catalog;
pub mod error;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod object_set;
pub mod options;
pub mod record;

pub use camera::{
    CameraController, CameraState, InputEvent, PointerButton, ScrollDirection, ViewerCommand,
};
pub use catalog::AssetCatalog;
pub use error::{MeshviewError, Result};
pub use geometry::DEFAULT_NORMAL;
pub use material::{Material, MaterialLibrary, MaterialProperty, TextureHandle, TextureUploader};
pub use mesh::{Mesh, MeshLoadOptions};
pub use object_set::ObjectSet;
pub use options::{CameraOptions, LightingOptions, ViewerOptions};
pub use record::{Dialect, Record};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3, Vec4};
