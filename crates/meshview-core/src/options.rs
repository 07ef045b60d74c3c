//! Configuration options for meshview.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{MeshviewError, Result};

/// Top-level viewer configuration.
///
/// Every field has a default, so a JSON config only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Window width in physical pixels (both viewports together).
    pub window_width: u32,

    /// Window height in physical pixels.
    pub window_height: u32,

    /// Width of the left (mesh) viewport. The video gets the rest.
    pub viewer_width: u32,

    /// Viewer loop ticks per second.
    pub tick_rate: u32,

    /// Video playback rate in frames per second.
    pub video_fps: u32,

    /// Uniform scale applied to every parsed vertex.
    pub vertex_scale: f32,

    /// Swap Y and Z on every parsed vertex.
    pub swap_yz: bool,

    /// Extension (without the dot) of mesh files picked up from the asset directory.
    pub mesh_extension: String,

    /// Video file looked up inside the asset directory when no path is given.
    pub video_file_name: String,

    /// Clear color of the mesh viewport.
    pub background_color: Vec3,

    /// Base color of meshes without a material color.
    pub default_color: Vec3,

    /// Camera settings.
    pub camera: CameraOptions,

    /// Lighting settings.
    pub lighting: LightingOptions,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            window_width: 1200,
            window_height: 600,
            viewer_width: 800,
            tick_rate: 30,
            video_fps: 30,
            vertex_scale: 10.0,
            swap_yz: false,
            mesh_extension: "obj".to_string(),
            video_file_name: "trackedvideo.mp4".to_string(),
            background_color: Vec3::ZERO,
            default_color: Vec3::ONE,
            camera: CameraOptions::default(),
            lighting: LightingOptions::default(),
        }
    }
}

impl ViewerOptions {
    /// Loads options from a JSON file and validates them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MeshviewError::io(path, e))?;
        let options: Self = serde_json::from_str(&text)?;
        options.validate()?;
        log::debug!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Checks that the options describe a usable window and camera.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(MeshviewError::InvalidOptions(msg.to_string()));

        if self.window_height == 0 || self.viewer_width == 0 {
            return fail("window and viewer dimensions must be non-zero");
        }
        if self.viewer_width >= self.window_width {
            return fail("viewer_width must be smaller than window_width");
        }
        if self.tick_rate == 0 || self.video_fps == 0 {
            return fail("tick_rate and video_fps must be non-zero");
        }
        if !self.vertex_scale.is_finite() || self.vertex_scale == 0.0 {
            return fail("vertex_scale must be finite and non-zero");
        }
        if self.mesh_extension.is_empty() {
            return fail("mesh_extension must not be empty");
        }
        self.camera.validate()
    }

    /// Width of the right (video) viewport.
    pub fn video_width(&self) -> u32 {
        self.window_width.saturating_sub(self.viewer_width)
    }

    /// Aspect ratio of the mesh viewport.
    #[allow(clippy::cast_precision_loss)]
    pub fn viewer_aspect(&self) -> f32 {
        self.viewer_width as f32 / self.window_height.max(1) as f32
    }
}

/// Orbit camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    /// Distance from the target at startup.
    pub initial_zoom: f32,
    /// Distance change per wheel notch.
    pub zoom_step: f32,
    /// Closest allowed distance.
    pub min_zoom: f32,
    /// Pointer pixels per world unit of pan.
    pub pan_divisor: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            initial_zoom: 15.0,
            zoom_step: 1.0,
            min_zoom: 1.0,
            pan_divisor: 20.0,
            fov_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl CameraOptions {
    fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(MeshviewError::InvalidOptions(msg.to_string()));

        if self.min_zoom <= 0.0 || self.initial_zoom < self.min_zoom {
            return fail("camera zoom must satisfy 0 < min_zoom <= initial_zoom");
        }
        if self.zoom_step <= 0.0 {
            return fail("camera zoom_step must be positive");
        }
        if self.pan_divisor == 0.0 {
            return fail("camera pan_divisor must be non-zero");
        }
        if self.near <= 0.0 || self.far <= self.near {
            return fail("camera clip planes must satisfy 0 < near < far");
        }
        if !(1.0..179.0).contains(&self.fov_degrees) {
            return fail("camera fov_degrees must be within [1, 179)");
        }
        Ok(())
    }
}

/// Single directional light, fixed in eye space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingOptions {
    /// Direction the light comes from (not normalized).
    pub direction: Vec3,
    /// Ambient intensity.
    pub ambient: Vec3,
    /// Diffuse intensity.
    pub diffuse: Vec3,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-40.0, 200.0, 100.0),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
        }
    }
}
