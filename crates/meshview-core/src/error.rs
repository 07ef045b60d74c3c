//! Error types for meshview.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for meshview operations.
#[derive(Error, Debug)]
pub enum MeshviewError {
    /// The asset directory does not exist or is not a directory.
    #[error("{} is not a valid directory", .0.display())]
    DirectoryNotFound(PathBuf),

    /// No mesh files were found in the asset directory.
    #[error("no .{extension} files found in {}", dir.display())]
    NoAssets { dir: PathBuf, extension: String },

    /// The video file is missing or could not be opened.
    #[error("unable to open video file {}: {reason}", path.display())]
    VideoUnavailable { path: PathBuf, reason: String },

    /// An asset file violates the line grammar.
    #[error("{}:{line}: {reason}", path.display())]
    MalformedAsset {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Mesh data violates an invariant (index out of range, normal count mismatch).
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// A texture referenced by a material could not be loaded or uploaded.
    #[error("error loading texture {}: {reason}", path.display())]
    TextureLoad { path: PathBuf, reason: String },

    /// The video frame source failed while decoding.
    #[error("frame decode failed: {0}")]
    FrameDecode(String),

    /// Options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Rendering backend error.
    #[error("render error: {0}")]
    Render(String),

    /// The background viewer task could not start or did not finish cleanly.
    #[error("viewer task failed: {0}")]
    Task(String),

    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MeshviewError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error belongs to the startup family (bad directory, no assets, no video).
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound(_) | Self::NoAssets { .. } | Self::VideoUnavailable { .. }
        )
    }
}

/// A specialized Result type for meshview operations.
pub type Result<T> = std::result::Result<T, MeshviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_asset_message_has_location() {
        let err = MeshviewError::MalformedAsset {
            path: PathBuf::from("model.mtl"),
            line: 3,
            reason: "property before newmtl".to_string(),
        };
        assert_eq!(err.to_string(), "model.mtl:3: property before newmtl");
    }

    #[test]
    fn test_fatal_startup_family() {
        assert!(MeshviewError::DirectoryNotFound(PathBuf::from("x")).is_fatal_startup());
        assert!(MeshviewError::NoAssets {
            dir: PathBuf::from("x"),
            extension: "obj".into()
        }
        .is_fatal_startup());
        assert!(!MeshviewError::FrameDecode("eof".into()).is_fatal_startup());
    }
}
