//! Discovery of mesh files in an asset directory.

use std::path::{Path, PathBuf};

use crate::error::{MeshviewError, Result};

/// Mesh files found in one directory, sorted by file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCatalog {
    dir: PathBuf,
    meshes: Vec<PathBuf>,
}

impl AssetCatalog {
    /// Lists the files in `dir` whose extension matches `extension` (case-insensitive).
    ///
    /// Subdirectories are not searched.
    pub fn scan(dir: impl AsRef<Path>, extension: &str) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(MeshviewError::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut meshes = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| MeshviewError::io(dir, e))? {
            let path = entry.map_err(|e| MeshviewError::io(dir, e))?.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
            if matches && path.is_file() {
                meshes.push(path);
            }
        }

        if meshes.is_empty() {
            return Err(MeshviewError::NoAssets {
                dir: dir.to_path_buf(),
                extension: extension.to_string(),
            });
        }
        meshes.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        log::info!(
            "found {} .{extension} file(s) in {}",
            meshes.len(),
            dir.display()
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            meshes,
        })
    }

    /// The scanned directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Mesh file paths in display order.
    pub fn meshes(&self) -> &[PathBuf] {
        &self.meshes
    }

    /// Resolves a file name against the scanned directory.
    pub fn sibling(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "meshview_catalog_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_directory() {
        let err = AssetCatalog::scan("/definitely/not/here", "obj").unwrap_err();
        assert!(matches!(err, MeshviewError::DirectoryNotFound(_)));
        assert!(err.is_fatal_startup());
    }

    #[test]
    fn test_empty_directory_has_no_assets() {
        let dir = temp_dir("empty");
        std::fs::write(dir.join("notes.txt"), "x").unwrap();
        let err = AssetCatalog::scan(&dir, "obj").unwrap_err();
        assert!(matches!(err, MeshviewError::NoAssets { .. }));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_scan_is_sorted_and_flat() {
        let dir = temp_dir("sorted");
        for name in ["b.obj", "a.OBJ", "c.mtl"] {
            std::fs::write(dir.join(name), "").unwrap();
        }
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested").join("d.obj"), "").unwrap();

        let catalog = AssetCatalog::scan(&dir, "obj").unwrap();
        let names: Vec<_> = catalog
            .meshes()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.OBJ", "b.obj"]);
        assert_eq!(catalog.sibling("video.mp4"), dir.join("video.mp4"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
