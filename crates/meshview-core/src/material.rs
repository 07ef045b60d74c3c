//! Materials loaded from Wavefront MTL files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::error::{MeshviewError, Result};
use crate::record::{records, Dialect, Record};

/// Property key of the diffuse texture map.
pub const DIFFUSE_MAP: &str = "map_Kd";

/// Property key of the diffuse color.
pub const DIFFUSE_COLOR: &str = "Kd";

/// Opaque reference to a texture that has already been uploaded to the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureHandle {
    /// Backend-assigned identifier.
    pub id: u32,
    /// Image file the texture was created from.
    pub source: PathBuf,
    /// Texture dimensions in pixels.
    pub width: u32,
    /// Texture dimensions in pixels.
    pub height: u32,
}

/// Creates GPU textures for material maps while a material file is parsed.
pub trait TextureUploader {
    /// Loads the image at `path` and uploads it.
    ///
    /// Failures are reported as [`MeshviewError::TextureLoad`]; the parser logs them and
    /// carries on without the property.
    fn upload(&mut self, path: &Path) -> Result<TextureHandle>;
}

/// Value of one material property.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialProperty {
    /// Numeric vector such as `Kd 0.8 0.8 0.8` or `Ns 10`.
    Vector(Vec<f32>),
    /// Uploaded texture map.
    Texture(TextureHandle),
}

/// A named material: property name to value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    properties: BTreeMap<String, MaterialProperty>,
}

impl Material {
    /// Looks up a property.
    pub fn get(&self, key: &str) -> Option<&MaterialProperty> {
        self.properties.get(key)
    }

    /// Looks up a numeric property.
    pub fn vector(&self, key: &str) -> Option<&[f32]> {
        match self.properties.get(key)? {
            MaterialProperty::Vector(values) => Some(values),
            MaterialProperty::Texture(_) => None,
        }
    }

    /// Looks up a texture property.
    pub fn texture(&self, key: &str) -> Option<&TextureHandle> {
        match self.properties.get(key)? {
            MaterialProperty::Texture(handle) => Some(handle),
            MaterialProperty::Vector(_) => None,
        }
    }

    /// Diffuse color (`Kd`) when it has at least three components.
    pub fn diffuse_color(&self) -> Option<Vec3> {
        match self.vector(DIFFUSE_COLOR)? {
            [r, g, b, ..] => Some(Vec3::new(*r, *g, *b)),
            _ => None,
        }
    }

    /// Diffuse texture (`map_Kd`) when it was loaded successfully.
    pub fn diffuse_texture(&self) -> Option<&TextureHandle> {
        self.texture(DIFFUSE_MAP)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the material has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// All materials of one MTL file, keyed by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialLibrary {
    materials: BTreeMap<String, Material>,
}

impl MaterialLibrary {
    /// Reads and parses the MTL file at `path`.
    pub fn load(path: impl AsRef<Path>, uploader: &mut dyn TextureUploader) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MeshviewError::io(path, e))?;
        let library = Self::parse(path, &text, uploader)?;
        log::info!(
            "loaded {} material(s) from {}",
            library.len(),
            path.display()
        );
        Ok(library)
    }

    /// Parses MTL text.
    ///
    /// The first record must be `newmtl`; a property before it fails the whole file.
    /// Texture maps are uploaded immediately, relative to the directory of `path`.
    pub fn parse(path: &Path, text: &str, uploader: &mut dyn TextureUploader) -> Result<Self> {
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mut materials: BTreeMap<String, Material> = BTreeMap::new();
        let mut current: Option<String> = None;

        for item in records(path, text, Dialect::Mtl) {
            let (line, record) = item?;

            if let Record::NewMaterial(name) = record {
                if materials.insert(name.to_string(), Material::default()).is_some() {
                    log::debug!("{}:{line}: material '{name}' redefined", path.display());
                }
                current = Some(name.to_string());
                continue;
            }

            let Some(material) = current.as_ref().and_then(|name| materials.get_mut(name)) else {
                return Err(MeshviewError::MalformedAsset {
                    path: path.to_path_buf(),
                    line,
                    reason: "material file doesn't start with a 'newmtl' statement".to_string(),
                });
            };

            match record {
                Record::DiffuseMap(file) => match uploader.upload(&base_dir.join(file)) {
                    Ok(handle) => {
                        material
                            .properties
                            .insert(DIFFUSE_MAP.to_string(), MaterialProperty::Texture(handle));
                    }
                    Err(e) => log::warn!("{}:{line}: {e}", path.display()),
                },
                Record::Other {
                    keyword,
                    payload: Some(values),
                } => {
                    material
                        .properties
                        .insert(keyword.to_string(), MaterialProperty::Vector(values));
                }
                Record::Other { payload: None, .. }
                | Record::Vertex(_)
                | Record::Normal(_)
                | Record::Face(_)
                | Record::MaterialLibrary(_)
                | Record::UseMaterial(_)
                | Record::NewMaterial(_) => {}
            }
        }

        Ok(Self { materials })
    }

    /// Looks up a material by name.
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library holds no materials.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Material names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}
