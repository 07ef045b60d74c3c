//! Turning an asset directory into the viewer's object set.

use glam::Vec3;
use meshview_core::{
    AssetCatalog, Material, MaterialLibrary, Mesh, MeshLoadOptions, ObjectSet, Result,
    TextureUploader, ViewerOptions,
};
use meshview_render::{ObjectStyle, Renderable, ViewerContext};

/// A normalized mesh plus the material its `usemtl` selected, if any.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub name: String,
    pub mesh: Mesh,
    pub material: Option<Material>,
}

impl LoadedMesh {
    /// Draw style: the material's diffuse color, else `default_color`.
    pub fn style(&self, default_color: Vec3) -> ObjectStyle {
        let base_color = self
            .material
            .as_ref()
            .and_then(Material::diffuse_color)
            .unwrap_or(default_color);
        ObjectStyle { base_color }
    }
}

/// Loads every mesh of `catalog`, in catalog order.
///
/// A missing material library only logs a warning; a malformed one fails the load.
pub fn load_object_set(
    catalog: &AssetCatalog,
    options: &ViewerOptions,
    uploader: &mut dyn TextureUploader,
) -> Result<ObjectSet<LoadedMesh>> {
    let load_options = MeshLoadOptions::new(options.swap_yz).with_scale(options.vertex_scale);

    let mut loaded = Vec::with_capacity(catalog.meshes().len());
    for path in catalog.meshes() {
        let mesh = Mesh::load(path, load_options)?;
        let material = load_material(&mesh, uploader)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        loaded.push(LoadedMesh {
            name,
            mesh,
            material,
        });
    }
    ObjectSet::new(loaded)
}

fn load_material(mesh: &Mesh, uploader: &mut dyn TextureUploader) -> Result<Option<Material>> {
    let Some(library_path) = mesh.material_library() else {
        return Ok(None);
    };
    if !library_path.is_file() {
        log::warn!(
            "material library {} not found, using default color",
            library_path.display()
        );
        return Ok(None);
    }

    let library = MaterialLibrary::load(library_path, uploader)?;
    let Some(name) = mesh.material_name() else {
        return Ok(None);
    };
    let material = library.get(name).cloned();
    if material.is_none() {
        log::warn!(
            "material {name} not defined in {}, using default color",
            library_path.display()
        );
    }
    Ok(material)
}

/// Compiles every loaded mesh into a renderable, keeping the active index.
pub fn compile_object_set(
    context: &ViewerContext,
    objects: ObjectSet<LoadedMesh>,
    default_color: Vec3,
) -> ObjectSet<Renderable> {
    objects.map(|loaded| {
        let renderable = Renderable::compile(context, &loaded.mesh, &loaded.style(default_color));
        log::debug!(
            "compiled {}: {} vertices",
            loaded.name,
            renderable.vertex_count()
        );
        renderable
    })
}
