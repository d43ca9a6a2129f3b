use crate::{
    data_structures::model,
    resources::texture::fallback_material,
};

/**
 * This module contains all logic for loading meshes and textures from the
 * resource directory.
 */
pub mod mesh;
pub mod texture;

/// Load an obj model with its mtl materials.
///
/// Meshes without a usable material share a plain white one appended to the
/// material list.
pub async fn load_model_obj(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<model::Model> {
    let (mut materials, models) = texture::load_textures(file_name, queue, device, layout).await?;
    let material_count = materials.len();
    let meshes = mesh::load_meshes(&models, file_name, material_count, material_count, device);

    let needs_fallback = meshes.iter().any(|m| m.material == material_count);
    if needs_fallback {
        materials.push(fallback_material(device, queue, layout));
    }
    log::info!(
        "Loaded {file_name}: {} meshes, {} materials",
        meshes.len(),
        materials.len()
    );

    Ok(model::Model { meshes, materials })
}

/// [`load_model_obj`] that logs failures and returns an empty model instead.
pub async fn load_model_or_empty(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> model::Model {
    match load_model_obj(file_name, device, queue, layout).await {
        Ok(model) => model,
        Err(e) => {
            log::error!("Model {file_name} failed to load and will not be drawn: {e}");
            model::Model::empty()
        }
    }
}
