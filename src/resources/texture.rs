use std::{
    io::{BufReader, Cursor},
    path::{Path, PathBuf},
};

use crate::{
    config::RESOURCE_DIR,
    data_structures::{model, texture},
};

/// Colour used for a missing diffuse map.
pub const FALLBACK_DIFFUSE: [u8; 4] = [255, 255, 255, 255];
/// Colour used for a missing specular map (no highlights).
pub const FALLBACK_SPECULAR: [u8; 4] = [0, 0, 0, 255];

/// Skybox faces in cube layer order (+X, -X, +Y, -Y, +Z, -Z).
pub const SKYBOX_FACES: [&str; 6] = [
    "right.png",
    "left.png",
    "top.png",
    "bottom.png",
    "front.png",
    "back.png",
];

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Group 0 of every textured pipeline: diffuse map + sampler, specular map + sampler.
pub fn diffuse_specular_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            texture_entry(0),
            sampler_entry(1),
            texture_entry(2),
            sampler_entry(3),
        ],
        label: Some("Model texture_bind_group_layout"),
    })
}

pub fn cube_map_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::Cube,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            sampler_entry(1),
        ],
        label: Some("Skybox bind_group_layout"),
    })
}

/// Asset paths are relative to the resource directory in the working directory.
pub fn resource_path(file_name: &str) -> PathBuf {
    Path::new("./").join(RESOURCE_DIR).join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    let path = resource_path(file_name);
    let txt = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = resource_path(file_name);
    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
    Ok(data)
}

pub async fn load_texture(
    file_name: &str,
    srgb: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(file_name).await?;
    let extension = Path::new(file_name).extension().and_then(|e| e.to_str());
    texture::Texture::from_bytes(device, queue, &data, file_name, extension, srgb)
}

/// Like [`load_texture`], but a missing or broken file yields a 1x1 texture
/// of `fallback` and a warning.
pub async fn load_texture_or(
    file_name: &str,
    srgb: bool,
    fallback: [u8; 4],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> texture::Texture {
    match load_texture(file_name, srgb, device, queue).await {
        Ok(texture) => texture,
        Err(e) => {
            log::warn!("Texture failed to load, using a plain one instead: {e}");
            texture::Texture::solid_color(device, queue, fallback, srgb, file_name)
        }
    }
}

/// A material made of two loose texture files.
pub async fn load_material(
    name: &str,
    diffuse: &str,
    specular: Option<&str>,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> model::Material {
    let diffuse_texture = load_texture_or(diffuse, true, FALLBACK_DIFFUSE, device, queue).await;
    let specular_texture = match specular {
        Some(file) => load_texture_or(file, false, FALLBACK_SPECULAR, device, queue).await,
        None => texture::Texture::solid_color(device, queue, FALLBACK_SPECULAR, false, name),
    };
    model::Material::new(device, name, diffuse_texture, specular_texture, layout)
}

/// White diffuse, no specular. Stands in for materials that could not be loaded.
pub fn fallback_material(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> model::Material {
    let diffuse = texture::Texture::solid_color(device, queue, FALLBACK_DIFFUSE, true, "fallback diffuse");
    let specular = texture::Texture::solid_color(device, queue, FALLBACK_SPECULAR, false, "fallback specular");
    model::Material::new(device, "fallback", diffuse, specular, layout)
}

/// Load six faces from `dir` into one cube texture. A missing face turns the
/// whole sky into a flat dark colour.
pub async fn load_cube_map(
    dir: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> texture::Texture {
    let mut faces = Vec::with_capacity(SKYBOX_FACES.len());
    for face in SKYBOX_FACES {
        let file_name = format!("{dir}/{face}");
        let image = match load_binary(&file_name).await {
            Ok(bytes) => image::load_from_memory(&bytes).map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        match image {
            Ok(image) => faces.push(image),
            Err(e) => {
                log::warn!("Skybox face {file_name} failed to load: {e}");
                break;
            }
        }
    }

    let loaded = <[image::DynamicImage; 6]>::try_from(faces)
        .map_err(|faces| anyhow::anyhow!("only {} of 6 faces present", faces.len()))
        .and_then(|faces| texture::Texture::cube_from_images(device, queue, &faces, dir));
    match loaded {
        Ok(texture) => texture,
        Err(e) => {
            log::warn!("Using a plain sky: {e}");
            texture::Texture::solid_cube(device, queue, [8, 10, 24, 255], "plain sky")
        }
    }
}

/// Parse an obj file and its mtl libraries and load every referenced texture.
///
/// Texture paths inside the mtl are relative to the obj file. Materials whose
/// maps are missing get plain stand-ins.
pub async fn load_textures(
    file_name: &str,
    queue: &wgpu::Queue,
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<(Vec<model::Material>, Vec<tobj::Model>)> {
    let obj_text: String = load_string(file_name).await?;
    let obj_cursor = Cursor::new(obj_text);
    let mut obj_reader = BufReader::new(obj_cursor);
    let dir = Path::new(file_name)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| {
            let mtl_name = dir.join(p).to_string_lossy().into_owned();
            async move {
                match load_string(&mtl_name).await {
                    Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                    Err(e) => {
                        log::warn!("Material library missing: {e}");
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        },
    )
    .await?;

    let obj_materials = obj_materials.unwrap_or_else(|e| {
        log::warn!("{file_name}: materials unavailable ({e}), drawing untextured");
        Vec::new()
    });

    let mut materials = Vec::with_capacity(obj_materials.len());
    for m in obj_materials {
        let relative = |tex: &String| dir.join(tex).to_string_lossy().into_owned();
        let diffuse = m.diffuse_texture.as_ref().map(relative);
        let specular = m.specular_texture.as_ref().map(relative);
        let material = match diffuse {
            Some(diffuse) => {
                load_material(&m.name, &diffuse, specular.as_deref(), device, queue, layout).await
            }
            None => {
                log::error!("Material {} in {file_name} references no diffuse texture.", m.name);
                fallback_material(device, queue, layout)
            }
        };
        materials.push(material);
    }
    Ok((materials, models))
}
