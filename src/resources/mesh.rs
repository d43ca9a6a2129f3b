use crate::data_structures::model;

/// Flatten tobj meshes into vertices. Missing texture coordinates or normals
/// become zeros; the V coordinate is flipped for wgpu's top-left origin.
pub fn to_vertices(mesh: &tobj::Mesh) -> Vec<model::ModelVertex> {
    (0..mesh.positions.len() / 3)
        .map(|i| model::ModelVertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            tex_coords: [
                mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
            ],
            normal: [
                mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
            ],
        })
        .collect()
}

/// Upload every tobj mesh. `fallback_material` is used for meshes that name
/// no material or one that does not exist.
pub fn load_meshes(
    models: &[tobj::Model],
    file_name: &str,
    material_count: usize,
    fallback_material: usize,
    device: &wgpu::Device,
) -> Vec<model::Mesh> {
    models
        .iter()
        .filter_map(|m| {
            let vertices = to_vertices(&m.mesh);
            if let Some(bad) = m.mesh.indices.iter().find(|&&i| i as usize >= vertices.len()) {
                log::warn!(
                    "Mesh {} in {file_name} indexes vertex {bad} of {}, skipping it",
                    m.name,
                    vertices.len()
                );
                return None;
            }
            let material = m
                .mesh
                .material_id
                .filter(|&id| id < material_count)
                .unwrap_or(fallback_material);
            Some(model::Mesh::new(
                device,
                &format!("{file_name}:{}", m.name),
                &vertices,
                &m.mesh.indices,
                material,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_v_and_fills_missing_attributes() {
        let mesh = tobj::Mesh {
            positions: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            texcoords: vec![0.25, 0.25],
            ..Default::default()
        };
        let vertices = to_vertices(&mesh);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].tex_coords, [0.25, 0.75]);
        assert_eq!(vertices[1].tex_coords, [0.0, 1.0]);
        assert_eq!(vertices[1].position, [3.0, 4.0, 5.0]);
        assert_eq!(vertices[1].normal, [0.0; 3]);
    }
}
