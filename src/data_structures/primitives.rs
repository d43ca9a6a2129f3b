//! Hard-coded geometry: the ground plane, the grass billboard, the light box
//! cube and the skybox cube.

use crate::data_structures::model::{Material, Mesh, Model, ModelVertex};

/// Half the side length of the ground plane.
pub const FLOOR_HALF_EXTENT: f32 = 200.0;
/// How often the ground texture repeats along each side.
pub const FLOOR_UV_REPEAT: f32 = 200.0;

pub type Geometry = (Vec<ModelVertex>, Vec<u32>);

fn v(position: [f32; 3], tex_coords: [f32; 2], normal: [f32; 3]) -> ModelVertex {
    ModelVertex {
        position,
        tex_coords,
        normal,
    }
}

pub fn floor() -> Geometry {
    let e = FLOOR_HALF_EXTENT;
    let r = FLOOR_UV_REPEAT;
    let up = [0.0, 1.0, 0.0];
    let vertices = vec![
        v([e, 0.0, e], [r, 0.0], up),
        v([-e, 0.0, e], [0.0, 0.0], up),
        v([-e, 0.0, -e], [0.0, r], up),
        v([e, 0.0, -e], [r, r], up),
    ];
    (vertices, vec![0, 2, 1, 0, 3, 2])
}

/// Unit quad standing on its lower edge in the XY plane, origin at the left
/// edge's centre.
pub fn grass_quad() -> Geometry {
    let n = [0.0, 0.0, 1.0];
    let vertices = vec![
        v([0.0, 0.5, 0.0], [0.0, 0.0], n),
        v([0.0, -0.5, 0.0], [0.0, 1.0], n),
        v([1.0, -0.5, 0.0], [1.0, 1.0], n),
        v([1.0, 0.5, 0.0], [1.0, 0.0], n),
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

/// Cube spanning [-1, 1] on every axis with outward normals and
/// counter-clockwise faces.
pub fn cube() -> Geometry {
    // (normal, tangent u, tangent v) for each face; u x v == normal
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, w) in FACES {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = [
                n[0] + su * u[0] + sv * w[0],
                n[1] + su * u[1] + sv * w[1],
                n[2] + su * u[2] + sv * w[2],
            ];
            let tex_coords = [(su + 1.0) / 2.0, (1.0 - sv) / 2.0];
            vertices.push(v(position, tex_coords, n));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

/// Builds a one-mesh model. Without a material the model is meant for the
/// untextured draw path.
pub fn model_from(
    device: &wgpu::Device,
    name: &str,
    (vertices, indices): Geometry,
    material: Option<Material>,
) -> Model {
    Model {
        meshes: vec![Mesh::new(device, name, &vertices, &indices, 0)],
        materials: material.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn face_normal(vertices: &[ModelVertex], tri: &[u32]) -> Vector3<f32> {
        let p = |i: u32| Vector3::from(vertices[i as usize].position);
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]))
    }

    #[test]
    fn cube_faces_wind_outwards() {
        let (vertices, indices) = cube();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for tri in indices.chunks(3) {
            let geometric = face_normal(&vertices, tri).normalize();
            let stored = Vector3::from(vertices[tri[0] as usize].normal);
            assert!(geometric.dot(stored) > 0.99, "{geometric:?} vs {stored:?}");
        }
        assert!(vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 1.0)));
    }

    #[test]
    fn floor_faces_up_and_repeats_texture() {
        let (vertices, indices) = floor();
        for tri in indices.chunks(3) {
            assert!(face_normal(&vertices, tri).y > 0.0);
        }
        let max_uv = vertices
            .iter()
            .flat_map(|v| v.tex_coords)
            .fold(0.0f32, f32::max);
        assert_eq!(max_uv, FLOOR_UV_REPEAT);
    }

    #[test]
    fn grass_quad_faces_the_viewer() {
        let (vertices, indices) = grass_quad();
        for tri in indices.chunks(3) {
            assert!(face_normal(&vertices, tri).z > 0.0);
        }
    }
}
