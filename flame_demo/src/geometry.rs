//! Procedural meshes for the demo scene

use scene_engine::foundation::math::{Vec2, Vec3, Vec4};
use scene_engine::scene::{Material, MaterialProperties, MeshPart, SceneResult, StaticMesh, Vertex};

/// Axis-aligned cube centered on the origin, one material per face pair
pub fn cube(id: &str, half_extent: f32) -> SceneResult<StaticMesh> {
    let faces = [
        (Vec3::x(), Vec3::y()),
        (-Vec3::x(), Vec3::y()),
        (Vec3::y(), Vec3::z()),
        (-Vec3::y(), Vec3::z()),
        (Vec3::z(), Vec3::y()),
        (-Vec3::z(), Vec3::y()),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, up) in faces {
        let right = up.cross(&normal);
        let center = normal * half_extent;
        let base = vertices.len() as u32;

        for (u, v) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = center + (right * u + up * v) * half_extent;
            let uv = Vec2::new((u + 1.0) / 2.0, (v + 1.0) / 2.0);
            vertices.push(Vertex::new(position, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    let materials = vec![
        tinted("cube_sides", Vec4::new(0.8, 0.3, 0.2, 1.0)),
        tinted("cube_caps", Vec4::new(0.9, 0.9, 0.9, 1.0)),
    ];
    let parts = vec![
        MeshPart {
            index_base: 0,
            index_count: 12,
            material: 0,
        },
        MeshPart {
            index_base: 12,
            index_count: 12,
            material: 1,
        },
        MeshPart {
            index_base: 24,
            index_count: 12,
            material: 0,
        },
    ];

    StaticMesh::with_id(id, vertices, indices, materials, parts)
}

/// Square floor in the XZ plane facing +Y
pub fn floor(id: &str, half_extent: f32) -> SceneResult<StaticMesh> {
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let vertices = corners
        .iter()
        .map(|&(x, z)| {
            Vertex::new(
                Vec3::new(x * half_extent, 0.0, z * half_extent),
                Vec3::y(),
                Vec2::new((x + 1.0) / 2.0, (z + 1.0) / 2.0),
            )
        })
        .collect();

    StaticMesh::with_id(
        id,
        vertices,
        vec![0, 2, 1, 2, 0, 3],
        vec![tinted("floor", Vec4::new(0.4, 0.4, 0.45, 1.0))],
        vec![MeshPart {
            index_base: 0,
            index_count: 6,
            material: 0,
        }],
    )
}

fn tinted(name: &str, diffuse: Vec4) -> Material {
    Material {
        name: name.to_string(),
        properties: MaterialProperties {
            diffuse,
            ..MaterialProperties::default()
        },
    }
}
