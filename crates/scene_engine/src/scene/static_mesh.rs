//! Static triangle mesh with per-part materials
//!
//! Meshes are assembled in memory; importing them from files is left to the
//! asset pipeline that feeds the scene.

use std::sync::atomic::AtomicUsize;

use super::node::default_id;
use super::{
    Actor, ChangeTracking, MeshElementIndex, MeshGeometry, NodeState, SceneError, SceneResult,
};
use crate::foundation::math::{Vec2, Vec3, Vec4};

static DEFAULT_MESH_ID: AtomicUsize = AtomicUsize::new(0);

/// Interleaved vertex layout of the static mesh pipeline
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Object-space normal
    pub normal: [f32; 3],
    /// Texture coordinate
    pub uv: [f32; 2],
    /// Vertex color
    pub color: [f32; 3],
}

// Vertex is repr(C) and made only of f32 arrays, so it has no padding
unsafe impl bytemuck::Pod for Vertex {}
unsafe impl bytemuck::Zeroable for Vertex {}

impl Vertex {
    /// Create a vertex with white color
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            uv: uv.into(),
            color: [1.0, 1.0, 1.0],
        }
    }
}

/// Lighting coefficients of a material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// Ambient color
    pub ambient: Vec4,
    /// Diffuse color
    pub diffuse: Vec4,
    /// Specular color
    pub specular: Vec4,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.1, 0.1, 0.1, 1.0),
            diffuse: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vec4::zeros(),
            opacity: 1.0,
        }
    }
}

/// Named material referenced by mesh parts
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Lighting coefficients
    pub properties: MaterialProperties,
}

impl Material {
    /// Create a material with default properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: MaterialProperties::default(),
        }
    }
}

/// Contiguous index range drawn with one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshPart {
    /// First index of the part
    pub index_base: MeshElementIndex,
    /// Number of indices in the part
    pub index_count: MeshElementIndex,
    /// Index into the mesh's material list
    pub material: usize,
}

/// Static mesh node
#[derive(Debug, Clone)]
pub struct StaticMesh {
    actor: Actor,
    parts: Vec<MeshPart>,
    materials: Vec<Material>,
    vertices: Vec<Vertex>,
    indices: Vec<MeshElementIndex>,
}

impl StaticMesh {
    /// Create a mesh with an auto-generated `mesh<N>` identifier
    ///
    /// # Errors
    /// [`SceneError::InvalidMesh`] when an index points past the vertex list,
    /// a part leaves the index range or a part names a missing material.
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<MeshElementIndex>,
        materials: Vec<Material>,
        parts: Vec<MeshPart>,
    ) -> SceneResult<Self> {
        Self::with_id(default_id("mesh", &DEFAULT_MESH_ID), vertices, indices, materials, parts)
    }

    /// Create a mesh with an explicit identifier
    ///
    /// # Errors
    /// See [`StaticMesh::new`].
    pub fn with_id(
        id: impl Into<String>,
        vertices: Vec<Vertex>,
        indices: Vec<MeshElementIndex>,
        materials: Vec<Material>,
        parts: Vec<MeshPart>,
    ) -> SceneResult<Self> {
        let id = id.into();
        let invalid = |reason: String| SceneError::InvalidMesh { id: id.clone(), reason };

        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(invalid(format!("index {bad} exceeds vertex count {}", vertices.len())));
        }

        for (n, part) in parts.iter().enumerate() {
            let end = part.index_base as usize + part.index_count as usize;
            if end > indices.len() {
                return Err(invalid(format!(
                    "part {n} covers indices {}..{end} but only {} exist",
                    part.index_base,
                    indices.len()
                )));
            }
            if part.material >= materials.len() {
                return Err(invalid(format!(
                    "part {n} references material {} of {}",
                    part.material,
                    materials.len()
                )));
            }
        }

        Ok(Self {
            actor: Actor::with_id(id),
            parts,
            materials,
            vertices,
            indices,
        })
    }

    /// Node identifier
    pub fn id(&self) -> &str {
        self.actor.id()
    }

    /// Underlying actor
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Mutable underlying actor
    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    /// Drawable parts
    pub fn parts(&self) -> &[MeshPart] {
        &self.parts
    }

    /// Materials referenced by the parts
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Vertex data
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index data
    pub fn indices(&self) -> &[MeshElementIndex] {
        &self.indices
    }

    fn vertex(&self, index: MeshElementIndex) -> Option<&Vertex> {
        self.vertices.get(index as usize)
    }
}

impl MeshGeometry for StaticMesh {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn index_count(&self) -> usize {
        self.indices.len()
    }

    fn vertex_position(&self, index: MeshElementIndex) -> Option<Vec3> {
        self.vertex(index).map(|v| Vec3::from(v.position))
    }

    fn vertex_uv(&self, index: MeshElementIndex) -> Option<Vec2> {
        self.vertex(index).map(|v| Vec2::from(v.uv))
    }

    fn vertex_normal(&self, index: MeshElementIndex) -> Option<Vec3> {
        self.vertex(index).map(|v| Vec3::from(v.normal))
    }

    fn vertex_color(&self, index: MeshElementIndex) -> Option<Vec3> {
        self.vertex(index).map(|v| Vec3::from(v.color))
    }

    fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl ChangeTracking for StaticMesh {
    fn node_state(&self) -> &NodeState {
        self.actor.node_state()
    }

    fn node_state_mut(&mut self) -> &mut NodeState {
        self.actor.node_state_mut()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Unit quad drawn as one part with `material_count` materials attached
    pub(crate) fn quad(id: &str, material_count: usize) -> StaticMesh {
        let vertices = vec![
            Vertex::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::z(), Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(1.0, -1.0, 0.0), Vec3::z(), Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(1.0, 1.0, 0.0), Vec3::z(), Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::z(), Vec2::new(0.0, 1.0)),
        ];
        let indices = vec![0, 1, 2, 2, 3, 0];
        let materials = (0..material_count).map(|i| Material::new(format!("mat{i}"))).collect();
        let parts = vec![MeshPart {
            index_base: 0,
            index_count: 6,
            material: 0,
        }];
        StaticMesh::with_id(id, vertices, indices, materials, parts).expect("valid quad")
    }

    #[test]
    fn test_geometry_accessors() {
        let mesh = quad("quad", 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.vertex_position(2), Some(Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(mesh.vertex_uv(1), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(mesh.vertex_color(0), Some(Vec3::new(1.0, 1.0, 1.0)));
        assert_eq!(mesh.vertex_normal(9), None);
    }

    #[test]
    fn test_raw_byte_sizes() {
        let mesh = quad("quad", 1);
        assert_eq!(mesh.vertex_bytes().len(), 4 * std::mem::size_of::<Vertex>());
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
        assert_eq!(std::mem::size_of::<Vertex>(), 11 * 4);
    }

    #[test]
    fn test_rejects_part_with_missing_material() {
        let err = StaticMesh::with_id(
            "bad",
            vec![Vertex::default(); 3],
            vec![0, 1, 2],
            Vec::new(),
            vec![MeshPart {
                index_base: 0,
                index_count: 3,
                material: 0,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::InvalidMesh { .. }));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let vertices = vec![Vertex::default(); 2];
        let err = StaticMesh::with_id("bad", vertices, vec![0, 1, 2], Vec::new(), Vec::new())
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidMesh { ref id, .. } if id == "bad"));
    }
}
