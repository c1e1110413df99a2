//! Abstract mesh capability

use crate::foundation::math::{Vec2, Vec3};

/// Index type used for vertices, faces and parts
pub type MeshElementIndex = u32;

/// Geometry exposed by any node that can be drawn as a triangle mesh
///
/// Per-vertex accessors return `None` for out-of-range indices.
pub trait MeshGeometry {
    /// Number of vertices
    fn vertex_count(&self) -> usize;

    /// Number of indices
    fn index_count(&self) -> usize;

    /// Vertex position
    fn vertex_position(&self, index: MeshElementIndex) -> Option<Vec3>;

    /// Vertex texture coordinate
    fn vertex_uv(&self, index: MeshElementIndex) -> Option<Vec2>;

    /// Vertex normal
    fn vertex_normal(&self, index: MeshElementIndex) -> Option<Vec3>;

    /// Vertex color
    fn vertex_color(&self, index: MeshElementIndex) -> Option<Vec3>;

    /// Raw interleaved vertex data as uploaded to the vertex buffer
    fn vertex_bytes(&self) -> &[u8];

    /// Raw index data as uploaded to the index buffer
    fn index_bytes(&self) -> &[u8];
}
