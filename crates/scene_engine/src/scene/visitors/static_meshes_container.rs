//! Static geometry collection and buffer layout

use crate::scene::{MeshGeometry, NodeId, SceneGraph, SceneGraphVisitor, SceneNode, SceneResult};

/// Collects every static mesh
#[derive(Debug, Default, Clone)]
pub struct StaticMeshesContainer {
    meshes: Vec<NodeId>,
}

/// Placement of one mesh inside the shared vertex and index buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRange {
    /// Mesh handle
    pub mesh: NodeId,
    /// Byte offset of the first vertex
    pub vertex_offset: usize,
    /// Byte offset of the first index
    pub index_offset: usize,
    /// Number of indices to draw
    pub index_count: usize,
}

/// Sizes and offsets for pooling all static mesh geometry into two buffers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryLayout {
    /// Total vertex bytes
    pub vertex_bytes: usize,
    /// Total index bytes
    pub index_bytes: usize,
    /// Per-mesh ranges in traversal order
    pub ranges: Vec<MeshRange>,
}

impl GeometryLayout {
    /// Whether there is nothing to upload
    pub fn is_empty(&self) -> bool {
        self.vertex_bytes == 0 && self.index_bytes == 0
    }
}

impl StaticMeshesContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Static mesh handles in traversal order
    pub fn meshes(&self) -> &[NodeId] {
        &self.meshes
    }

    /// Lay the collected meshes out back to back
    ///
    /// # Errors
    /// [`SceneError::NodeNotFound`](crate::scene::SceneError::NodeNotFound)
    /// when a handle no longer resolves in `graph`.
    pub fn geometry_layout(&self, graph: &SceneGraph) -> SceneResult<GeometryLayout> {
        let mut layout = GeometryLayout::default();

        for &id in &self.meshes {
            let Some(mesh) = graph.get(id)?.as_mesh() else {
                continue;
            };
            layout.ranges.push(MeshRange {
                mesh: id,
                vertex_offset: layout.vertex_bytes,
                index_offset: layout.index_bytes,
                index_count: mesh.index_count(),
            });
            layout.vertex_bytes += mesh.vertex_bytes().len();
            layout.index_bytes += mesh.index_bytes().len();
        }

        Ok(layout)
    }

    /// Concatenated vertex and index bytes in layout order
    ///
    /// # Errors
    /// Same as [`StaticMeshesContainer::geometry_layout`].
    pub fn geometry_data(&self, graph: &SceneGraph) -> SceneResult<(Vec<u8>, Vec<u8>)> {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for &id in &self.meshes {
            if let Some(mesh) = graph.get(id)?.as_mesh() {
                vertices.extend_from_slice(mesh.vertex_bytes());
                indices.extend_from_slice(mesh.index_bytes());
            }
        }
        Ok((vertices, indices))
    }
}

impl SceneGraphVisitor for StaticMeshesContainer {
    fn visit_down(&mut self, id: NodeId, node: &SceneNode) {
        if node.as_static_mesh().is_some() {
            self.meshes.push(id);
        }
    }
}
