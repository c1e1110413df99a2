//! Material totals for descriptor pool sizing

use crate::scene::{NodeId, SceneGraphVisitor, SceneNode};

/// Sums the material count of every static mesh
///
/// The renderer sizes its material descriptor pool from this total.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialCounter {
    materials_count: u32,
}

impl MaterialCounter {
    /// Create a zeroed counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of materials seen
    pub fn materials_count(&self) -> u32 {
        self.materials_count
    }
}

impl SceneGraphVisitor for MaterialCounter {
    fn visit_down(&mut self, _id: NodeId, node: &SceneNode) {
        if let Some(mesh) = node.as_static_mesh() {
            let count = u32::try_from(mesh.materials().len()).unwrap_or(u32::MAX);
            self.materials_count = self.materials_count.saturating_add(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::static_mesh::tests::quad;
    use crate::scene::{Actor, SceneGraph};

    #[test]
    fn test_sums_static_mesh_materials() {
        let mut graph = SceneGraph::new("scene");
        graph.add_node(quad("a", 2));
        graph.add_node(Actor::with_id("plain"));
        graph.add_node(quad("b", 3));

        let mut counter = MaterialCounter::new();
        graph.accept_down(&mut counter);
        assert_eq!(counter.materials_count(), 5);
    }

    #[test]
    fn test_no_meshes_counts_zero() {
        let mut counter = MaterialCounter::new();
        SceneGraph::new("empty").accept_down(&mut counter);
        assert_eq!(counter.materials_count(), 0);
    }
}
