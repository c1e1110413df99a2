//! Round-robin mesh selection

use crate::scene::{NodeId, SceneGraphVisitor, SceneNode};

/// Collects nodes with mesh geometry and hands them out round-robin
///
/// Unlike [`CameraSelector`](super::CameraSelector), an empty selector is not
/// an error: [`next_mesh`](MeshSelector::next_mesh) yields `None`.
#[derive(Debug, Default, Clone)]
pub struct MeshSelector {
    meshes: Vec<NodeId>,
    current: usize,
}

impl MeshSelector {
    /// Create an empty selector
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected meshes in traversal order
    pub fn meshes(&self) -> &[NodeId] {
        &self.meshes
    }

    /// Mesh at the cursor, then advance the cursor with wrap-around
    pub fn next_mesh(&mut self) -> Option<NodeId> {
        let mesh = *self.meshes.get(self.current)?;
        self.current = (self.current + 1) % self.meshes.len();
        Some(mesh)
    }

    /// Move the cursor back to the first mesh
    pub fn reset_current_mesh(&mut self) {
        self.current = 0;
    }
}

impl SceneGraphVisitor for MeshSelector {
    fn visit_down(&mut self, id: NodeId, node: &SceneNode) {
        if node.as_mesh().is_some() {
            self.meshes.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::static_mesh::tests::quad;
    use crate::scene::{Camera, SceneGraph};

    #[test]
    fn test_round_robin() {
        let mut graph = SceneGraph::new("scene");
        let a = graph.add_node(quad("a", 1));
        graph.add_node(Camera::with_id("cam", 1.0, 1.0, 0.1, 10.0).expect("camera"));
        let b = graph.add_node(quad("b", 1));

        let mut selector = MeshSelector::new();
        graph.accept_down(&mut selector);

        assert_eq!(selector.meshes(), &[a, b]);
        assert_eq!(selector.next_mesh(), Some(a));
        assert_eq!(selector.next_mesh(), Some(b));
        assert_eq!(selector.next_mesh(), Some(a));
        selector.reset_current_mesh();
        assert_eq!(selector.next_mesh(), Some(a));
    }

    #[test]
    fn test_empty_selector_yields_none() {
        let mut selector = MeshSelector::new();
        SceneGraph::new("empty").accept_down(&mut selector);
        assert_eq!(selector.next_mesh(), None);
    }
}
