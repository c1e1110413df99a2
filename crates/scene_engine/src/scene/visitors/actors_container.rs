//! Actor collector

use crate::scene::{NodeId, SceneGraphVisitor, SceneNode};

/// Collects every node with the actor capability
///
/// The position of a handle in [`actors`](ActorsContainer::actors) is the
/// actor's dynamic uniform slot.
#[derive(Debug, Default, Clone)]
pub struct ActorsContainer {
    actors: Vec<NodeId>,
}

impl ActorsContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Actor handles in traversal order
    pub fn actors(&self) -> &[NodeId] {
        &self.actors
    }

    /// Slot index of an actor
    pub fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.actors.iter().position(|&actor| actor == id)
    }

    /// Number of collected actors
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actor was collected
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl SceneGraphVisitor for ActorsContainer {
    fn visit_down(&mut self, id: NodeId, node: &SceneNode) {
        if node.as_actor().is_some() {
            self.actors.push(id);
        }
    }
}
