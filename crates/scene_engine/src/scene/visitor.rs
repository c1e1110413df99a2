//! Visitor protocol

use super::{NodeId, SceneNode};

/// Callback interface for a graph traversal
///
/// `visit_down` fires when the traversal enters a node and `visit_up` when it
/// leaves. Visitors inspect the node through its capability queries and
/// ignore nodes they do not care about.
pub trait SceneGraphVisitor {
    /// Entering `node`
    fn visit_down(&mut self, id: NodeId, node: &SceneNode);

    /// Leaving `node`
    fn visit_up(&mut self, _id: NodeId, _node: &SceneNode) {}
}
