//! Ordered node arena

use slotmap::SlotMap;

use super::{
    Actor, Camera, ChangeTracking, NodeId, SceneError, SceneGraphVisitor, SceneNode, SceneResult,
};

/// Root of the scene hierarchy
///
/// Nodes live in a slot map and are addressed through [`NodeId`] handles;
/// traversal follows insertion order. Nodes are never removed while a
/// renderer holds handles into the graph.
#[derive(Debug)]
pub struct SceneGraph {
    id: String,
    nodes: SlotMap<NodeId, SceneNode>,
    order: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Graph identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Append a node and return its handle
    pub fn add_node(&mut self, node: impl Into<SceneNode>) -> NodeId {
        let node = node.into();
        log::debug!("Scene '{}': adding {:?} node '{}'", self.id, node.kind(), node.id());
        let id = self.nodes.insert(node);
        self.order.push(id);
        id
    }

    /// Node by handle
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Mutable node by handle
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Node by handle, failing with [`SceneError::NodeNotFound`]
    pub fn get(&self, id: NodeId) -> SceneResult<&SceneNode> {
        self.nodes.get(id).ok_or_else(|| SceneError::NodeNotFound(format!("{id:?}")))
    }

    /// Mutable node by handle, failing with [`SceneError::NodeNotFound`]
    pub fn get_mut(&mut self, id: NodeId) -> SceneResult<&mut SceneNode> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| SceneError::NodeNotFound(format!("{id:?}")))
    }

    /// Actor capability of a node
    pub fn actor(&self, id: NodeId) -> SceneResult<&Actor> {
        let node = self.get(id)?;
        node.as_actor().ok_or_else(|| SceneError::NotAnActor(node.id().to_string()))
    }

    /// Mutable actor capability of a node
    pub fn actor_mut(&mut self, id: NodeId) -> SceneResult<&mut Actor> {
        let node = self.get_mut(id)?;
        let name = node.id().to_string();
        node.as_actor_mut().ok_or(SceneError::NotAnActor(name))
    }

    /// Camera stored at a handle
    pub fn camera(&self, id: NodeId) -> SceneResult<&Camera> {
        let node = self.get(id)?;
        node.as_camera().ok_or_else(|| SceneError::NotACamera(node.id().to_string()))
    }

    /// Mutable camera stored at a handle
    pub fn camera_mut(&mut self, id: NodeId) -> SceneResult<&mut Camera> {
        let node = self.get_mut(id)?;
        let name = node.id().to_string();
        node.as_camera_mut().ok_or(SceneError::NotACamera(name))
    }

    /// First node whose identifier equals `id`
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.order.iter().copied().find(|&handle| self.nodes[handle].id() == id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node handles in traversal order
    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes in traversal order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.order.iter().map(move |&id| (id, &self.nodes[id]))
    }

    /// Apply `f` to every node in traversal order
    pub fn for_each_node_mut(&mut self, mut f: impl FnMut(NodeId, &mut SceneNode)) {
        for &id in &self.order {
            if let Some(node) = self.nodes.get_mut(id) {
                f(id, node);
            }
        }
    }

    /// Whether any actor is waiting to be synchronized
    ///
    /// Nodes without the actor capability never reach uniform memory, so
    /// their flags are ignored.
    pub fn has_changes(&self) -> bool {
        self.nodes
            .values()
            .filter_map(|node| node.as_actor())
            .any(|actor| actor.is_changed())
    }

    /// Visit every node in insertion order, calling its `accept_down` then
    /// its `accept_up`
    pub fn accept_down(&self, visitor: &mut dyn SceneGraphVisitor) {
        for (id, node) in self.iter() {
            node.accept_down(id, visitor);
            node.accept_up(id, visitor);
        }
    }

    /// The graph itself does not report an exit event
    pub fn accept_up(&self, _visitor: &mut dyn SceneGraphVisitor) {}
}
