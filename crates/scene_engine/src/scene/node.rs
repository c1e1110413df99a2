//! Scene node identity, change tracking and capability queries

use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Actor, Camera, Flame, MeshGeometry, SceneGraphVisitor, StaticMesh};

slotmap::new_key_type! {
    /// Stable handle to a node stored in a [`SceneGraph`](super::SceneGraph)
    pub struct NodeId;
}

static DEFAULT_NODE_ID: AtomicUsize = AtomicUsize::new(0);

/// Generate `<prefix><n>` from a per-kind counter
pub(crate) fn default_id(prefix: &str, counter: &AtomicUsize) -> String {
    format!("{prefix}{}", counter.fetch_add(1, Ordering::Relaxed))
}

/// Identity and change flag shared by every node type
///
/// `changed` starts out `true` so every node is uploaded on the first frame
/// it takes part in synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeState {
    id: String,
    changed: bool,
}

impl NodeState {
    /// Create a node state with an auto-generated `node<N>` identifier
    pub fn new() -> Self {
        Self::with_id(default_id("node", &DEFAULT_NODE_ID))
    }

    /// Create a node state with an explicit identifier
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            changed: true,
        }
    }

    /// Node identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the node identifier
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Dirty-flag protocol implemented by every node type
///
/// Mutators call [`mark_changed`](ChangeTracking::mark_changed). Only the
/// uniform synchronizer calls [`mark_unchanged`](ChangeTracking::mark_unchanged),
/// after it has copied the node's state out.
pub trait ChangeTracking {
    /// Shared node state
    fn node_state(&self) -> &NodeState;

    /// Mutable shared node state
    fn node_state_mut(&mut self) -> &mut NodeState;

    /// Whether the node differs from what was last synchronized
    fn is_changed(&self) -> bool {
        self.node_state().changed
    }

    /// Force the node dirty
    fn mark_changed(&mut self) {
        self.node_state_mut().changed = true;
    }

    /// Clear the dirty flag once the node has been synchronized
    fn mark_unchanged(&mut self) {
        self.node_state_mut().changed = false;
    }

    /// Set the dirty flag directly
    fn set_changed(&mut self, changed: bool) {
        self.node_state_mut().changed = changed;
    }
}

impl ChangeTracking for NodeState {
    fn node_state(&self) -> &NodeState {
        self
    }

    fn node_state_mut(&mut self) -> &mut NodeState {
        self
    }
}

/// Field-less tag naming the concrete type of a [`SceneNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Plain node without a transform
    Empty,
    /// Transformable actor
    Actor,
    /// Perspective camera
    Camera,
    /// Static triangle mesh
    StaticMesh,
    /// Particle flame emitter
    Flame,
}

/// A participant in the scene hierarchy
///
/// Visitors filter nodes through the `as_*` capability queries instead of
/// matching on concrete types, so adding a node type only touches this enum.
#[derive(Debug)]
pub enum SceneNode {
    /// Plain node without a transform
    Empty(NodeState),
    /// Transformable actor
    Actor(Actor),
    /// Perspective camera
    Camera(Camera),
    /// Static triangle mesh
    StaticMesh(StaticMesh),
    /// Particle flame emitter
    Flame(Flame),
}

impl SceneNode {
    /// Tag of the concrete node type
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Empty(_) => NodeKind::Empty,
            Self::Actor(_) => NodeKind::Actor,
            Self::Camera(_) => NodeKind::Camera,
            Self::StaticMesh(_) => NodeKind::StaticMesh,
            Self::Flame(_) => NodeKind::Flame,
        }
    }

    /// Node identifier
    pub fn id(&self) -> &str {
        self.node_state().id()
    }

    /// Replace the node identifier
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.node_state_mut().set_id(id);
    }

    /// Actor capability: every node with a model matrix
    pub fn as_actor(&self) -> Option<&Actor> {
        match self {
            Self::Empty(_) => None,
            Self::Actor(actor) => Some(actor),
            Self::Camera(camera) => Some(camera.actor()),
            Self::StaticMesh(mesh) => Some(mesh.actor()),
            Self::Flame(flame) => Some(flame.actor()),
        }
    }

    /// Mutable actor capability
    pub fn as_actor_mut(&mut self) -> Option<&mut Actor> {
        match self {
            Self::Empty(_) => None,
            Self::Actor(actor) => Some(actor),
            Self::Camera(camera) => Some(camera.actor_mut()),
            Self::StaticMesh(mesh) => Some(mesh.actor_mut()),
            Self::Flame(flame) => Some(flame.actor_mut()),
        }
    }

    /// Camera capability
    pub fn as_camera(&self) -> Option<&Camera> {
        match self {
            Self::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera capability
    pub fn as_camera_mut(&mut self) -> Option<&mut Camera> {
        match self {
            Self::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mesh geometry capability
    pub fn as_mesh(&self) -> Option<&dyn MeshGeometry> {
        match self {
            Self::StaticMesh(mesh) => Some(mesh as &dyn MeshGeometry),
            _ => None,
        }
    }

    /// Static mesh capability
    pub fn as_static_mesh(&self) -> Option<&StaticMesh> {
        match self {
            Self::StaticMesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Flame capability
    pub fn as_flame(&self) -> Option<&Flame> {
        match self {
            Self::Flame(flame) => Some(flame),
            _ => None,
        }
    }

    /// Mutable flame capability
    pub fn as_flame_mut(&mut self) -> Option<&mut Flame> {
        match self {
            Self::Flame(flame) => Some(flame),
            _ => None,
        }
    }

    /// Entry half of the double dispatch
    pub fn accept_down(&self, id: NodeId, visitor: &mut dyn SceneGraphVisitor) {
        visitor.visit_down(id, self);
    }

    /// Exit half of the double dispatch
    pub fn accept_up(&self, id: NodeId, visitor: &mut dyn SceneGraphVisitor) {
        visitor.visit_up(id, self);
    }
}

impl ChangeTracking for SceneNode {
    fn node_state(&self) -> &NodeState {
        match self {
            Self::Empty(state) => state,
            Self::Actor(actor) => actor.node_state(),
            Self::Camera(camera) => camera.node_state(),
            Self::StaticMesh(mesh) => mesh.node_state(),
            Self::Flame(flame) => flame.node_state(),
        }
    }

    fn node_state_mut(&mut self) -> &mut NodeState {
        match self {
            Self::Empty(state) => state,
            Self::Actor(actor) => actor.node_state_mut(),
            Self::Camera(camera) => camera.node_state_mut(),
            Self::StaticMesh(mesh) => mesh.node_state_mut(),
            Self::Flame(flame) => flame.node_state_mut(),
        }
    }
}

impl From<Actor> for SceneNode {
    fn from(actor: Actor) -> Self {
        Self::Actor(actor)
    }
}

impl From<Camera> for SceneNode {
    fn from(camera: Camera) -> Self {
        Self::Camera(camera)
    }
}

impl From<StaticMesh> for SceneNode {
    fn from(mesh: StaticMesh) -> Self {
        Self::StaticMesh(mesh)
    }
}

impl From<Flame> for SceneNode {
    fn from(flame: Flame) -> Self {
        Self::Flame(flame)
    }
}
