//! Scene management system
//!
//! Provides the scene hierarchy the renderer synchronizes to the GPU.
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (ordered node arena)
//!      ↓  accept_down(visitor)
//! Selector visitors (actors, cameras, meshes, materials)
//!      ↓  NodeId snapshots
//! Renderer (uniform slots, dirty-flag driven uploads)
//! ```
//!
//! Every node carries a change flag. Mutators raise it, and the uniform
//! synchronizer clears it once the node's state has been copied out.

mod actor;
mod camera;
mod controller;
mod flame;
mod mesh;
mod node;
mod scene_graph;
mod static_mesh;
mod visitor;
pub mod visitors;

pub use actor::Actor;
pub use camera::Camera;
pub use controller::{ActorController, Movement};
pub use flame::{Flame, FlameParams, Particle};
pub use mesh::{MeshElementIndex, MeshGeometry};
pub use node::{ChangeTracking, NodeId, NodeKind, NodeState, SceneNode};
pub use scene_graph::SceneGraph;
pub use static_mesh::{Material, MaterialProperties, MeshPart, StaticMesh, Vertex};
pub use visitor::SceneGraphVisitor;

#[cfg(test)]
pub(crate) use static_mesh::tests::quad as test_quad;

use thiserror::Error;

/// Scene configuration and lookup errors
///
/// These indicate a scene that was assembled incorrectly rather than a
/// transient condition, so callers propagate them instead of retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A camera was requested but the selector holds none
    #[error("Camera is not found")]
    CameraNotFound,

    /// A node handle does not resolve to a node in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The node exists but lacks the actor capability
    #[error("Node '{0}' is not an actor")]
    NotAnActor(String),

    /// The node exists but is not a camera
    #[error("Node '{0}' is not a camera")]
    NotACamera(String),

    /// Static mesh data is inconsistent
    #[error("Invalid mesh '{id}': {reason}")]
    InvalidMesh {
        /// Mesh identifier
        id: String,
        /// What is wrong with the mesh data
        reason: String,
    },

    /// Camera projection parameters are degenerate
    #[error("Invalid camera '{id}': {reason}")]
    InvalidCamera {
        /// Camera identifier
        id: String,
        /// Which parameter is out of range
        reason: String,
    },
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
