//! Single-pass collectors built on [`SceneGraphVisitor`](super::SceneGraphVisitor)
//!
//! Each visitor is filled by one `SceneGraph::accept_down` call and keeps
//! [`NodeId`](super::NodeId) handles in traversal order. Nodes added after the
//! traversal are only seen by a new visitor.

mod actors_container;
mod camera_selector;
mod material_counter;
mod mesh_selector;
mod static_meshes_container;

pub use actors_container::ActorsContainer;
pub use camera_selector::CameraSelector;
pub use material_counter::MaterialCounter;
pub use mesh_selector::MeshSelector;
pub use static_meshes_container::{GeometryLayout, MeshRange, StaticMeshesContainer};
