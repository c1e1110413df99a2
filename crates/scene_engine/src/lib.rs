//! # Scene Engine
//!
//! Scene graph, change tracking and uniform synchronization for a small
//! Vulkan rendering demo.
//!
//! ## Features
//!
//! - **Scene Graph**: Ordered arena of nodes (cameras, static meshes, flames)
//! - **Visitors**: Capability-filtered traversal producing selector snapshots
//! - **Dirty Tracking**: Per-node change flags spanning frames
//! - **Uniform Sync**: Aligned per-actor slots uploaded with one write and one flush
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = SceneGraph::new("scene");
//!     graph.add_node(SceneNode::Camera(Camera::perspective(60.0, 16.0 / 9.0, 0.1, 100.0)?));
//!     graph.add_node(SceneNode::Actor(Actor::new()));
//!
//!     let host = HostBufferHost::new(256);
//!     let pacer = HeadlessPacer::new(3);
//!     let mut renderer = SceneRenderer::new(host, pacer);
//!     renderer.prepare(&graph)?;
//!     renderer.render_frame(&mut graph, 1.0 / 60.0)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, DemoConfig},
        foundation::math::{Mat4, Vec3, Vec4},
        render::{
            BufferHost, DeviceBuffer, FramePacer, FrameStats, HeadlessPacer, HostBufferHost,
            RenderError, SceneRenderer, SyncReport, UniformSynchronizer,
        },
        scene::{
            Actor, ActorController, Camera, ChangeTracking, Flame, FlameParams, Movement, NodeId,
            NodeKind, SceneError, SceneGraph, SceneGraphVisitor, SceneNode, StaticMesh,
        },
    };
}
