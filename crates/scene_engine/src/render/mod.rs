//! Rendering core
//!
//! Turns a [`SceneGraph`](crate::scene::SceneGraph) into per-frame uniform
//! buffer updates. GPU bootstrap, swapchain and pipelines are external
//! collaborators reached through two seams:
//!
//! - [`BufferHost`] / [`DeviceBuffer`] allocate, map, write and flush memory
//! - [`FramePacer`] acquires and presents swapchain images
//!
//! ## Uniform layout
//!
//! ```text
//! static buffer   [ projection | view | light_position ]
//! dynamic buffer  [ slot 0 | slot 1 | ... | slot N-1 ]   one model matrix per actor
//!                   \____ aligned_size(64, minUniformBufferOffsetAlignment)
//! ```
//!
//! Only actors whose change flag is raised are written into their slot, and
//! the dynamic buffer is flushed once per frame at most.

pub mod alignment;
pub mod buffer;
pub mod frame;
pub mod renderer;
pub mod sync;
pub mod uniforms;
pub mod vulkan;

#[cfg(test)]
mod tests;

pub use alignment::aligned_size;
pub use buffer::{BufferHost, DeviceBuffer, HostBuffer, HostBufferHost};
pub use frame::{FramePacer, HeadlessPacer};
pub use renderer::{FrameStats, SceneRenderer};
pub use sync::{SyncReport, UniformSynchronizer};
pub use uniforms::{DynamicUniformBlock, StaticUniformData};

use ash::vk;
use thiserror::Error;

use crate::scene::SceneError;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// A frame was requested before [`SceneRenderer::prepare`]
    #[error("Renderer is not prepared")]
    NotPrepared,

    /// Dynamic uniform storage needs at least one actor
    #[error("Scene has no actors to synchronize")]
    NoActors,

    /// A dynamic uniform slot index is past the end of the block
    #[error("Uniform slot {slot} out of range (slot count {count})")]
    SlotOutOfRange {
        /// Requested slot
        slot: usize,
        /// Number of slots in the block
        count: usize,
    },

    /// A write or flush was issued against unmapped memory
    #[error("Device buffer is not mapped to host memory")]
    BufferNotMapped,

    /// A write or flush range leaves the buffer
    #[error("Range {offset}..{offset}+{len} exceeds buffer size {size}")]
    BufferOverflow {
        /// Start of the range in bytes
        offset: u64,
        /// Length of the range in bytes
        len: u64,
        /// Buffer size in bytes
        size: u64,
    },

    /// Initial data was supplied for memory the host cannot access
    #[error("Initial buffer data requires host-visible memory, got {0:?}")]
    HostAccessRequired(vk::MemoryPropertyFlags),

    /// Vulkan call failed
    #[error("Vulkan {operation} failed: {result}")]
    Vulkan {
        /// Name of the failed operation
        operation: &'static str,
        /// Vulkan result code
        result: vk::Result,
    },

    /// No memory type satisfies the requested properties
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,

    /// Frame pacing failed
    #[error("Frame pacing failed: {0}")]
    Pacing(String),

    /// Scene lookup failed
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
