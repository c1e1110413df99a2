//! # Uniform Synchronization
//!
//! Copies scene state into GPU uniform memory, touching only what changed.
//!
//! ## Frame protocol
//!
//! 1. [`update_static_uniform`](UniformSynchronizer::update_static_uniform)
//!    writes projection and view when the active camera is dirty.
//! 2. [`update_dynamic_uniform`](UniformSynchronizer::update_dynamic_uniform)
//!    stages the model matrix of every dirty actor into its slot, then
//!    uploads the staging block and flushes it once. With no dirty actor it
//!    makes no device call at all.
//!
//! The first update of each kind after [`prepare`](UniformSynchronizer::prepare)
//! writes everything regardless of change flags: the buffers start zeroed,
//! and a graph carried over from an earlier session may already be clean.
//! 3. After present,
//!    [`mark_synchronized`](UniformSynchronizer::mark_synchronized) clears
//!    every tracked actor's change flag.
//!
//! Slot `i` belongs to the `i`-th actor collected by
//! [`ActorsContainer`]. Clean slots keep the bytes staged in an earlier frame.

use ash::vk;

use super::alignment::aligned_size;
use super::buffer::{BufferHost, DeviceBuffer};
use super::uniforms::{DynamicUniformBlock, StaticUniformData};
use super::{RenderError, RenderResult};
use crate::foundation::math::MAT4_SIZE;
use crate::scene::visitors::ActorsContainer;
use crate::scene::{ChangeTracking, NodeId, SceneGraph};

/// Outcome of one dynamic uniform update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Slots rewritten this frame, ascending
    pub slots_written: Vec<usize>,
    /// Whether the dynamic buffer was uploaded and flushed
    pub flushed: bool,
}

impl SyncReport {
    /// Whether the frame needed no device work
    pub fn is_noop(&self) -> bool {
        self.slots_written.is_empty() && !self.flushed
    }
}

/// Owns the static and dynamic uniform buffers of a render session
pub struct UniformSynchronizer<H: BufferHost> {
    actors: Vec<NodeId>,
    block: DynamicUniformBlock,
    min_alignment: u64,
    static_buffer: H::Buffer,
    dynamic_buffer: H::Buffer,
    static_pending: bool,
    dynamic_pending: bool,
}

impl<H: BufferHost> UniformSynchronizer<H> {
    /// Allocate and map both uniform buffers for the collected actors
    ///
    /// # Errors
    /// [`RenderError::NoActors`] when `actors` is empty, or any allocation or
    /// mapping failure reported by `host`.
    pub fn prepare(host: &mut H, actors: &ActorsContainer) -> RenderResult<Self> {
        if actors.is_empty() {
            return Err(RenderError::NoActors);
        }

        let min_alignment = host.min_uniform_buffer_offset_alignment();
        let slot_size = aligned_size(MAT4_SIZE as u64, min_alignment);
        let block = DynamicUniformBlock::new(actors.len(), slot_size as usize);

        let mut static_buffer = host.create_buffer(
            vk::BufferUsageFlags::UNIFORM_BUFFER,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
            StaticUniformData::SIZE as u64,
            None,
        )?;
        static_buffer.map()?;

        let mut dynamic_buffer = host.create_buffer(
            vk::BufferUsageFlags::UNIFORM_BUFFER,
            vk::MemoryPropertyFlags::HOST_VISIBLE,
            block.len() as u64,
            None,
        )?;
        dynamic_buffer.map()?;

        log::info!(
            "Uniform storage ready: {} actor slots of {} bytes (alignment {})",
            block.slot_count(),
            block.slot_size(),
            min_alignment
        );

        Ok(Self {
            actors: actors.actors().to_vec(),
            block,
            min_alignment,
            static_buffer,
            dynamic_buffer,
            static_pending: true,
            dynamic_pending: true,
        })
    }

    /// Write the camera's projection and view if it changed, or if nothing
    /// was written yet this session
    ///
    /// Returns whether a write happened.
    pub fn update_static_uniform(
        &mut self,
        graph: &SceneGraph,
        camera: NodeId,
    ) -> RenderResult<bool> {
        let camera = graph.camera(camera)?;
        if !camera.is_changed() && !self.static_pending {
            return Ok(false);
        }

        let data = StaticUniformData::from_camera(camera);
        self.static_buffer.write(0, data.as_bytes())?;
        self.static_pending = false;
        log::trace!("Static uniform updated from camera '{}'", camera.id());
        Ok(true)
    }

    /// Stage dirty actors and upload the block with a single flush
    pub fn update_dynamic_uniform(&mut self, graph: &SceneGraph) -> RenderResult<SyncReport> {
        let mut report = SyncReport::default();

        for (slot, &id) in self.actors.iter().enumerate() {
            let actor = graph.actor(id)?;
            if self.dynamic_pending || actor.is_changed() {
                self.block.write_matrix(slot, actor.model_matrix())?;
                report.slots_written.push(slot);
            }
        }

        if report.slots_written.is_empty() {
            return Ok(report);
        }

        let size = self.block.len() as u64;
        self.dynamic_buffer.write(0, self.block.as_bytes())?;
        self.dynamic_buffer.flush(size, 0)?;
        self.dynamic_pending = false;
        report.flushed = true;

        log::trace!("Dynamic uniform slots written: {:?}", report.slots_written);
        Ok(report)
    }

    /// Clear the change flag of every tracked actor
    ///
    /// # Errors
    /// [`SceneError::NodeNotFound`](crate::scene::SceneError::NodeNotFound)
    /// when a tracked handle is gone from `graph`.
    pub fn mark_synchronized(&self, graph: &mut SceneGraph) -> RenderResult<()> {
        for &id in &self.actors {
            graph.get_mut(id)?.mark_unchanged();
        }
        Ok(())
    }

    /// Dynamic descriptor offset of a slot
    pub fn slot_offset(&self, slot: usize) -> RenderResult<u32> {
        let offset = self.block.slot_offset(slot)?;
        u32::try_from(offset).map_err(|_| RenderError::BufferOverflow {
            offset: offset as u64,
            len: self.block.slot_size() as u64,
            size: u64::from(u32::MAX),
        })
    }

    /// Slot of an actor handle
    pub fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.actors.iter().position(|&actor| actor == id)
    }

    /// Tracked actors in slot order
    pub fn actors(&self) -> &[NodeId] {
        &self.actors
    }

    /// Host-side staging block
    pub fn block(&self) -> &DynamicUniformBlock {
        &self.block
    }

    /// Alignment read from the host at preparation
    pub fn min_alignment(&self) -> u64 {
        self.min_alignment
    }

    /// Buffer holding [`StaticUniformData`]
    pub fn static_buffer(&self) -> &H::Buffer {
        &self.static_buffer
    }

    /// Buffer holding the per-actor slots
    pub fn dynamic_buffer(&self) -> &H::Buffer {
        &self.dynamic_buffer
    }
}

impl<H: BufferHost> Drop for UniformSynchronizer<H> {
    fn drop(&mut self) {
        self.static_buffer.unmap();
        self.dynamic_buffer.unmap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Vec3};
    use crate::render::buffer::HostBufferHost;
    use crate::scene::{Actor, Camera, SceneError};

    type Setup = (SceneGraph, ActorsContainer, UniformSynchronizer<HostBufferHost>);

    fn setup(alignment: u64) -> Setup {
        let mut graph = SceneGraph::new("scene");
        graph.add_node(Camera::with_id("cam", 1.0, 1.0, 0.1, 10.0).expect("camera"));
        graph.add_node(Actor::with_id("a"));
        let mut actors = ActorsContainer::new();
        graph.accept_down(&mut actors);
        let mut host = HostBufferHost::new(alignment);
        let sync = UniformSynchronizer::prepare(&mut host, &actors).expect("prepare");
        (graph, actors, sync)
    }

    #[test]
    fn test_no_actors_fails() {
        let mut host = HostBufferHost::new(256);
        let result = UniformSynchronizer::prepare(&mut host, &ActorsContainer::new());
        assert!(matches!(result, Err(RenderError::NoActors)));
        assert_eq!(host.buffers_created(), 0);
    }

    #[test]
    fn test_prepare_sizes_and_maps_buffers() {
        let (_, _, sync) = setup(256);
        assert_eq!(sync.block().slot_size(), 256);
        assert_eq!(sync.dynamic_buffer().size(), 512);
        assert_eq!(sync.static_buffer().size(), StaticUniformData::SIZE as u64);
        assert!(sync.dynamic_buffer().is_mapped());
        assert!(sync.static_buffer().is_mapped());
        assert_eq!(sync.slot_offset(1).expect("offset"), 256);
        assert!(sync.slot_offset(2).is_err());
    }

    #[test]
    fn test_first_update_writes_everything() {
        let (graph, _, mut sync) = setup(64);
        let report = sync.update_dynamic_uniform(&graph).expect("update");
        assert_eq!(report.slots_written, vec![0, 1]);
        assert!(report.flushed);
        assert_eq!(sync.dynamic_buffer().flush_count(), 1);
        assert_eq!(sync.dynamic_buffer().flushed_ranges(), &[(0, 128)]);
    }

    #[test]
    fn test_static_uniform_follows_camera_flag() {
        let (mut graph, _, mut sync) = setup(64);
        let cam = graph.find_by_id("cam").expect("camera");
        assert!(sync.update_static_uniform(&graph, cam).expect("update"));
        sync.mark_synchronized(&mut graph).expect("mark");
        assert!(!sync.update_static_uniform(&graph, cam).expect("update"));
        assert_eq!(sync.static_buffer().write_count(), 1);

        let expected = StaticUniformData::from_camera(graph.camera(cam).expect("camera"));
        assert_eq!(sync.static_buffer().contents(), expected.as_bytes());
    }

    #[test]
    fn test_static_uniform_rejects_non_camera() {
        let (graph, _, mut sync) = setup(64);
        let actor = graph.find_by_id("a").expect("actor");
        assert!(matches!(
            sync.update_static_uniform(&graph, actor),
            Err(RenderError::Scene(SceneError::NotACamera(_)))
        ));
    }

    #[test]
    fn test_dynamic_slot_bytes_match_model_matrix() {
        let (mut graph, _, mut sync) = setup(64);
        let a = graph.find_by_id("a").expect("actor");
        graph.actor_mut(a).expect("actor").translate(&Vec3::new(4.0, 5.0, 6.0));
        sync.update_dynamic_uniform(&graph).expect("update");

        let slot = sync.slot_of(a).expect("slot");
        let start = sync.slot_offset(slot).expect("offset") as usize;
        let matrix = Mat4::new_translation(&Vec3::new(4.0, 5.0, 6.0));
        let expected: &[u8] = bytemuck::cast_slice(matrix.as_slice());
        assert_eq!(&sync.dynamic_buffer().contents()[start..start + MAT4_SIZE], expected);
    }

    #[test]
    fn test_new_session_uploads_clean_graph() {
        let (mut graph, actors, mut sync) = setup(64);
        sync.update_dynamic_uniform(&graph).expect("update");
        sync.mark_synchronized(&mut graph).expect("mark");
        drop(sync);

        let mut host = HostBufferHost::new(64);
        let mut sync = UniformSynchronizer::prepare(&mut host, &actors).expect("prepare");
        let cam = graph.find_by_id("cam").expect("camera");
        assert!(!graph.has_changes());

        assert!(sync.update_static_uniform(&graph, cam).expect("update"));
        let report = sync.update_dynamic_uniform(&graph).expect("update");
        assert_eq!(report.slots_written, vec![0, 1]);

        // Pending uploads are consumed once
        assert!(!sync.update_static_uniform(&graph, cam).expect("update"));
        assert!(sync.update_dynamic_uniform(&graph).expect("update").is_noop());
    }
}
