//! # Frame Renderer
//!
//! Drives one render session over a [`SceneGraph`].
//!
//! ## Session lifecycle
//!
//! ```text
//! new(host, pacer)
//!   └─ prepare(graph)        collect actors, cameras, meshes, materials;
//!                            upload geometry; allocate uniform storage
//!        └─ render_frame()*  acquire → controller → flames → static uniform
//!                            → dynamic uniform → present → clear flags
//! ```
//!
//! Selector snapshots are taken once in `prepare`; nodes added to the graph
//! afterwards need a new session.

use ash::vk;

use super::buffer::BufferHost;
use super::frame::FramePacer;
use super::sync::{SyncReport, UniformSynchronizer};
use super::{RenderError, RenderResult};
use crate::foundation::time::Timer;
use crate::scene::visitors::{
    ActorsContainer, CameraSelector, GeometryLayout, MaterialCounter, StaticMeshesContainer,
};
use crate::scene::{ActorController, ChangeTracking, NodeId, SceneGraph};

/// Per-frame outcome
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    /// Zero-based frame number within the session
    pub frame: u64,
    /// Swapchain image the frame was rendered into
    pub image_index: u32,
    /// Whether projection/view were rewritten
    pub static_updated: bool,
    /// Dynamic uniform outcome
    pub sync: SyncReport,
    /// Frames per second, reported once per completed one-second window
    pub fps: Option<f32>,
}

/// Vertex and index buffers holding every static mesh back to back
struct GeometryBuffers<B> {
    vertices: B,
    indices: B,
}

/// Scene renderer over a buffer host and a frame pacer
pub struct SceneRenderer<H: BufferHost, P: FramePacer> {
    host: H,
    pacer: P,
    controller: ActorController,
    timer: Timer,
    cameras: CameraSelector,
    current_camera: Option<NodeId>,
    geometry: GeometryLayout,
    geometry_buffers: Option<GeometryBuffers<H::Buffer>>,
    material_count: u32,
    synchronizer: Option<UniformSynchronizer<H>>,
}

impl<H: BufferHost, P: FramePacer> SceneRenderer<H, P> {
    /// Create an unprepared renderer
    pub fn new(host: H, pacer: P) -> Self {
        Self {
            host,
            pacer,
            controller: ActorController::new(5.0, 0.25),
            timer: Timer::new(),
            cameras: CameraSelector::new(),
            current_camera: None,
            geometry: GeometryLayout::default(),
            geometry_buffers: None,
            material_count: 0,
            synchronizer: None,
        }
    }

    /// Builder: replace the actor controller
    #[must_use]
    pub fn with_controller(mut self, controller: ActorController) -> Self {
        self.controller = controller;
        self
    }

    /// Collect the scene and allocate GPU storage
    ///
    /// Selects the first camera as the active one. Calling it again starts a
    /// new session from the current graph; its first frame uploads every
    /// uniform whether or not the nodes are flagged as changed.
    ///
    /// # Errors
    /// [`SceneError::CameraNotFound`](crate::scene::SceneError::CameraNotFound)
    /// without cameras, [`RenderError::NoActors`] without actors, or any
    /// buffer host failure.
    pub fn prepare(&mut self, graph: &SceneGraph) -> RenderResult<()> {
        self.synchronizer = None;
        self.geometry_buffers = None;

        let mut actors = ActorsContainer::new();
        graph.accept_down(&mut actors);

        let mut cameras = CameraSelector::new();
        graph.accept_down(&mut cameras);

        let mut meshes = StaticMeshesContainer::new();
        graph.accept_down(&mut meshes);

        let mut materials = MaterialCounter::new();
        graph.accept_down(&mut materials);

        log::debug!(
            "Scene '{}': {} actors, {} cameras, {} static meshes, {} materials",
            graph.id(),
            actors.len(),
            cameras.cameras().len(),
            meshes.meshes().len(),
            materials.materials_count()
        );

        let current_camera = cameras.next_camera()?;

        self.geometry = meshes.geometry_layout(graph)?;
        if !self.geometry.is_empty() {
            let (vertices, indices) = meshes.geometry_data(graph)?;
            self.geometry_buffers = Some(GeometryBuffers {
                vertices: self
                    .create_geometry_buffer(vk::BufferUsageFlags::VERTEX_BUFFER, &vertices)?,
                indices: self.create_geometry_buffer(vk::BufferUsageFlags::INDEX_BUFFER, &indices)?,
            });
        }

        self.synchronizer = Some(UniformSynchronizer::prepare(&mut self.host, &actors)?);
        self.cameras = cameras;
        self.current_camera = Some(current_camera);
        self.material_count = materials.materials_count();
        self.timer = Timer::new();

        log::info!(
            "Render session prepared: {} vertex bytes, {} index bytes, {} materials",
            self.geometry.vertex_bytes,
            self.geometry.index_bytes,
            self.material_count
        );
        Ok(())
    }

    fn create_geometry_buffer(
        &mut self,
        usage: vk::BufferUsageFlags,
        data: &[u8],
    ) -> RenderResult<H::Buffer> {
        self.host.create_buffer(
            usage,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
            data.len() as u64,
            Some(data),
        )
    }

    /// Render one frame and clear the change flags it consumed
    ///
    /// # Errors
    /// [`RenderError::NotPrepared`] before [`prepare`](Self::prepare), or any
    /// scene, buffer or pacing failure. The frame is abandoned on error and
    /// change flags are left raised.
    pub fn render_frame(
        &mut self,
        graph: &mut SceneGraph,
        delta_time: f32,
    ) -> RenderResult<FrameStats> {
        let camera = self.current_camera.ok_or(RenderError::NotPrepared)?;
        let sync = self.synchronizer.as_mut().ok_or(RenderError::NotPrepared)?;

        let image_index = self.pacer.acquire_next_image()?;

        self.controller.update(graph, delta_time)?;
        graph.for_each_node_mut(|_, node| {
            if let Some(flame) = node.as_flame_mut() {
                flame.update(delta_time);
            }
        });

        let static_updated = sync.update_static_uniform(graph, camera)?;
        let report = sync.update_dynamic_uniform(graph)?;

        self.pacer.present(image_index)?;
        sync.mark_synchronized(graph)?;

        let frame = self.timer.frame_count();
        let fps = self.timer.advance(delta_time);
        if let Some(fps) = fps {
            log::info!("FPS: {fps:.1}");
        }

        Ok(FrameStats {
            frame,
            image_index,
            static_updated,
            sync: report,
            fps,
        })
    }

    /// Switch to the next camera and force its static uniform upload
    ///
    /// # Errors
    /// [`SceneError::CameraNotFound`](crate::scene::SceneError::CameraNotFound)
    /// when the session has no cameras.
    pub fn cycle_camera(&mut self, graph: &mut SceneGraph) -> RenderResult<NodeId> {
        let camera = self.cameras.next_camera()?;
        graph.camera_mut(camera)?.mark_changed();
        self.current_camera = Some(camera);
        log::debug!("Active camera: '{}'", graph.get(camera)?.id());
        Ok(camera)
    }

    /// Active camera
    pub fn current_camera(&self) -> Option<NodeId> {
        self.current_camera
    }

    /// Actor controller
    pub fn controller(&self) -> &ActorController {
        &self.controller
    }

    /// Mutable actor controller
    pub fn controller_mut(&mut self) -> &mut ActorController {
        &mut self.controller
    }

    /// Materials across all static meshes, for descriptor pool sizing
    pub fn material_count(&self) -> u32 {
        self.material_count
    }

    /// Placement of static meshes in the geometry buffers
    pub fn geometry(&self) -> &GeometryLayout {
        &self.geometry
    }

    /// Vertex buffer, when the scene has static geometry
    pub fn vertex_buffer(&self) -> Option<&H::Buffer> {
        self.geometry_buffers.as_ref().map(|buffers| &buffers.vertices)
    }

    /// Index buffer, when the scene has static geometry
    pub fn index_buffer(&self) -> Option<&H::Buffer> {
        self.geometry_buffers.as_ref().map(|buffers| &buffers.indices)
    }

    /// Uniform storage of the current session
    pub fn synchronizer(&self) -> Option<&UniformSynchronizer<H>> {
        self.synchronizer.as_ref()
    }

    /// Buffer host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Frame pacer
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Session timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}
