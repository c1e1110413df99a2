//! Frame-level scenarios against the in-memory buffer host

use crate::foundation::math::{Vec3, MAT4_SIZE};
use crate::render::buffer::{DeviceBuffer, HostBufferHost};
use crate::render::frame::HeadlessPacer;
use crate::render::renderer::SceneRenderer;
use crate::render::uniforms::StaticUniformData;
use crate::render::RenderError;
use crate::scene::{
    test_quad as quad, Camera, ChangeTracking, Flame, FlameParams, Movement, NodeId, SceneError,
    SceneGraph,
};

const DT: f32 = 1.0 / 60.0;

type TestRenderer = SceneRenderer<HostBufferHost, HeadlessPacer>;

struct Scene {
    graph: SceneGraph,
    camera: NodeId,
    mesh0: NodeId,
    mesh1: NodeId,
}

fn three_actor_scene() -> Scene {
    let mut graph = SceneGraph::new("scenario");
    let camera = Camera::with_id("camera", 1.0, 16.0 / 9.0, 0.1, 100.0).expect("camera");
    let camera = graph.add_node(camera);
    let mesh0 = graph.add_node(quad("mesh0", 1));
    let mesh1 = graph.add_node(quad("mesh1", 2));
    Scene {
        graph,
        camera,
        mesh0,
        mesh1,
    }
}

fn prepared(scene: &Scene, alignment: u64) -> TestRenderer {
    let mut renderer = SceneRenderer::new(HostBufferHost::new(alignment), HeadlessPacer::new(2));
    renderer.prepare(&scene.graph).expect("prepare");
    renderer
}

fn dynamic_counts(renderer: &TestRenderer) -> (usize, usize) {
    let buffer = renderer.synchronizer().expect("prepared").dynamic_buffer();
    (buffer.write_count(), buffer.flush_count())
}

fn slot_bytes(renderer: &TestRenderer, id: NodeId) -> Vec<u8> {
    let sync = renderer.synchronizer().expect("prepared");
    let slot = sync.slot_of(id).expect("tracked actor");
    let start = sync.slot_offset(slot).expect("offset") as usize;
    let size = sync.block().slot_size();
    sync.dynamic_buffer().contents()[start..start + size].to_vec()
}

#[test]
fn test_first_frame_uploads_everything() {
    let mut scene = three_actor_scene();
    let mut renderer = prepared(&scene, 256);

    let stats = renderer.render_frame(&mut scene.graph, DT).expect("frame");
    assert_eq!(stats.frame, 0);
    assert!(stats.static_updated);
    assert_eq!(stats.sync.slots_written, vec![0, 1, 2]);
    assert!(stats.sync.flushed);
    assert_eq!(dynamic_counts(&renderer), (1, 1));
    assert!(!scene.graph.has_changes());
}

#[test]
fn test_single_mutation_writes_one_slot() {
    let mut scene = three_actor_scene();
    let mut renderer = prepared(&scene, 256);
    renderer.render_frame(&mut scene.graph, DT).expect("frame");

    let camera_before = slot_bytes(&renderer, scene.camera);
    let mesh0_before = slot_bytes(&renderer, scene.mesh0);

    scene
        .graph
        .actor_mut(scene.mesh1)
        .expect("actor")
        .translate(&Vec3::new(0.0, 1.0, 0.0));
    assert!(scene.graph.node(scene.mesh1).expect("node").is_changed());

    let stats = renderer.render_frame(&mut scene.graph, DT).expect("frame");
    assert_eq!(stats.sync.slots_written, vec![2]);
    assert!(stats.sync.flushed);
    assert!(!stats.static_updated);
    assert_eq!(dynamic_counts(&renderer), (2, 2));

    // One flush covers the whole block
    let sync = renderer.synchronizer().expect("prepared");
    let block_len = sync.block().len() as u64;
    assert_eq!(sync.dynamic_buffer().flushed_ranges().last(), Some(&(0, block_len)));

    // Clean slots keep what was staged before
    assert_eq!(slot_bytes(&renderer, scene.camera), camera_before);
    assert_eq!(slot_bytes(&renderer, scene.mesh0), mesh0_before);
    assert_ne!(slot_bytes(&renderer, scene.mesh1), mesh0_before);

    for id in [scene.camera, scene.mesh0, scene.mesh1] {
        assert!(!scene.graph.node(id).expect("node").is_changed());
    }
}

#[test]
fn test_prepare_again_reuploads_clean_scene() {
    let mut scene = three_actor_scene();
    scene
        .graph
        .actor_mut(scene.mesh1)
        .expect("actor")
        .translate(&Vec3::new(2.0, 0.0, 0.0));
    let mut renderer = prepared(&scene, 256);
    renderer.render_frame(&mut scene.graph, DT).expect("frame");
    assert!(!scene.graph.has_changes());

    renderer.prepare(&scene.graph).expect("prepare again");
    let stats = renderer.render_frame(&mut scene.graph, DT).expect("frame");
    assert!(stats.static_updated);
    assert_eq!(stats.sync.slots_written, vec![0, 1, 2]);

    for id in [scene.camera, scene.mesh0, scene.mesh1] {
        let matrix = *scene.graph.actor(id).expect("actor").model_matrix();
        let expected: &[u8] = bytemuck::cast_slice(matrix.as_slice());
        assert_eq!(&slot_bytes(&renderer, id)[..MAT4_SIZE], expected);
    }

    let camera = scene.graph.camera(scene.camera).expect("camera");
    let static_buffer = renderer.synchronizer().expect("prepared").static_buffer();
    assert_eq!(static_buffer.contents(), StaticUniformData::from_camera(camera).as_bytes());
    assert!(static_buffer.contents().iter().any(|&byte| byte != 0));
}

#[test]
fn test_clean_frame_makes_no_buffer_calls() {
    let mut scene = three_actor_scene();
    let mut renderer = prepared(&scene, 64);
    renderer.render_frame(&mut scene.graph, DT).expect("frame");
    let static_writes = renderer.synchronizer().expect("prepared").static_buffer().write_count();

    let stats = renderer.render_frame(&mut scene.graph, DT).expect("frame");
    assert!(stats.sync.is_noop());
    assert!(!stats.static_updated);
    assert_eq!(dynamic_counts(&renderer), (1, 1));
    assert_eq!(
        renderer.synchronizer().expect("prepared").static_buffer().write_count(),
        static_writes
    );
}

#[test]
fn test_camera_cycle_reuploads_static_uniform() {
    let mut scene = three_actor_scene();
    let second = scene
        .graph
        .add_node(Camera::with_id("overview", 0.8, 16.0 / 9.0, 0.1, 100.0).expect("camera"));
    let mut renderer = prepared(&scene, 256);
    renderer.render_frame(&mut scene.graph, DT).expect("frame");
    assert_eq!(renderer.current_camera(), Some(scene.camera));

    assert_eq!(renderer.cycle_camera(&mut scene.graph).expect("cycle"), second);
    let stats = renderer.render_frame(&mut scene.graph, DT).expect("frame");
    assert!(stats.static_updated);

    assert_eq!(renderer.cycle_camera(&mut scene.graph).expect("cycle"), scene.camera);
}

#[test]
fn test_controller_moves_its_actor() {
    let mut scene = three_actor_scene();
    let mut renderer = prepared(&scene, 256);
    renderer.render_frame(&mut scene.graph, DT).expect("frame");

    renderer.controller_mut().set_actor(Some(scene.camera));
    renderer.controller_mut().set_movement(Movement::FORWARD);
    let stats = renderer.render_frame(&mut scene.graph, DT).expect("frame");

    assert!(stats.static_updated);
    assert_eq!(stats.sync.slots_written, vec![0]);
}

#[test]
fn test_flames_are_uploaded_every_frame() {
    let mut scene = three_actor_scene();
    let flame = scene.graph.add_node(Flame::with_id(
        "flame",
        FlameParams {
            particle_count: 16,
            ..FlameParams::default()
        },
    ));
    let mut renderer = prepared(&scene, 256);
    renderer.render_frame(&mut scene.graph, DT).expect("frame");

    let slot = renderer
        .synchronizer()
        .expect("prepared")
        .slot_of(flame)
        .expect("flame slot");
    let stats = renderer.render_frame(&mut scene.graph, DT).expect("frame");
    assert_eq!(stats.sync.slots_written, vec![slot]);
}

#[test]
fn test_geometry_and_materials_are_collected() {
    let scene = three_actor_scene();
    let renderer = prepared(&scene, 256);
    assert_eq!(renderer.material_count(), 3);
    assert_eq!(renderer.geometry().ranges.len(), 2);

    let vertices = renderer.vertex_buffer().expect("vertex buffer");
    assert_eq!(vertices.size(), renderer.geometry().vertex_bytes as u64);
    let indices = renderer.index_buffer().expect("index buffer");
    assert_eq!(indices.contents().len(), renderer.geometry().index_bytes);
    // static + dynamic + vertex + index
    assert_eq!(renderer.host().buffers_created(), 4);
}

#[test]
fn test_frame_before_prepare_fails() {
    let mut graph = SceneGraph::new("empty");
    let mut renderer: TestRenderer =
        SceneRenderer::new(HostBufferHost::new(256), HeadlessPacer::new(2));
    assert!(matches!(
        renderer.render_frame(&mut graph, DT),
        Err(RenderError::NotPrepared)
    ));
}

#[test]
fn test_prepare_requires_camera() {
    let mut graph = SceneGraph::new("no camera");
    graph.add_node(quad("mesh", 1));
    let mut renderer: TestRenderer =
        SceneRenderer::new(HostBufferHost::new(256), HeadlessPacer::new(2));
    assert!(matches!(
        renderer.prepare(&graph),
        Err(RenderError::Scene(SceneError::CameraNotFound))
    ));
}
