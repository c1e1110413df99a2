//! Headless flame demo
//!
//! Builds a small scene (two cameras, a cube, a floor and a flame emitter),
//! then renders a fixed number of frames against the in-memory buffer host,
//! logging how many uniform slots each frame had to upload.
//!
//! Usage: `flame_demo [config.toml|config.ron]`

mod geometry;

use scene_engine::config::{Config, ConfigError, DemoConfig};
use scene_engine::foundation::logging;
use scene_engine::foundation::math::{utils, Vec3};
use scene_engine::render::{HeadlessPacer, HostBufferHost, RenderError, SceneRenderer};
use scene_engine::scene::{ActorController, Camera, Flame, Movement, SceneError, SceneGraph};
use thiserror::Error;

/// Everything that can stop the demo
#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

fn load_config() -> Result<DemoConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            Ok(DemoConfig::load_from_file(&path)?)
        }
        None => Ok(DemoConfig::default()),
    }
}

fn build_scene(config: &DemoConfig) -> Result<SceneGraph, DemoError> {
    let mut graph = SceneGraph::new("flame_scene");

    let mut main_camera = Camera::with_id(
        "main_camera",
        utils::deg_to_rad(config.camera.fov_degrees),
        config.camera.aspect_ratio,
        config.camera.znear,
        config.camera.zfar,
    )?;
    main_camera.actor_mut().translate(&Vec3::new(0.0, -1.5, -6.0));
    graph.add_node(main_camera);

    let mut overview = Camera::with_id(
        "overview_camera",
        utils::deg_to_rad(config.camera.fov_degrees * 1.5),
        config.camera.aspect_ratio,
        config.camera.znear,
        config.camera.zfar,
    )?;
    overview.actor_mut().rotate(utils::deg_to_rad(30.0), &Vec3::x());
    overview.actor_mut().translate(&Vec3::new(0.0, -4.0, -12.0));
    graph.add_node(overview);

    let mut cube = geometry::cube("cube", 0.5)?;
    cube.actor_mut().translate(&Vec3::new(1.5, 0.5, 0.0));
    graph.add_node(cube);

    graph.add_node(geometry::floor("floor", 8.0)?);
    graph.add_node(Flame::with_id("flame", config.flame.clone()));

    Ok(graph)
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    log::info!("Starting {}", config.application_name);

    let mut graph = build_scene(&config)?;

    let mut controller =
        ActorController::new(config.controller.movement_speed, config.controller.rotation_speed);
    controller.set_actor(graph.find_by_id("main_camera"));

    let host = HostBufferHost::new(config.min_uniform_alignment);
    let pacer = HeadlessPacer::new(config.swapchain_images);
    let mut renderer = SceneRenderer::new(host, pacer).with_controller(controller);
    renderer.prepare(&graph)?;

    let mut slots_written = 0usize;
    let mut flushes = 0usize;

    for frame in 0..config.frame_count {
        // Walk forward for the first second, then strafe while looking around
        let movement = if frame < 60 {
            Movement::FORWARD
        } else if frame % 90 < 45 {
            Movement::LEFT
        } else {
            Movement::empty()
        };
        renderer.controller_mut().set_movement(movement);
        if movement.is_empty() && frame % 30 == 0 {
            renderer.controller().rotate(&mut graph, 4.0, 0.0)?;
        }

        let cycle = config.camera_cycle_interval;
        if cycle > 0 && frame > 0 && frame % cycle == 0 {
            let camera = renderer.cycle_camera(&mut graph)?;
            log::info!("Frame {frame}: switched to camera '{}'", graph.get(camera)?.id());
        }

        let stats = renderer.render_frame(&mut graph, config.frame_delta)?;
        slots_written += stats.sync.slots_written.len();
        flushes += usize::from(stats.sync.flushed);
        log::debug!(
            "Frame {} (image {}): slots {:?}, static {}",
            stats.frame,
            stats.image_index,
            stats.sync.slots_written,
            stats.static_updated
        );
    }

    log::info!(
        "Rendered {} frames: {} slot writes, {} flushes, {} materials, {} vertex bytes",
        renderer.timer().frame_count(),
        slots_written,
        flushes,
        renderer.material_count(),
        renderer.geometry().vertex_bytes
    );
    Ok(())
}

fn main() {
    logging::init();

    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("flame_demo failed: {err}");
        std::process::exit(1);
    }
}
