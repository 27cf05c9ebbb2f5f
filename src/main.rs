//! Demo binary: a spinning, lit cube in the terminal.
//!
//! With no arguments, renders a built-in scene. Pass a RON scene file
//! path to render that instead (the first model spins, the first camera
//! is used). Terminate with Ctrl+C.

use std::time::Duration;
use termraster::display::{clear_terminal, Display};
use termraster::math::{build_rotation_deg, Axis, Vec3};
use termraster::scene::{CameraConfig, MeshSource, ModelConfig, SceneFile};
use termraster::{DirectionalLight, Light, Projection};

const UPS: f32 = 30.0;

fn builtin_scene() -> SceneFile {
    SceneFile {
        resolution: (60, 30),
        cameras: vec![CameraConfig {
            pos: Vec3::new(0.0, 0.0, 30.0),
            target: Vec3::ZERO,
            up: Vec3::UP,
            fov: 1.0472,
            near: 0.1,
            far: 100.0,
        }],
        lights: vec![Light::Directional(DirectionalLight::new(Vec3::new(
            -0.4, -0.3, -1.0,
        )))],
        models: vec![ModelConfig {
            source: MeshSource::Cube,
            scale: Some(Vec3::new(8.0, 8.0, 8.0)),
            rotate_deg: Some(Vec3::new(20.0, 0.0, 0.0)),
            translate: None,
        }],
    }
}

fn main() {
    env_logger::init();

    let scene = match std::env::args().nth(1) {
        Some(path) => match termraster::load_scene(&path) {
            Ok(scene) => scene,
            Err(e) => {
                eprintln!("Failed to load scene {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => builtin_scene(),
    };

    let mut engine = match scene.build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to build scene: {}", e);
            std::process::exit(1);
        }
    };
    let mut display = Display::new(scene.resolution.0, scene.resolution.1);

    if engine.camera_count() == 0 {
        eprintln!("Scene has no cameras");
        std::process::exit(1);
    }

    if let Err(e) = clear_terminal() {
        eprintln!("Terminal error: {}", e);
        std::process::exit(1);
    }

    let spin = build_rotation_deg(2.0, Axis::Y);
    let frame_time = Duration::from_secs_f32(1.0 / UPS);

    loop {
        if engine.mesh_count() > 0 {
            // Mesh 0 exists, so the transform cannot fail
            engine.transform_mesh(0, &spin).unwrap();
        }
        if let Err(e) = engine.render(0, Projection::Perspective) {
            eprintln!("Render failed: {}", e);
            std::process::exit(1);
        }
        let shown = display
            .update_buffer(engine.frame())
            .and_then(|_| display.render_buffer());
        if let Err(e) = shown {
            eprintln!("Display failed: {}", e);
            std::process::exit(1);
        }
        std::thread::sleep(frame_time);
    }
}
