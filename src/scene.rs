//! Scene loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files: a
//! resolution, cameras, lights, and model descriptions that instantiate
//! into a populated [`Engine`].

use crate::camera::Camera;
use crate::engine::Engine;
use crate::light::Light;
use crate::math::{build_rotation_deg, build_scale, build_translation, condense_transforms, Axis, Vec3};
use crate::mesh::{load_mesh, Mesh, MeshError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    MeshError(MeshError),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl From<MeshError> for SceneError {
    fn from(e: MeshError) -> Self {
        SceneError::MeshError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            SceneError::MeshError(e) => write!(f, "Mesh error: {}", e),
        }
    }
}

/// Where a model's geometry comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MeshSource {
    /// Built-in unit cube, no asset file needed
    Cube,
    /// Wavefront .obj file path
    Obj(String),
}

/// One model in a scene file, with an optional initial transform.
/// Transforms apply in scale, rotate (X then Y then Z), translate order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub source: MeshSource,
    #[serde(default)]
    pub scale: Option<Vec3>,
    #[serde(default)]
    pub rotate_deg: Option<Vec3>,
    #[serde(default)]
    pub translate: Option<Vec3>,
}

/// Camera description in a scene file
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraConfig {
    pub pos: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraConfig {
    pub fn to_camera(self) -> Camera {
        Camera::looking_at(self.pos, self.target, self.up, self.fov, self.near, self.far)
    }
}

/// A complete scene description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    /// Output resolution (width, height) in character cells
    pub resolution: (usize, usize),
    pub cameras: Vec<CameraConfig>,
    #[serde(default)]
    pub lights: Vec<Light>,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl SceneFile {
    /// Instantiate the scene into a populated engine.
    pub fn build_engine(&self) -> Result<Engine, SceneError> {
        let mut engine = Engine::new(self.resolution.0, self.resolution.1);

        for config in &self.models {
            let mut mesh = match &config.source {
                MeshSource::Cube => Mesh::unit_cube(),
                MeshSource::Obj(path) => load_mesh(path)?,
            };

            let mut transforms = Vec::new();
            if let Some(s) = config.scale {
                transforms.push(build_scale(s.x, s.y, s.z));
            }
            if let Some(r) = config.rotate_deg {
                transforms.push(build_rotation_deg(r.x, Axis::X));
                transforms.push(build_rotation_deg(r.y, Axis::Y));
                transforms.push(build_rotation_deg(r.z, Axis::Z));
            }
            if let Some(t) = config.translate {
                transforms.push(build_translation(t.x, t.y, t.z));
            }
            if !transforms.is_empty() {
                mesh.apply_transform(&condense_transforms(&transforms));
            }

            engine.add_mesh(mesh);
        }

        for camera in &self.cameras {
            engine.add_camera(camera.to_camera());
        }
        for light in &self.lights {
            engine.add_light(*light);
        }

        log::info!(
            "Built scene: {} models, {} cameras, {} lights at {}x{}",
            engine.mesh_count(),
            engine.camera_count(),
            engine.light_count(),
            self.resolution.0,
            self.resolution.1
        );
        Ok(engine)
    }
}

/// Load a scene from a RON file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneFile, SceneError> {
    let contents = fs::read_to_string(path)?;
    let scene: SceneFile = ron::from_str(&contents)?;
    Ok(scene)
}

/// Save a scene to a RON file.
pub fn save_scene<P: AsRef<Path>>(scene: &SceneFile, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a scene from a RON string (for embedded scenes or testing).
pub fn load_scene_from_str(s: &str) -> Result<SceneFile, SceneError> {
    let scene: SceneFile = ron::from_str(s)?;
    Ok(scene)
}
