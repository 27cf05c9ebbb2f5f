//! termraster: software 3D rasterizer for character-cell terminals
//!
//! Renders polygonal meshes into a shaded 2D intensity buffer entirely in
//! software: view/projection transform, perspective divide, back-face
//! culling, Bresenham edge walking, depth-tested span filling. A
//! presentation surface quantizes the buffer into a character ramp for
//! terminal display.
//!
//! Known limitations, kept deliberately:
//! - No frustum clipping: off-screen geometry is rejected per-pixel, so
//!   polygons straddling the camera plane can render incorrectly.
//! - Orthographic projection is an API option but not implemented.
//! - Point and spot lights are data-only; only directional lights shade.

pub mod camera;
pub mod display;
pub mod engine;
pub mod light;
pub mod math;
pub mod mesh;
pub mod scene;

pub use camera::{Camera, Projection};
pub use display::{Display, DisplayError};
pub use engine::{Engine, EngineError, Frame};
pub use light::{DirectionalLight, Light, LightId, LightKind, PointLight, SpotLight};
pub use math::{Mat4, Vec3, Vec4};
pub use mesh::{load_mesh, Mesh, MeshError};
pub use scene::{load_scene, save_scene, SceneError, SceneFile};
