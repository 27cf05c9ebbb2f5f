//! Render pipeline: scene state, frame buffers, and rasterization
//!
//! One `render` call runs the full software pipeline: view and projection
//! transform, perspective divide, screen mapping, back-face culling,
//! Bresenham edge walking, and depth-tested span filling. No frustum
//! clipping is performed; geometry outside the viewport is dropped by
//! per-pixel bounds checks, so polygons straddling the camera plane may
//! render incorrectly.

use crate::camera::{Camera, Projection};
use crate::light::{DirectionalLight, Light, LightId, LightKind, PointLight, SpotLight};
use crate::math::{Mat4, Vec4};
use crate::mesh::Mesh;
use std::collections::HashSet;

/// Error type for scene mutation and rendering
#[derive(Debug, PartialEq, Eq)]
pub enum EngineError {
    MeshIndex(usize),
    CameraIndex(usize),
    LightIndex(LightId),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MeshIndex(id) => write!(f, "Mesh ID {} out of range", id),
            EngineError::CameraIndex(id) => write!(f, "Camera ID {} out of range", id),
            EngineError::LightIndex(id) => write!(f, "Light ID {} out of range", id),
        }
    }
}

/// Intensity and depth buffers for one output frame.
///
/// Intensity is in [0, 1]; depth starts at negative infinity and larger
/// values are closer to the camera (matching the sign the projection
/// matrix gives post-divide z). Both are fully rewritten every render.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    intensity: Vec<f32>,
    depth: Vec<f32>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            intensity: vec![0.0; width * height],
            depth: vec![f32::NEG_INFINITY; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.intensity.fill(0.0);
        self.depth.fill(f32::NEG_INFINITY);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major intensity values, `height * width` long
    pub fn intensity(&self) -> &[f32] {
        &self.intensity
    }

    pub fn intensity_at(&self, x: usize, y: usize) -> f32 {
        self.intensity[y * self.width + x]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    /// Depth-tested write: stores `value` and `z` only when the pixel is
    /// in bounds and `z` is strictly greater than the stored depth.
    fn plot(&mut self, x: i32, y: i32, z: f32, value: f32) -> bool {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            let idx = y as usize * self.width + x as usize;
            if z > self.depth[idx] {
                self.depth[idx] = z;
                self.intensity[idx] = value;
                return true;
            }
        }
        false
    }
}

/// A pixel produced by edge walking, with its interpolated depth
#[derive(Debug, Clone, Copy)]
struct EdgePoint {
    x: i32,
    y: i32,
    z: f32,
}

/// The software render pipeline.
///
/// Owns the scene (meshes, cameras, lights) and the output frame.
/// Entities are referenced by position in their collection; removing one
/// shifts later indices down, so callers must not cache indices across
/// removals. Strictly single-threaded: `render` runs to completion and
/// mutates the frame in place.
pub struct Engine {
    meshes: Vec<Mesh>,
    cameras: Vec<Camera>,
    directional_lights: Vec<DirectionalLight>,
    point_lights: Vec<PointLight>,
    spot_lights: Vec<SpotLight>,
    frame: Frame,
    aspect_ratio: f32,
}

impl Engine {
    /// Create an engine rendering at the given resolution (width,
    /// height) in character cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            meshes: Vec::new(),
            cameras: Vec::new(),
            directional_lights: Vec::new(),
            point_lights: Vec::new(),
            spot_lights: Vec::new(),
            frame: Frame::new(width, height),
            aspect_ratio: width as f32 / height as f32,
        }
    }

    /// Add a mesh to the scene, returning its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Remove a mesh; later mesh indices shift down by one.
    pub fn remove_mesh(&mut self, id: usize) -> Result<(), EngineError> {
        if id >= self.meshes.len() {
            return Err(EngineError::MeshIndex(id));
        }
        self.meshes.remove(id);
        Ok(())
    }

    /// Apply a transform to a scene mesh in place (normals recomputed).
    pub fn transform_mesh(&mut self, id: usize, t: &Mat4) -> Result<(), EngineError> {
        let mesh = self.meshes.get_mut(id).ok_or(EngineError::MeshIndex(id))?;
        mesh.apply_transform(t);
        Ok(())
    }

    pub fn mesh(&self, id: usize) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Add a camera to the scene, returning its index.
    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    /// Remove a camera; later camera indices shift down by one.
    pub fn remove_camera(&mut self, id: usize) -> Result<(), EngineError> {
        if id >= self.cameras.len() {
            return Err(EngineError::CameraIndex(id));
        }
        self.cameras.remove(id);
        Ok(())
    }

    pub fn camera(&self, id: usize) -> Option<&Camera> {
        self.cameras.get(id)
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Add a light, returning its tagged id (`d_N` / `p_N` / `s_N`).
    pub fn add_light(&mut self, light: Light) -> LightId {
        match light {
            Light::Directional(l) => {
                self.directional_lights.push(l);
                LightId::new(LightKind::Directional, self.directional_lights.len() - 1)
            }
            Light::Point(l) => {
                self.point_lights.push(l);
                LightId::new(LightKind::Point, self.point_lights.len() - 1)
            }
            Light::Spot(l) => {
                self.spot_lights.push(l);
                LightId::new(LightKind::Spot, self.spot_lights.len() - 1)
            }
        }
    }

    /// Remove a light by tagged id; later ids of the same kind shift
    /// down by one.
    pub fn remove_light(&mut self, id: LightId) -> Result<(), EngineError> {
        let len = match id.kind {
            LightKind::Directional => self.directional_lights.len(),
            LightKind::Point => self.point_lights.len(),
            LightKind::Spot => self.spot_lights.len(),
        };
        if id.index >= len {
            return Err(EngineError::LightIndex(id));
        }
        match id.kind {
            LightKind::Directional => {
                self.directional_lights.remove(id.index);
            }
            LightKind::Point => {
                self.point_lights.remove(id.index);
            }
            LightKind::Spot => {
                self.spot_lights.remove(id.index);
            }
        }
        Ok(())
    }

    pub fn light_count(&self) -> usize {
        self.directional_lights.len() + self.point_lights.len() + self.spot_lights.len()
    }

    /// The output frame from the last successful render.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Render one frame with the given camera and projection kind.
    ///
    /// Clears both buffers, then for every mesh: transforms an ephemeral
    /// copy of its vertices to clip space, perspective-divides, maps to
    /// screen coordinates (top-left origin, y flipped), and rasterizes
    /// every face that survives back-face culling. A failed call (bad
    /// camera id) leaves the buffers from the previous successful frame.
    pub fn render(&mut self, camera_id: usize, projection: Projection) -> Result<(), EngineError> {
        let camera = *self
            .cameras
            .get(camera_id)
            .ok_or(EngineError::CameraIndex(camera_id))?;

        self.frame.clear();

        let view = camera.view_matrix();
        let proj = camera.projection_matrix(self.aspect_ratio, projection);
        let t = proj * view;

        let frame = &mut self.frame;
        let width = frame.width as f32;
        let height = frame.height as f32;

        for mesh in &self.meshes {
            // Ephemeral per-frame vertex copy; the scene mesh is never
            // touched by the view/projection transform.
            let mut screen: Vec<(i32, i32)> = Vec::with_capacity(mesh.vertex_count());
            let mut depths: Vec<f32> = Vec::with_capacity(mesh.vertex_count());
            for v in &mesh.vertices {
                let clip = t.transform(*v);
                // Perspective divide. No clipping first: w <= 0 vertices
                // produce out-of-range coordinates that the per-pixel
                // bounds checks reject.
                let ndc = Vec4::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w, 1.0);
                let sx = (ndc.x + 1.0) / 2.0 * width;
                let sy = height - (ndc.y + 1.0) / 2.0 * height;
                let sz = (ndc.z + 1.0) / 2.0;
                screen.push((to_screen_coord(sx), to_screen_coord(sy)));
                depths.push(sz);
            }

            for (i, face) in mesh.faces.iter().enumerate() {
                // Back-face culling against the camera's world-space view
                // direction, using the mesh's stored normals.
                if mesh.normals[i].dot(camera.dir) >= 0.0 {
                    continue;
                }

                let [a, b, c] = *face;
                let (v0, v1, v2) = (screen[a], screen[b], screen[c]);
                let (z0, z1, z2) = (depths[a], depths[b], depths[c]);

                // Conservative early reject: skip the face when every
                // vertex is on-screen and strictly behind the stored
                // depth at its rounded position.
                if all_vertices_obscured(frame, &[(v0, z0), (v1, z1), (v2, z2)]) {
                    continue;
                }

                let mut seen: HashSet<(i32, i32)> = HashSet::new();
                let mut edge_pts: Vec<EdgePoint> = Vec::new();
                walk_edge(v0, v1, z0, z1, frame.width, frame.height, &mut seen, &mut edge_pts);
                walk_edge(v1, v2, z1, z2, frame.width, frame.height, &mut seen, &mut edge_pts);
                walk_edge(v2, v0, z2, z0, frame.width, frame.height, &mut seen, &mut edge_pts);

                let intensity = if self.directional_lights.is_empty() {
                    1.0
                } else {
                    let sum: f32 = self
                        .directional_lights
                        .iter()
                        .map(|l| l.intensity(mesh.normals[i]))
                        .sum();
                    sum / self.directional_lights.len() as f32
                };

                fill_spans(&mut edge_pts, frame, intensity);
            }
        }

        log::debug!(
            "rendered frame: {} meshes, {} directional lights, camera {}",
            self.meshes.len(),
            self.directional_lights.len(),
            camera_id
        );
        Ok(())
    }
}

/// Bound for rounded screen coordinates. Without near-plane clipping a
/// vertex with w near zero lands arbitrarily far off-screen; clamping
/// keeps the integer edge walk bounded. Anything past the limit is
/// off-screen regardless, so visible geometry is unaffected.
const COORD_LIMIT: f32 = 16_384.0;

fn to_screen_coord(v: f32) -> i32 {
    if v.is_finite() {
        v.round().clamp(-COORD_LIMIT, COORD_LIMIT) as i32
    } else {
        COORD_LIMIT as i32
    }
}

fn all_vertices_obscured(frame: &Frame, vertices: &[((i32, i32), f32); 3]) -> bool {
    vertices.iter().all(|&((x, y), z)| {
        x >= 0
            && (x as usize) < frame.width
            && y >= 0
            && (y as usize) < frame.height
            && z < frame.depth_at(x as usize, y as usize)
    })
}

/// Trace the pixels of one triangle edge with Bresenham stepping,
/// interpolating depth linearly over the number of steps taken. Pixels
/// already visited by an earlier edge of the same face are skipped, as
/// are pixels outside the frame.
fn walk_edge(
    p0: (i32, i32),
    p1: (i32, i32),
    z0: f32,
    z1: f32,
    width: usize,
    height: usize,
    seen: &mut HashSet<(i32, i32)>,
    out: &mut Vec<EdgePoint>,
) {
    let (mut x, mut y) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };

    // Depth step per pixel step along the dominant axis. This
    // parameterizes by step count, not the edge's parametric t, so the
    // interpolation is an approximation rather than perspective-correct.
    let steps = dx.max(-dy);
    let dz = if steps == 0 { 0.0 } else { (z1 - z0) / steps as f32 };
    let mut z = z0;

    let mut err = dx + dy;
    loop {
        if x >= 0 && (x as usize) < width && y >= 0 && (y as usize) < height && seen.insert((x, y))
        {
            out.push(EdgePoint { x, y, z });
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        z += dz;
    }
}

/// Fill the horizontal spans between a face's edge pixels.
///
/// Groups edge pixels by row; each row's inclusive [min x, max x] span is
/// filled with depth interpolated linearly between the endpoint depths,
/// written through the greater-wins depth test.
fn fill_spans(pts: &mut [EdgePoint], frame: &mut Frame, intensity: f32) {
    pts.sort_by(|a, b| (a.y, a.x).cmp(&(b.y, b.x)));

    let mut i = 0;
    while i < pts.len() {
        let y = pts[i].y;
        let mut j = i;
        while j < pts.len() && pts[j].y == y {
            j += 1;
        }

        let first = pts[i];
        let last = pts[j - 1];
        if first.x == last.x {
            frame.plot(first.x, y, first.z, intensity);
        } else {
            let span = (last.x - first.x) as f32;
            for x in first.x..=last.x {
                let frac = (x - first.x) as f32 / span;
                let z = first.z + (last.z - first.z) * frac;
                frame.plot(x, y, z, intensity);
            }
        }

        i = j;
    }
}
