//! Mesh entity: homogeneous vertices, triangle faces, per-face normals
//!
//! Vertices are stored as homogeneous points (w = 1 at load time) so the
//! whole transform pipeline is plain 4x4 matrix application. Normals are
//! derived from vertex positions and recomputed after every transform
//! unless the caller explicitly keeps them (valid for transforms that
//! preserve direction, e.g. pure translation).

use crate::math::{Mat4, Vec3, Vec4};
use std::fs;
use std::path::Path;

/// Error type for mesh construction and .obj loading
#[derive(Debug)]
pub enum MeshError {
    IoError(std::io::Error),
    /// Unparseable `v `/`f ` line (1-based line number, message)
    ParseError(usize, String),
    /// Face references a vertex index outside the vertex list
    FaceIndex { face: usize, index: usize, vertex_count: usize },
}

impl From<std::io::Error> for MeshError {
    fn from(e: std::io::Error) -> Self {
        MeshError::IoError(e)
    }
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::IoError(e) => write!(f, "IO error: {}", e),
            MeshError::ParseError(line, msg) => write!(f, "Parse error on line {}: {}", line, msg),
            MeshError::FaceIndex { face, index, vertex_count } => write!(
                f,
                "Face {} references vertex {} but mesh has {} vertices",
                face, index, vertex_count
            ),
        }
    }
}

/// A triangle mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Homogeneous vertex positions
    pub vertices: Vec<Vec4>,
    /// Triangle faces, three vertex indices each
    pub faces: Vec<[usize; 3]>,
    /// Per-face unit normals, one per face
    pub normals: Vec<Vec3>,
}

impl Mesh {
    /// Build a mesh from vertices and faces, validating every face index
    /// and computing per-face normals. Winding order of the indices
    /// determines the normal sign; sources must wind consistently.
    pub fn new(vertices: Vec<Vec4>, faces: Vec<[usize; 3]>) -> Result<Self, MeshError> {
        for (fi, face) in faces.iter().enumerate() {
            for &vi in face {
                if vi >= vertices.len() {
                    return Err(MeshError::FaceIndex {
                        face: fi,
                        index: vi,
                        vertex_count: vertices.len(),
                    });
                }
            }
        }
        let mut mesh = Self { vertices, faces, normals: Vec::new() };
        mesh.compute_normals();
        Ok(mesh)
    }

    /// Recompute per-face normals from the current vertex positions.
    ///
    /// Per face, the cross product of the two edge vectors from its
    /// first vertex (homogeneous coordinate dropped), normalized.
    pub fn compute_normals(&mut self) {
        self.normals.clear();
        self.normals.reserve(self.faces.len());
        for face in &self.faces {
            let v0 = self.vertices[face[0]].xyz();
            let v1 = self.vertices[face[1]].xyz();
            let v2 = self.vertices[face[2]].xyz();
            self.normals.push((v1 - v0).cross(v2 - v0).normalize());
        }
    }

    /// Map every vertex through `t` and recompute normals.
    pub fn apply_transform(&mut self, t: &Mat4) {
        for v in &mut self.vertices {
            *v = t.transform(*v);
        }
        self.compute_normals();
    }

    /// Map every vertex through `t`, keeping the stored normals.
    /// Only correct for transforms that preserve face directions.
    pub fn apply_transform_keep_normals(&mut self, t: &Mat4) {
        for v in &mut self.vertices {
            *v = t.transform(*v);
        }
    }

    /// Translate every vertex by `d`, leaving w untouched. Normals are
    /// unaffected by translation and kept as-is.
    pub fn apply_translate(&mut self, d: Vec3) {
        for v in &mut self.vertices {
            v.x += d.x;
            v.y += d.y;
            v.z += d.z;
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned unit cube centered at the origin (side length 1),
    /// 12 triangles wound counter-clockwise seen from outside, so the
    /// computed normals face outward.
    pub fn unit_cube() -> Self {
        let s = 0.5;
        let vertices = vec![
            Vec4::new(-s, -s, -s, 1.0),
            Vec4::new(s, -s, -s, 1.0),
            Vec4::new(s, s, -s, 1.0),
            Vec4::new(-s, s, -s, 1.0),
            Vec4::new(-s, -s, s, 1.0),
            Vec4::new(s, -s, s, 1.0),
            Vec4::new(s, s, s, 1.0),
            Vec4::new(-s, s, s, 1.0),
        ];
        let faces = vec![
            [4, 5, 6], [4, 6, 7], // front (+z)
            [1, 0, 3], [1, 3, 2], // back (-z)
            [5, 1, 2], [5, 2, 6], // right (+x)
            [0, 4, 7], [0, 7, 3], // left (-x)
            [3, 7, 6], [3, 6, 2], // top (+y)
            [0, 1, 5], [0, 5, 4], // bottom (-y)
        ];
        // Indices are in range by construction
        Self::new(vertices, faces).unwrap()
    }
}

/// Load a mesh from a Wavefront .obj file.
///
/// Only `v ` and `f ` lines are read; everything else is ignored. Face
/// indices are 1-based in the file and converted to 0-based. Face tokens
/// of the form `i/uv/n` are read up to the first slash.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let mesh = load_mesh_from_str(&contents)?;
    log::info!(
        "Loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Parse .obj text (for embedded meshes or testing).
pub fn load_mesh_from_str(contents: &str) -> Result<Mesh, MeshError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (i, line) in contents.lines().enumerate() {
        let lineno = i + 1;
        if let Some(rest) = line.strip_prefix("v ") {
            let coords: Result<Vec<f32>, _> =
                rest.split_whitespace().map(str::parse::<f32>).collect();
            let coords =
                coords.map_err(|e| MeshError::ParseError(lineno, format!("bad vertex: {}", e)))?;
            if coords.len() != 3 {
                return Err(MeshError::ParseError(
                    lineno,
                    format!("expected 3 vertex coordinates, got {}", coords.len()),
                ));
            }
            vertices.push(Vec4::new(coords[0], coords[1], coords[2], 1.0));
        } else if let Some(rest) = line.strip_prefix("f ") {
            let indices: Result<Vec<usize>, MeshError> = rest
                .split_whitespace()
                .map(|token| {
                    // "3/1/2" style tokens carry uv/normal refs we don't use
                    let index_part = token.split('/').next().unwrap_or(token);
                    let parsed: i64 = index_part.parse().map_err(|e| {
                        MeshError::ParseError(lineno, format!("bad face index: {}", e))
                    })?;
                    if parsed < 1 {
                        return Err(MeshError::ParseError(
                            lineno,
                            format!("face index must be positive, got {}", parsed),
                        ));
                    }
                    Ok((parsed - 1) as usize)
                })
                .collect();
            let indices = indices?;
            if indices.len() != 3 {
                return Err(MeshError::ParseError(
                    lineno,
                    format!("only triangle faces are supported, got {} indices", indices.len()),
                ));
            }
            faces.push([indices[0], indices[1], indices[2]]);
        }
    }

    Mesh::new(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{build_rotation_deg, build_scale, build_translation, Axis};

    const EPS: f32 = 1e-5;

    const CUBE_OBJ: &str = "\
# simple quadless cube
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
f 5 6 7
f 5 7 8
f 2 1 4
f 2 4 3
f 6 2 3
f 6 3 7
f 1 5 8
f 1 8 4
f 4 8 7
f 4 7 3
f 1 2 6
f 1 6 5
";

    #[test]
    fn test_load_obj() {
        let mesh = load_mesh_from_str(CUBE_OBJ).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.normals.len(), 12);
        assert!((mesh.vertices[0].w - 1.0).abs() < EPS);
    }

    #[test]
    fn test_obj_skips_other_lines() {
        let mesh = load_mesh_from_str("vn 0 0 1\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_obj_slash_indices() {
        let mesh =
            load_mesh_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/1 3/3/1\n").unwrap();
        assert_eq!(mesh.faces[0], [0, 1, 2]);
    }

    #[test]
    fn test_obj_rejects_quads() {
        let err = load_mesh_from_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        assert!(matches!(err, Err(MeshError::ParseError(5, _))));
    }

    #[test]
    fn test_face_index_out_of_range() {
        let err = load_mesh_from_str("v 0 0 0\nv 1 0 0\nf 1 2 3\n");
        assert!(matches!(err, Err(MeshError::FaceIndex { .. })));
    }

    #[test]
    fn test_normals_unit_length() {
        let mesh = Mesh::unit_cube();
        for n in &mesh.normals {
            assert!((n.len() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_unit_cube_normals_outward() {
        let mesh = Mesh::unit_cube();
        // Each face's normal should point away from the cube center,
        // i.e. along the face centroid direction.
        for (face, n) in mesh.faces.iter().zip(&mesh.normals) {
            let c = (mesh.vertices[face[0]].xyz()
                + mesh.vertices[face[1]].xyz()
                + mesh.vertices[face[2]].xyz())
            .scale(1.0 / 3.0);
            assert!(c.dot(*n) > 0.0);
        }
    }

    #[test]
    fn test_translate_leaves_w() {
        let mut mesh = Mesh::unit_cube();
        mesh.apply_translate(Vec3::new(1.0, 2.0, 3.0));
        assert!((mesh.vertices[0].x - 0.5).abs() < EPS);
        assert!((mesh.vertices[0].w - 1.0).abs() < EPS);
    }

    #[test]
    fn test_transform_recomputes_normals() {
        let mut mesh = Mesh::unit_cube();
        let before = mesh.normals[0];
        mesh.apply_transform(&build_rotation_deg(90.0, Axis::Y));
        let after = mesh.normals[0];
        assert!((before.dot(after)).abs() < EPS); // rotated a quarter turn
        assert!((after.len() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_keep_normals_skips_recompute() {
        let mut mesh = Mesh::unit_cube();
        let before = mesh.normals.clone();
        mesh.apply_transform_keep_normals(&build_rotation_deg(90.0, Axis::Y));
        assert_eq!(mesh.normals, before);
    }

    #[test]
    fn test_sequential_transforms_match_condensed() {
        use crate::math::condense_transforms;

        let a = build_scale(2.0, 3.0, 4.0);
        let b = build_translation(1.0, -1.0, 0.5);

        let mut seq = Mesh::unit_cube();
        seq.apply_transform(&a);
        seq.apply_transform(&b);

        let mut combined = Mesh::unit_cube();
        combined.apply_transform(&condense_transforms(&[a, b]));

        for (u, v) in seq.vertices.iter().zip(&combined.vertices) {
            assert!((u.x - v.x).abs() < EPS);
            assert!((u.y - v.y).abs() < EPS);
            assert!((u.z - v.z).abs() < EPS);
            assert!((u.w - v.w).abs() < EPS);
        }
    }
}
