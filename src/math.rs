//! Vector and matrix math for the render pipeline
//!
//! All matrices are 4x4, row-major, and act on column vectors (`M * v`).
//! Transform lists compose left-to-right via [`condense_transforms`].

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// Homogeneous point (w = 1 for positions at load time)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Lift a 3D point into homogeneous coordinates with w = 1.
    pub fn from_point(p: Vec3) -> Self {
        Self { x: p.x, y: p.y, z: p.z, w: 1.0 }
    }

    /// Drop the homogeneous coordinate.
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// 4x4 matrix, row-major
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const ZERO: Mat4 = Mat4 { m: [[0.0; 4]; 4] };

    pub fn new(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    /// Apply to a column vector: `M * v`.
    pub fn transform(&self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4 {
            x: m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3] * v.w,
            y: m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3] * v.w,
            z: m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3] * v.w,
            w: m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3] * v.w,
        }
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Mat4 { m: out }
    }
}

/// Principal axis, for rotation builders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Rotation matrix about a principal axis, angle in radians.
pub fn build_rotation(rad: f32, axis: Axis) -> Mat4 {
    let (s, c) = rad.sin_cos();
    match axis {
        Axis::X => Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]),
        Axis::Y => Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]),
        Axis::Z => Mat4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]),
    }
}

/// Rotation matrix about a principal axis, angle in degrees.
pub fn build_rotation_deg(deg: f32, axis: Axis) -> Mat4 {
    build_rotation(deg.to_radians(), axis)
}

pub fn build_translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
    Mat4::new([
        [1.0, 0.0, 0.0, tx],
        [0.0, 1.0, 0.0, ty],
        [0.0, 0.0, 1.0, tz],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn build_scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Mat4::new([
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, sz, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Condense an ordered list of transforms into one matrix.
///
/// Transforms are given in application order (first applied first): the
/// result of `condense_transforms(&[a, b])` applied to a vertex equals
/// applying `a` then `b`.
pub fn condense_transforms(transforms: &[Mat4]) -> Mat4 {
    transforms
        .iter()
        .rev()
        .fold(Mat4::IDENTITY, |acc, t| acc * *t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn vec4_close(a: Vec4, b: Vec4) -> bool {
        (a.x - b.x).abs() < EPS
            && (a.y - b.y).abs() < EPS
            && (a.z - b.z).abs() < EPS
            && (a.w - b.w).abs() < EPS
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < EPS);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_identity_transform() {
        let v = Vec4::new(1.0, -2.0, 3.0, 1.0);
        assert!(vec4_close(Mat4::IDENTITY.transform(v), v));
    }

    #[test]
    fn test_translation() {
        let t = build_translation(1.0, 2.0, 3.0);
        let v = t.transform(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!(vec4_close(v, Vec4::new(1.0, 2.0, 3.0, 1.0)));
    }

    #[test]
    fn test_translation_ignores_direction() {
        // w = 0 vectors are directions and must not pick up translation
        let t = build_translation(5.0, 5.0, 5.0);
        let v = t.transform(Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert!(vec4_close(v, Vec4::new(1.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotation_quarter_turn_z() {
        let r = build_rotation_deg(90.0, Axis::Z);
        let v = r.transform(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(vec4_close(v, Vec4::new(0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_rotation_quarter_turn_y() {
        let r = build_rotation_deg(90.0, Axis::Y);
        let v = r.transform(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(vec4_close(v, Vec4::new(0.0, 0.0, -1.0, 1.0)));
    }

    #[test]
    fn test_condense_order() {
        // Scale then translate is not translate then scale
        let s = build_scale(2.0, 2.0, 2.0);
        let t = build_translation(1.0, 0.0, 0.0);
        let st = condense_transforms(&[s, t]);
        let v = st.transform(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(vec4_close(v, Vec4::new(3.0, 0.0, 0.0, 1.0)));

        let ts = condense_transforms(&[t, s]);
        let v = ts.transform(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(vec4_close(v, Vec4::new(4.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_condense_matches_sequential() {
        let a = build_rotation_deg(30.0, Axis::X);
        let b = build_translation(0.5, -1.0, 2.0);
        let combined = condense_transforms(&[a, b]);
        let v = Vec4::new(0.3, 0.7, -1.2, 1.0);
        assert!(vec4_close(combined.transform(v), b.transform(a.transform(v))));
    }
}
