//! Camera: view basis and projection matrices

use crate::math::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Projection kind selected per render call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    Perspective,
    /// Not implemented: produces the zero matrix. Kept in the API so
    /// callers can see the gap rather than get a silently wrong frame.
    Orthographic,
}

/// A scene camera.
///
/// `dir` and `up` are normalized at construction but are not forced to be
/// orthogonal to each other; the view basis is orthogonalized only when
/// [`Camera::view_matrix`] derives it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec3,
    pub dir: Vec3,
    pub up: Vec3,
    /// Field of view in radians, in (0, pi)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(pos: Vec3, dir: Vec3, up: Vec3, fov: f32, near: f32, far: f32) -> Self {
        Self {
            pos,
            dir: dir.normalize(),
            up: up.normalize(),
            fov,
            near,
            far,
        }
    }

    /// Camera at `pos` looking toward `target`.
    pub fn looking_at(pos: Vec3, target: Vec3, up: Vec3, fov: f32, near: f32, far: f32) -> Self {
        Self::new(pos, target - pos, up, fov, near, far)
    }

    /// Build the view matrix from the stored direction and up vectors.
    ///
    /// The orthonormal basis is derived fresh on every call (camera state
    /// may have changed): `right = normalize(dir x up)`,
    /// `true_up = normalize(right x dir)`. The camera looks down its
    /// negative local Z (right-handed convention).
    pub fn view_matrix(&self) -> Mat4 {
        let right = self.dir.cross(self.up).normalize();
        let up = right.cross(self.dir).normalize();

        Mat4::new([
            [right.x, right.y, right.z, -right.dot(self.pos)],
            [up.x, up.y, up.z, -up.dot(self.pos)],
            [-self.dir.x, -self.dir.y, -self.dir.z, self.dir.dot(self.pos)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Build the projection matrix.
    ///
    /// Perspective is the standard symmetric frustum with `w' = -z`.
    /// Orthographic is unimplemented and returns [`Mat4::ZERO`].
    pub fn projection_matrix(&self, aspect_ratio: f32, kind: Projection) -> Mat4 {
        match kind {
            Projection::Perspective => {
                let f = 1.0 / (self.fov / 2.0).tan();
                Mat4::new([
                    [f / aspect_ratio, 0.0, 0.0, 0.0],
                    [0.0, f, 0.0, 0.0],
                    [
                        0.0,
                        0.0,
                        (self.far + self.near) / (self.far - self.near),
                        (2.0 * self.far * self.near) / (self.far - self.near),
                    ],
                    [0.0, 0.0, -1.0, 0.0],
                ])
            }
            Projection::Orthographic => Mat4::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    const EPS: f32 = 1e-5;

    fn test_camera() -> Camera {
        Camera::looking_at(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Vec3::UP,
            1.0472,
            0.1,
            100.0,
        )
    }

    #[test]
    fn test_direction_normalized() {
        let cam = Camera::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(0.0, 3.0, 0.0),
            1.0,
            0.1,
            100.0,
        );
        assert!((cam.dir.len() - 1.0).abs() < EPS);
        assert!((cam.up.len() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_view_matrix_moves_camera_to_origin() {
        let cam = test_camera();
        let view = cam.view_matrix();
        let p = view.transform(Vec4::new(0.0, 0.0, 5.0, 1.0));
        assert!(p.x.abs() < EPS && p.y.abs() < EPS && p.z.abs() < EPS);
    }

    #[test]
    fn test_view_matrix_looks_down_negative_z() {
        let cam = test_camera();
        let view = cam.view_matrix();
        // The origin is 5 units in front of the camera
        let p = view.transform(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!((p.z + 5.0).abs() < EPS);
    }

    #[test]
    fn test_view_basis_orthogonalizes_skewed_up() {
        let cam = Camera::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.3, 1.0, 0.0), // deliberately not orthogonal to dir
            1.0,
            0.1,
            100.0,
        );
        let view = cam.view_matrix();
        let right = Vec3::new(view.m[0][0], view.m[0][1], view.m[0][2]);
        let up = Vec3::new(view.m[1][0], view.m[1][1], view.m[1][2]);
        let fwd = Vec3::new(view.m[2][0], view.m[2][1], view.m[2][2]);
        assert!(right.dot(up).abs() < EPS);
        assert!(right.dot(fwd).abs() < EPS);
        assert!(up.dot(fwd).abs() < EPS);
    }

    #[test]
    fn test_on_axis_point_projects_on_axis() {
        let cam = test_camera();
        let proj = cam.projection_matrix(2.0, Projection::Perspective);
        for d in [0.5, 1.0, 10.0, 99.0] {
            let clip = proj.transform(Vec4::new(0.0, 0.0, -d, 1.0));
            let ndc_x = clip.x / clip.w;
            let ndc_y = clip.y / clip.w;
            assert!(ndc_x.abs() < EPS && ndc_y.abs() < EPS);
        }
    }

    #[test]
    fn test_perspective_w_is_negated_z() {
        let cam = test_camera();
        let proj = cam.projection_matrix(1.0, Projection::Perspective);
        let clip = proj.transform(Vec4::new(0.3, -0.2, -7.0, 1.0));
        assert!((clip.w - 7.0).abs() < EPS);
    }

    #[test]
    fn test_orthographic_is_zero() {
        let cam = test_camera();
        assert_eq!(cam.projection_matrix(1.0, Projection::Orthographic), Mat4::ZERO);
    }
}
