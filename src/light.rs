//! Light sources
//!
//! Lights are a closed variant set. Only directional lights contribute to
//! shading; point and spot lights are carried as data but have no
//! intensity function yet.

use crate::math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Directional light, defined by the direction the light travels toward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub dir: Vec3,
}

impl DirectionalLight {
    pub fn new(dir: Vec3) -> Self {
        Self { dir: dir.normalize() }
    }

    /// Lambertian intensity of this light on a surface with the given
    /// unit normal, in [0, 1]. A face oriented against the light
    /// direction receives full intensity; a face turned away receives
    /// zero.
    pub fn intensity(&self, surface_normal: Vec3) -> f32 {
        (-surface_normal.dot(self.dir)).max(0.0)
    }
}

/// Point light. Inert: no shading contribution yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointLight {
    pub pos: Vec3,
}

impl PointLight {
    pub fn new(pos: Vec3) -> Self {
        Self { pos }
    }
}

/// Spot light. Inert: no shading contribution yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpotLight {
    pub pos: Vec3,
    pub dir: Vec3,
    /// Cone half-angle in radians
    pub angle: f32,
}

impl SpotLight {
    pub fn new(pos: Vec3, dir: Vec3, angle: f32) -> Self {
        Self { pos, dir, angle }
    }
}

/// Any light that can be added to a scene
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

/// Which per-kind collection a light lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

impl LightKind {
    fn tag(self) -> &'static str {
        match self {
            LightKind::Directional => "d",
            LightKind::Point => "p",
            LightKind::Spot => "s",
        }
    }
}

/// Tagged light handle: a kind plus the position in that kind's
/// collection. Renders as `d_0` / `p_1` / `s_2` for interop with
/// string-keyed callers. Positional like every other scene reference, so
/// removal invalidates later ids of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightId {
    pub kind: LightKind,
    pub index: usize,
}

impl LightId {
    pub fn new(kind: LightKind, index: usize) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.tag(), self.index)
    }
}

impl FromStr for LightId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, idx) = s
            .split_once('_')
            .ok_or_else(|| format!("Invalid light ID: {}", s))?;
        let kind = match tag {
            "d" => LightKind::Directional,
            "p" => LightKind::Point,
            "s" => LightKind::Spot,
            _ => return Err(format!("Invalid light type tag: {}", tag)),
        };
        let index = idx
            .parse::<usize>()
            .map_err(|_| format!("Invalid light index: {}", idx))?;
        Ok(LightId { kind, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_intensity_facing_light() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0));
        assert!((light.intensity(Vec3::new(0.0, 0.0, 1.0)) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_intensity_facing_away() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0));
        assert!(light.intensity(Vec3::new(0.0, 0.0, -1.0)).abs() < EPS);
    }

    #[test]
    fn test_intensity_grazing() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0));
        assert!(light.intensity(Vec3::new(1.0, 0.0, 0.0)).abs() < EPS);
    }

    #[test]
    fn test_direction_normalized_at_construction() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -10.0));
        assert!((light.dir.len() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_light_id_roundtrip() {
        for id in [
            LightId::new(LightKind::Directional, 0),
            LightId::new(LightKind::Point, 3),
            LightId::new(LightKind::Spot, 12),
        ] {
            assert_eq!(id.to_string().parse::<LightId>().unwrap(), id);
        }
    }

    #[test]
    fn test_light_id_rejects_bad_tag() {
        assert!("x_0".parse::<LightId>().is_err());
        assert!("d0".parse::<LightId>().is_err());
        assert!("d_q".parse::<LightId>().is_err());
    }
}
