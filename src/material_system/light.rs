use crate::geometry::math::clamp;
use nalgebra::Vector3;

/// Local illumination function: maps a unit surface normal to a scalar that
/// multiplies the sampled texel color.
pub trait Illumination {
    fn intensity(&self, normal: &Vector3<f32>) -> f32;
}

/// Single directional light with an ambient floor.
///
/// `intensity = ambient + (1 - ambient) * clamp(dot(n, direction), 0, 1)`,
/// so no lit pixel is ever darker than `ambient`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector the normal is compared against.
    pub direction: Vector3<f32>,
    pub ambient: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>, ambient: f32) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
            ambient: clamp(ambient, 0.0, 1.0),
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        DirectionalLight {
            direction: Vector3::new(0.0, 0.0, -1.0),
            ambient: 0.5,
        }
    }
}

impl Illumination for DirectionalLight {
    #[inline]
    fn intensity(&self, normal: &Vector3<f32>) -> f32 {
        let lambert = clamp(normal.dot(&self.direction), 0.0, 1.0);
        self.ambient + (1.0 - self.ambient) * lambert
    }
}

/// Constant intensity, ignores the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unlit(pub f32);

impl Illumination for Unlit {
    #[inline]
    fn intensity(&self, _normal: &Vector3<f32>) -> f32 {
        self.0
    }
}
