use crate::geometry::rotation::Rotation;
use nalgebra::Vector3;
use std::f32::consts::PI;

/// Horizontal field of view used when nothing else is configured (120 degrees).
pub const DEFAULT_FOV: f32 = 2.0 * PI / 3.0;

/// Pinhole camera. Looks down its local +z axis, +x to the right, +y up the
/// screen's row axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub offset: Vector3<f32>,
    pub rotation: Rotation,
    /// Horizontal field of view in radians.
    pub fov: f32,
}

impl Camera {
    pub fn new(offset: Vector3<f32>, rotation: Rotation, fov: f32) -> Self {
        Camera {
            offset,
            rotation,
            fov,
        }
    }

    pub fn right(&self) -> Vector3<f32> {
        self.rotation.i()
    }

    pub fn up(&self) -> Vector3<f32> {
        self.rotation.j()
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.k()
    }

    pub fn translate(&mut self, delta: &Vector3<f32>) {
        self.offset += delta;
    }

    /// Changing the fov leaves any renderer's cached projection stale until
    /// `Renderer::refresh_projection` is called.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
    }

    /// World-space point expressed in the camera's local frame.
    #[inline]
    pub fn to_view(&self, p: &Vector3<f32>) -> Vector3<f32> {
        self.rotation.apply_inv(&(p - self.offset))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(Vector3::zeros(), Rotation::identity(), DEFAULT_FOV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_positive_z() {
        let cam = Camera::default();
        assert_eq!(cam.forward(), Vector3::z());
        assert_eq!(cam.right(), Vector3::x());
        assert!((cam.fov - DEFAULT_FOV).abs() < 1e-6);

        let view = cam.to_view(&Vector3::new(1.0, 2.0, 5.0));
        assert!((view - Vector3::new(1.0, 2.0, 5.0)).norm() < 1e-6);
    }

    #[test]
    fn to_view_removes_offset_and_rotation() {
        let mut cam = Camera::default();
        cam.translate(&Vector3::new(0.0, 0.0, -3.0));
        cam.rotation.add_yaw(0.6);

        // a point straight ahead of the camera stays on the view axis
        let ahead = cam.offset + cam.forward() * 4.0;
        let view = cam.to_view(&ahead);
        assert!(view.x.abs() < 1e-5);
        assert!(view.y.abs() < 1e-5);
        assert!((view.z - 4.0).abs() < 1e-5);

        let beside = cam.offset + cam.right() * 2.0;
        let view = cam.to_view(&beside);
        assert!((view - Vector3::new(2.0, 0.0, 0.0)).norm() < 1e-5);
    }
}
