use nalgebra::{Matrix3, Vector3};

/// Orientation stored as two angles plus the orthonormal basis derived from them.
///
/// The basis columns are the local axes {i, j, k} expressed in the parent frame.
/// Because the basis is orthonormal its inverse is simply the transpose, which
/// is cached next to it so `apply_inv` costs the same as `apply`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    yaw: f32,
    pitch: f32,
    basis: Matrix3<f32>,
    inverse: Matrix3<f32>,
}

/// Yaw about the vertical axis, then pitch about the yawed horizontal axis.
///
/// Equivalent to `R_y(-yaw) * R_x(-pitch)`.
fn basis_from_angles(yaw: f32, pitch: f32) -> Matrix3<f32> {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();

    let i = Vector3::new(cy, 0.0, sy);
    let j = Vector3::new(sy * sp, cp, -cy * sp);
    let k = Vector3::new(-sy * cp, sp, cy * cp);

    Matrix3::from_columns(&[i, j, k])
}

impl Rotation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let basis = basis_from_angles(yaw, pitch);
        Rotation {
            yaw,
            pitch,
            basis,
            inverse: basis.transpose(),
        }
    }

    pub fn identity() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Local x axis in the parent frame.
    pub fn i(&self) -> Vector3<f32> {
        self.basis.column(0).into_owned()
    }

    /// Local y axis in the parent frame.
    pub fn j(&self) -> Vector3<f32> {
        self.basis.column(1).into_owned()
    }

    /// Local z axis in the parent frame.
    pub fn k(&self) -> Vector3<f32> {
        self.basis.column(2).into_owned()
    }

    #[cfg(test)]
    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.basis
    }

    /// Maps a local vector into the parent frame.
    #[inline]
    pub fn apply(&self, v: &Vector3<f32>) -> Vector3<f32> {
        self.basis * v
    }

    /// Maps a parent-frame vector into the local frame.
    #[inline]
    pub fn apply_inv(&self, v: &Vector3<f32>) -> Vector3<f32> {
        self.inverse * v
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw += delta;
        self.rebuild();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.pitch += delta;
        self.rebuild();
    }

    // Always recomputed from the angles, never accumulated, so no drift.
    fn rebuild(&mut self) {
        self.basis = basis_from_angles(self.yaw, self.pitch);
        self.inverse = self.basis.transpose();
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}
