use crate::geometry::camera::Camera;
use nalgebra::Vector3;

/// Vertices closer to the camera plane than this are treated as unprojectable.
pub const MIN_VIEW_DEPTH: f32 = 1e-4;

/// Pixels covered by one world unit at camera-space depth 1, for a target
/// of the given width and a horizontal field of view in radians.
pub fn pixels_per_world_unit(width: usize, fov: f32) -> f32 {
    let screen_width_world = 2.0 * (fov / 2.0).tan();
    width as f32 / screen_width_world
}

/// Cached screen-space mapping for one target size and field of view.
///
/// Nothing here tracks the camera: if its fov changes, build a new projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub pixels_per_world_unit: f32,
    half_width: f32,
    half_height: f32,
}

impl Projection {
    pub fn new(width: usize, height: usize, fov: f32) -> Self {
        Projection {
            pixels_per_world_unit: pixels_per_world_unit(width, fov),
            half_width: width as f32 / 2.0,
            half_height: height as f32 / 2.0,
        }
    }

    /// Projects a world-space point to `(x, y, 1/z)`.
    ///
    /// Carrying the reciprocal depth in the third coordinate is what makes the
    /// later perspective-correct interpolation a single divide per attribute.
    /// A camera-space depth of zero yields non-finite coordinates.
    #[inline]
    pub fn world_to_screen(&self, camera: &Camera, p: &Vector3<f32>) -> Vector3<f32> {
        let view = camera.to_view(p);
        self.view_to_screen(&view)
    }

    #[inline]
    pub fn view_to_screen(&self, view: &Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            view.x * self.pixels_per_world_unit / view.z + self.half_width,
            view.y * self.pixels_per_world_unit / view.z + self.half_height,
            1.0 / view.z,
        )
    }
}

/// True when a camera-space depth can be projected.
#[inline]
pub fn is_projectable(view_z: f32) -> bool {
    view_z.is_finite() && view_z > MIN_VIEW_DEPTH
}
