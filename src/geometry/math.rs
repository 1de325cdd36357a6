use nalgebra::{SVector, Vector2, Vector3};

/// Signed area of the parallelogram spanned by (p - a) and (b - a).
///
/// The sign tells which side of the directed line a -> b the point p lies on.
/// The rasterizer uses it for the back-face test (applied to the triangle's
/// own vertices) and for point-in-triangle membership.
#[inline(always)]
pub fn edge_func(a: &Vector2<f32>, b: &Vector2<f32>, p: &Vector2<f32>) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Inclusive range clamp. `min` wins if the range is inverted.
#[inline(always)]
pub fn clamp<T: PartialOrd>(x: T, min: T, max: T) -> T {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Perspective-correct blend of a per-vertex attribute.
///
/// `weights` are the barycentric weights already multiplied by each vertex's
/// reciprocal depth, and `z_inv` is their sum.
#[inline(always)]
pub fn perspective_interpolate<const D: usize>(
    weights: &Vector3<f32>,
    z_inv: f32,
    values: &[SVector<f32, D>; 3],
) -> SVector<f32, D> {
    (values[0] * weights.x + values[1] * weights.y + values[2] * weights.z) / z_inv
}

/// Plain screen-space blend, to compare against the perspective-correct path.
#[cfg(test)]
pub fn linear_interpolate<const D: usize>(
    bary: &Vector3<f32>,
    values: &[SVector<f32, D>; 3],
) -> SVector<f32, D> {
    values[0] * bary.x + values[1] * bary.y + values[2] * bary.z
}
