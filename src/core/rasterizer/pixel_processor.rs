use super::triangle_data::{BoundingBox, TriangleData};
use crate::core::render_target::RenderTarget;
use crate::geometry::math::perspective_interpolate;
use crate::material_system::color::{Color, to_rgba8};
use crate::material_system::light::Illumination;
use nalgebra::{Vector2, Vector3};

/// What happened to one triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    /// Back-facing or degenerate, nothing was touched.
    Culled,
    /// Passed the facing test; `pixels` passed the depth test and were written.
    Rasterized { pixels: usize },
}

/// Rasterizes a single triangle into `target`.
///
/// Pixels are sampled at their centers. A covered pixel is written only when
/// its interpolated reciprocal depth is strictly greater than the stored one,
/// and depth is updated in the same step, so the final image does not depend
/// on the order triangles arrive in.
pub fn rasterize_triangle<L: Illumination + ?Sized>(
    triangle: &TriangleData,
    target: &mut RenderTarget,
    light: &L,
) -> TriangleOutcome {
    let total = triangle.signed_area();
    // also rejects NaN areas
    if !(total > 0.0) {
        return TriangleOutcome::Culled;
    }

    let bbox = match BoundingBox::from_triangle(triangle, target.width(), target.height()) {
        Some(bbox) => bbox,
        None => return TriangleOutcome::Rasterized { pixels: 0 },
    };

    let inv_z = triangle.inv_z();
    let mut pixels = 0;

    bbox.for_each_pixel(|x, y| {
        let pixel_center = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
        let Some(bary) = triangle.coverage(&pixel_center, total) else {
            return;
        };

        let weights = bary.component_mul(&inv_z);
        let z_inv = weights.sum();

        let Some(current) = target.depth(x, y) else {
            return;
        };
        if !(z_inv > current) {
            return;
        }

        let color = shade_pixel(triangle, &weights, z_inv, light);
        if target.write(x, y, to_rgba8(&color), z_inv) {
            pixels += 1;
        }
    });

    TriangleOutcome::Rasterized { pixels }
}

/// Texture lookup at the perspective-correct UV, scaled by the illumination
/// of the perspective-correct, renormalized normal.
#[inline]
pub fn shade_pixel<L: Illumination + ?Sized>(
    triangle: &TriangleData,
    weights: &Vector3<f32>,
    z_inv: f32,
    light: &L,
) -> Color {
    let uv = perspective_interpolate(weights, z_inv, &triangle.texcoords());
    let texel = triangle.texture.sample(&uv);

    let normal = perspective_interpolate(weights, z_inv, &triangle.normals());
    let normal = normal.try_normalize(f32::EPSILON).unwrap_or(normal);

    texel * light.intensity(&normal)
}
