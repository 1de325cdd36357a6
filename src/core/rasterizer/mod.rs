//! # Triangle rasterization
//!
//! Edge-function coverage at pixel centers, reciprocal-depth z-buffering and
//! perspective-correct attribute interpolation.

pub mod pixel_processor;
pub mod triangle_data;

pub use pixel_processor::{TriangleOutcome, rasterize_triangle, shade_pixel};
pub use triangle_data::{BoundingBox, TriangleData, VertexRenderData};
