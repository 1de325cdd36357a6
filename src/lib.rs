//! CPU rasterizer for textured triangle meshes under a pinhole camera.
//!
//! Triangles are projected with a cached pixels-per-world-unit factor, covered
//! with edge functions at pixel centers, depth-tested on reciprocal depth and
//! shaded with perspective-correct texture coordinates and normals.

pub mod core;
pub mod geometry;
pub mod io;
pub mod material_system;
pub mod utils;
