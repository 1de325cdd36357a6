use crate::geometry::math::{clamp, edge_func};
use crate::material_system::texture::Texture;
use nalgebra::{Vector2, Vector3};

/// One projected vertex plus the attributes carried to the pixel stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexRenderData {
    /// Screen-space position in pixels.
    pub pix: Vector2<f32>,
    /// Reciprocal camera-space depth.
    pub inv_z: f32,
    pub texcoord: Vector2<f32>,
    /// Normal already rotated into world space.
    pub normal_world: Vector3<f32>,
}

impl VertexRenderData {
    /// Builds from a projected point `(x, y, 1/z)`.
    pub fn from_screen(
        screen: &Vector3<f32>,
        texcoord: Vector2<f32>,
        normal_world: Vector3<f32>,
    ) -> Self {
        VertexRenderData {
            pix: screen.xy(),
            inv_z: screen.z,
            texcoord,
            normal_world,
        }
    }
}

/// Everything the rasterizer needs for a single triangle.
#[derive(Debug, Clone)]
pub struct TriangleData<'a> {
    pub vertices: [VertexRenderData; 3],
    pub texture: &'a Texture,
}

impl<'a> TriangleData<'a> {
    pub fn new(vertices: [VertexRenderData; 3], texture: &'a Texture) -> Self {
        TriangleData { vertices, texture }
    }

    /// Twice the signed screen-space area. Positive means front-facing under
    /// the screen winding convention; zero or negative triangles are culled.
    pub fn signed_area(&self) -> f32 {
        let [v1, v2, v3] = &self.vertices;
        edge_func(&v1.pix, &v2.pix, &v3.pix)
    }

    /// Unnormalized barycentric weights of `p`, all >= 0 when `p` lies inside
    /// or on the boundary of a front-facing triangle.
    #[inline]
    pub fn edge_weights(&self, p: &Vector2<f32>) -> Vector3<f32> {
        let [v1, v2, v3] = &self.vertices;
        Vector3::new(
            edge_func(&v2.pix, &v3.pix, p),
            edge_func(&v3.pix, &v1.pix, p),
            edge_func(&v1.pix, &v2.pix, p),
        )
    }

    /// Normalized barycentric coordinates of `p` when it is covered.
    ///
    /// The edge test is inclusive on all three edges, so a point exactly on
    /// an edge shared by two triangles is covered by both.
    #[inline]
    pub fn coverage(&self, p: &Vector2<f32>, total: f32) -> Option<Vector3<f32>> {
        let w = self.edge_weights(p);
        if w.x >= 0.0 && w.y >= 0.0 && w.z >= 0.0 {
            Some(w / total)
        } else {
            None
        }
    }

    pub fn inv_z(&self) -> Vector3<f32> {
        Vector3::new(
            self.vertices[0].inv_z,
            self.vertices[1].inv_z,
            self.vertices[2].inv_z,
        )
    }

    pub fn texcoords(&self) -> [Vector2<f32>; 3] {
        self.vertices.map(|v| v.texcoord)
    }

    pub fn normals(&self) -> [Vector3<f32>; 3] {
        self.vertices.map(|v| v.normal_world)
    }
}

/// Half-open pixel range `[min, max)` on both axes, already inside the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl BoundingBox {
    /// floor(min) .. ceil(max) + 1 per axis, clamped to the target.
    pub fn from_triangle(triangle: &TriangleData, width: usize, height: usize) -> Option<Self> {
        let [v0, v1, v2] = &triangle.vertices;
        let (v0, v1, v2) = (&v0.pix, &v1.pix, &v2.pix);

        let min_x = Self::clamp_axis(v0.x.min(v1.x).min(v2.x).floor(), width);
        let min_y = Self::clamp_axis(v0.y.min(v1.y).min(v2.y).floor(), height);
        let max_x = Self::clamp_axis(v0.x.max(v1.x).max(v2.x).ceil() + 1.0, width);
        let max_y = Self::clamp_axis(v0.y.max(v1.y).max(v2.y).ceil() + 1.0, height);

        if max_x <= min_x || max_y <= min_y {
            None
        } else {
            Some(Self {
                min_x,
                min_y,
                max_x,
                max_y,
            })
        }
    }

    fn clamp_axis(value: f32, size: usize) -> usize {
        clamp(value as i64, 0, size as i64) as usize
    }

    pub fn for_each_pixel<F>(&self, mut callback: F)
    where
        F: FnMut(usize, usize),
    {
        for y in self.min_y..self.max_y {
            for x in self.min_x..self.max_x {
                callback(x, y);
            }
        }
    }
}
