use crate::geometry::camera::Camera;
use crate::geometry::rotation::Rotation;
use crate::material_system::texture::Texture;
use nalgebra::{Vector2, Vector3};
use std::sync::Arc;

/// Normal used for vertices whose source supplied none.
pub const DEFAULT_NORMAL: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// Anything placed by an offset and a yaw/pitch orientation.
pub trait Transformable {
    fn offset_mut(&mut self) -> &mut Vector3<f32>;
    fn rotation_mut(&mut self) -> &mut Rotation;

    fn translate(&mut self, delta: &Vector3<f32>) {
        *self.offset_mut() += delta;
    }

    fn add_yaw(&mut self, delta: f32) {
        self.rotation_mut().add_yaw(delta);
    }

    fn add_pitch(&mut self, delta: f32) {
        self.rotation_mut().add_pitch(delta);
    }
}

/// The three vertices of one triangle with their attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTriangle {
    pub positions: [Vector3<f32>; 3],
    pub texcoords: [Vector2<f32>; 3],
    pub normals: [Vector3<f32>; 3],
}

/// A triangle soup with its own local->world placement and texture.
///
/// Vertex attributes are flat arrays, grouped in consecutive triples per
/// triangle. Local->world is rotate, then scale, then translate.
#[derive(Debug, Clone)]
pub struct SceneObject {
    positions: Vec<Vector3<f32>>,
    texcoords: Vec<Vector2<f32>>,
    normals: Vec<Vector3<f32>>,
    pub texture: Arc<Texture>,
    /// Uniform scale. Normals ignore it, which is only valid because it is uniform.
    pub scale: f32,
    pub offset: Vector3<f32>,
    pub rotation: Rotation,
}

impl SceneObject {
    pub fn new(
        positions: Vec<Vector3<f32>>,
        texcoords: Vec<Vector2<f32>>,
        normals: Vec<Vector3<f32>>,
        texture: Arc<Texture>,
    ) -> Result<Self, String> {
        if positions.len() % 3 != 0 {
            return Err(format!(
                "vertex count {} is not a multiple of 3",
                positions.len()
            ));
        }
        if texcoords.len() != positions.len() || normals.len() != positions.len() {
            return Err(format!(
                "attribute counts differ: {} positions, {} uvs, {} normals",
                positions.len(),
                texcoords.len(),
                normals.len()
            ));
        }
        Ok(SceneObject {
            positions,
            texcoords,
            normals,
            texture,
            scale: 1.0,
            offset: Vector3::zeros(),
            rotation: Rotation::identity(),
        })
    }

    /// Axis-aligned cube of half-extent 1, every face front-facing from outside.
    pub fn cube(texture: Arc<Texture>) -> Self {
        let face_normals: [Vector3<f32>; 6] = [
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];

        let mut positions = Vec::with_capacity(36);
        let mut texcoords = Vec::with_capacity(36);
        let mut normals = Vec::with_capacity(36);

        for n in face_normals {
            let up = if n.y.abs() > 0.5 {
                Vector3::z()
            } else {
                Vector3::y()
            };
            // as seen from outside the face: `right` x `up` points into the cube
            let right = n.cross(&up);
            let corner = |r: f32, u: f32| n + right * r + up * u;

            let quad = [
                (corner(-1.0, -1.0), Vector2::new(0.0, 0.0)),
                (corner(-1.0, 1.0), Vector2::new(0.0, 1.0)),
                (corner(1.0, -1.0), Vector2::new(1.0, 0.0)),
                (corner(1.0, -1.0), Vector2::new(1.0, 0.0)),
                (corner(-1.0, 1.0), Vector2::new(0.0, 1.0)),
                (corner(1.0, 1.0), Vector2::new(1.0, 1.0)),
            ];
            for (p, uv) in quad {
                positions.push(p);
                texcoords.push(uv);
                normals.push(n);
            }
        }

        SceneObject {
            positions,
            texcoords,
            normals,
            texture,
            scale: 1.0,
            offset: Vector3::zeros(),
            rotation: Rotation::identity(),
        }
    }

    pub fn with_offset(mut self, offset: Vector3<f32>) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn num_triangles(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle(&self, index: usize) -> Option<MeshTriangle> {
        let base = index.checked_mul(3)?;
        if base + 3 > self.positions.len() {
            return None;
        }
        let pick3 = |i: usize| base + i;
        Some(MeshTriangle {
            positions: [0, 1, 2].map(|i| self.positions[pick3(i)]),
            texcoords: [0, 1, 2].map(|i| self.texcoords[pick3(i)]),
            normals: [0, 1, 2].map(|i| self.normals[pick3(i)]),
        })
    }

    /// Triangles in array order.
    pub fn triangles(&self) -> impl Iterator<Item = MeshTriangle> + '_ {
        (0..self.num_triangles()).filter_map(|i| self.triangle(i))
    }

    #[inline]
    pub fn local_to_world(&self, p: &Vector3<f32>) -> Vector3<f32> {
        let mut world = self.rotation.apply(p);
        world *= self.scale;
        world += self.offset;
        world
    }

    /// Rotation only, see `scale`.
    #[inline]
    pub fn normal_to_world(&self, n: &Vector3<f32>) -> Vector3<f32> {
        self.rotation.apply(n)
    }
}

impl Transformable for SceneObject {
    fn offset_mut(&mut self) -> &mut Vector3<f32> {
        &mut self.offset
    }

    fn rotation_mut(&mut self) -> &mut Rotation {
        &mut self.rotation
    }
}

impl Transformable for Camera {
    fn offset_mut(&mut self) -> &mut Vector3<f32> {
        &mut self.offset
    }

    fn rotation_mut(&mut self) -> &mut Rotation {
        &mut self.rotation
    }
}
