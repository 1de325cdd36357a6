use crate::core::scene_object::SceneObject;
use crate::geometry::camera::Camera;

/// A camera and the objects it sees. Object order is draw order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub camera: Camera,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Scene with the default camera.
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Scene {
            camera: Camera::default(),
            objects,
        }
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Appends an object, returning its index.
    pub fn add_object(&mut self, object: SceneObject) -> usize {
        let object_id = self.objects.len();
        self.objects.push(object);
        object_id
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(SceneObject::num_triangles).sum()
    }
}
