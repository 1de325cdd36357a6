use crate::core::rasterizer::{TriangleData, TriangleOutcome, VertexRenderData, rasterize_triangle};
use crate::core::render_target::RenderTarget;
use crate::core::scene::Scene;
use crate::core::scene_object::SceneObject;
use crate::geometry::camera::Camera;
use crate::geometry::transform::{Projection, is_projectable};
use crate::material_system::light::{DirectionalLight, Illumination};
use log::debug;
use nalgebra::Vector3;
use std::time::{Duration, Instant};

/// Counters for one `render` call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Triangles submitted, whatever became of them.
    pub triangles: usize,
    /// Back-facing or degenerate on screen.
    pub culled: usize,
    /// Skipped because a vertex sat on or behind the camera plane.
    pub discarded: usize,
    /// Pixels that passed the depth test, overdraw included.
    pub pixels_written: usize,
    pub elapsed: Duration,
}

/// Owns a scene, its render target and the lighting model.
///
/// The projection (pixels per world unit and screen center) is computed once
/// from the camera's fov and the target size. Changing the fov through
/// `scene_mut` has no effect until `refresh_projection` runs.
pub struct Renderer<L: Illumination = DirectionalLight> {
    scene: Scene,
    target: RenderTarget,
    projection: Projection,
    light: L,
}

impl Renderer<DirectionalLight> {
    pub fn new(scene: Scene, target: RenderTarget) -> Self {
        Renderer::with_light(scene, target, DirectionalLight::default())
    }
}

impl<L: Illumination> Renderer<L> {
    pub fn with_light(scene: Scene, target: RenderTarget, light: L) -> Self {
        let projection = Projection::new(target.width(), target.height(), scene.camera.fov);
        Renderer {
            scene,
            target,
            projection,
            light,
        }
    }

    /// Recomputes the cached projection from the current camera fov.
    pub fn refresh_projection(&mut self) {
        self.projection = Projection::new(
            self.target.width(),
            self.target.height(),
            self.scene.camera.fov,
        );
        debug!(
            "projection refreshed: {:.3} px per world unit",
            self.projection.pixels_per_world_unit
        );
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// World-space point to `(x, y, 1/z)` under the cached projection.
    pub fn world_to_screen(&self, p: &Vector3<f32>) -> Vector3<f32> {
        self.projection.world_to_screen(&self.scene.camera, p)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    /// Clears the target and draws every object in scene order.
    pub fn render(&mut self) -> FrameStats {
        let start_time = Instant::now();
        let mut stats = FrameStats::default();

        self.target.clear();
        for object in &self.scene.objects {
            Self::draw_object(
                object,
                &self.scene.camera,
                &self.projection,
                &mut self.target,
                &self.light,
                &mut stats,
            );
        }

        stats.elapsed = start_time.elapsed();
        debug!(
            "frame: {} triangles, {} culled, {} discarded, {} pixels in {:?}",
            stats.triangles, stats.culled, stats.discarded, stats.pixels_written, stats.elapsed
        );
        stats
    }

    fn draw_object(
        object: &SceneObject,
        camera: &Camera,
        projection: &Projection,
        target: &mut RenderTarget,
        light: &L,
        stats: &mut FrameStats,
    ) {
        for tri in object.triangles() {
            stats.triangles += 1;

            let view = tri
                .positions
                .map(|p| camera.to_view(&object.local_to_world(&p)));
            if view.iter().any(|v| !is_projectable(v.z)) {
                stats.discarded += 1;
                continue;
            }

            let vertices = [0, 1, 2].map(|i| {
                VertexRenderData::from_screen(
                    &projection.view_to_screen(&view[i]),
                    tri.texcoords[i],
                    object.normal_to_world(&tri.normals[i]),
                )
            });
            let triangle = TriangleData::new(vertices, &object.texture);

            match rasterize_triangle(&triangle, target, light) {
                TriangleOutcome::Culled => stats.culled += 1,
                TriangleOutcome::Rasterized { pixels } => stats.pixels_written += pixels,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rotation::Rotation;
    use crate::material_system::color::Color;
    use crate::material_system::texture::Texture;
    use nalgebra::Vector2;
    use std::sync::Arc;

    const FACING_CAMERA: Vector3<f32> = Vector3::new(0.0, 0.0, -1.0);

    fn triangle_object(
        positions: [Vector3<f32>; 3],
        texcoords: [Vector2<f32>; 3],
        texture: Texture,
    ) -> SceneObject {
        SceneObject::new(
            positions.to_vec(),
            texcoords.to_vec(),
            vec![FACING_CAMERA; 3],
            Arc::new(texture),
        )
        .unwrap()
    }

    fn flat_triangle(color: Color, depth: f32, half: f32) -> SceneObject {
        triangle_object(
            [
                Vector3::new(-half, -half, 0.0),
                Vector3::new(-half, half, 0.0),
                Vector3::new(half, -half, 0.0),
            ],
            [Vector2::zeros(); 3],
            Texture::solid(color),
        )
        .with_offset(Vector3::new(0.0, 0.0, depth))
    }

    fn close(actual: [u8; 4], expected: [u8; 3]) -> bool {
        (0..3).all(|c| (actual[c] as i32 - expected[c] as i32).abs() <= 1) && actual[3] == 255
    }

    #[test]
    fn single_triangle_fills_its_screen_footprint() {
        let color = Color::new(120.0, 60.0, 240.0);
        let scene = Scene::new(vec![flat_triangle(color, 5.0, 1.0)]);
        let mut renderer = Renderer::new(scene, RenderTarget::new(1280, 720).unwrap());
        let stats = renderer.render();
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.culled, 0);
        assert_eq!(stats.discarded, 0);

        // vertices land at 640 +- 73.9, 360 +- 73.9; the hypotenuse is x + y = 1000
        let target = renderer.target();
        let mut filled = 0;
        for y in 0..target.height() {
            for x in 0..target.width() {
                let pixel = target.pixel(x, y).unwrap();
                let depth = target.depth(x, y).unwrap();
                let in_rect = (566..=713).contains(&x) && (286..=433).contains(&y);
                if in_rect && x + y <= 998 {
                    assert!(close(pixel, [120, 60, 240]), "({}, {}) = {:?}", x, y, pixel);
                    assert!((depth - 0.2).abs() < 1e-4);
                    filled += 1;
                } else if !in_rect || x + y >= 1000 {
                    assert_eq!(pixel, [0, 0, 0, 255], "({}, {}) should be clear", x, y);
                    assert_eq!(depth, 0.0);
                }
            }
        }
        assert!(filled > 10_000);
        assert!(stats.pixels_written >= filled);
    }

    #[test]
    fn output_does_not_depend_on_object_order() {
        let near = flat_triangle(Color::new(255.0, 0.0, 0.0), 4.0, 1.5);
        let far = flat_triangle(Color::new(0.0, 0.0, 255.0), 6.0, 3.0);

        let mut forward = Renderer::new(
            Scene::new(vec![near.clone(), far.clone()]),
            RenderTarget::new(64, 48).unwrap(),
        );
        let mut backward = Renderer::new(
            Scene::new(vec![far, near]),
            RenderTarget::new(64, 48).unwrap(),
        );
        forward.render();
        backward.render();

        assert_eq!(forward.target().color_bytes(), backward.target().color_bytes());
        assert_eq!(forward.target().depth_buffer(), backward.target().depth_buffer());

        // the nearer triangle wins in the middle
        let center = forward.target().pixel(30, 22).unwrap();
        assert!(close(center, [255, 0, 0]), "{:?}", center);
    }

    #[test]
    fn rendering_is_deterministic() {
        let cube = SceneObject::cube(Arc::new(Texture::noise(8, 8, 7).unwrap()))
            .with_offset(Vector3::new(0.2, -0.1, 5.0))
            .with_rotation(Rotation::new(0.5, 0.3));
        let scene = Scene::new(vec![cube]);

        let mut a = Renderer::new(scene.clone(), RenderTarget::new(96, 64).unwrap());
        let mut b = Renderer::new(scene, RenderTarget::new(96, 64).unwrap());
        let first = a.render();
        let again = a.render();
        b.render();

        assert_eq!(first.pixels_written, again.pixels_written);
        assert_eq!(a.target().color_bytes(), b.target().color_bytes());
        assert_eq!(a.target().depth_buffer(), b.target().depth_buffer());
    }

    #[test]
    fn rotated_cube_culls_its_hidden_half() {
        let cube = SceneObject::cube(Arc::new(Texture::default()))
            .with_offset(Vector3::new(0.0, 0.0, 5.0))
            .with_rotation(Rotation::new(0.5, 0.3));
        let mut renderer = Renderer::new(Scene::new(vec![cube]), RenderTarget::new(128, 96).unwrap());
        let stats = renderer.render();
        assert_eq!(stats.triangles, 12);
        assert_eq!(stats.culled, 6);
        assert_eq!(stats.discarded, 0);
        assert!(stats.pixels_written > 0);
        assert!(!renderer.target().is_clear());
    }

    #[test]
    fn texture_mapping_is_perspective_correct() {
        // a plane receding to the right: world x in [-1, 1] maps to z in [2, 6]
        let stripes = Texture::new(
            3,
            1,
            vec![
                Color::new(255.0, 0.0, 0.0),
                Color::new(0.0, 0.0, 255.0),
                Color::new(0.0, 0.0, 255.0),
            ],
        )
        .unwrap();
        let slanted = triangle_object(
            [
                Vector3::new(-1.0, -1.0, 2.0),
                Vector3::new(-1.0, 1.0, 2.0),
                Vector3::new(1.0, 0.0, 6.0),
            ],
            [
                Vector2::new(0.0, 0.0),
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
            ],
            stripes,
        );
        let mut renderer = Renderer::new(
            Scene::new(vec![slanted]),
            RenderTarget::new(1280, 720).unwrap(),
        );
        renderer.render();

        // u = 0.5 sits at world x = 0, which projects to the screen center;
        // affine interpolation would put it about 60 pixels further left
        let target = renderer.target();
        let left = target.pixel(630, 360).unwrap();
        let right = target.pixel(650, 360).unwrap();
        assert!(close(left, [255, 0, 0]), "{:?}", left);
        assert!(close(right, [0, 0, 255]), "{:?}", right);
    }

    #[test]
    fn back_facing_triangle_leaves_target_clear() {
        let reversed = triangle_object(
            [
                Vector3::new(-1.0, -1.0, 5.0),
                Vector3::new(1.0, -1.0, 5.0),
                Vector3::new(-1.0, 1.0, 5.0),
            ],
            [Vector2::zeros(); 3],
            Texture::default(),
        );
        let mut renderer = Renderer::new(Scene::new(vec![reversed]), RenderTarget::new(64, 64).unwrap());
        let stats = renderer.render();
        assert_eq!(stats.culled, 1);
        assert_eq!(stats.pixels_written, 0);
        assert!(renderer.target().is_clear());
    }

    #[test]
    fn triangles_crossing_the_camera_plane_are_discarded() {
        let behind = triangle_object(
            [
                Vector3::new(-1.0, -1.0, 5.0),
                Vector3::new(-1.0, 1.0, 5.0),
                Vector3::new(1.0, -1.0, -1.0),
            ],
            [Vector2::zeros(); 3],
            Texture::default(),
        );
        let on_plane = triangle_object(
            [
                Vector3::new(-1.0, -1.0, 0.0),
                Vector3::new(-1.0, 1.0, 3.0),
                Vector3::new(1.0, -1.0, 3.0),
            ],
            [Vector2::zeros(); 3],
            Texture::default(),
        );
        let mut renderer = Renderer::new(
            Scene::new(vec![behind, on_plane]),
            RenderTarget::new(64, 64).unwrap(),
        );
        let stats = renderer.render();
        assert_eq!(stats.triangles, 2);
        assert_eq!(stats.discarded, 2);
        assert!(renderer.target().is_clear());
    }

    #[test]
    fn render_clears_the_previous_frame() {
        let mut renderer = Renderer::new(
            Scene::new(vec![flat_triangle(Color::new(50.0, 50.0, 50.0), 5.0, 1.0)]),
            RenderTarget::new(64, 64).unwrap(),
        );
        renderer.render();
        assert!(!renderer.target().is_clear());

        renderer.scene_mut().objects.clear();
        let stats = renderer.render();
        assert_eq!(stats.triangles, 0);
        assert!(renderer.target().is_clear());
    }

    #[test]
    fn fov_change_needs_a_refresh() {
        let mut renderer = Renderer::new(Scene::default(), RenderTarget::new(200, 100).unwrap());
        let p = Vector3::new(1.0, 0.5, 4.0);
        let before = renderer.world_to_screen(&p);

        renderer.scene_mut().camera.set_fov(std::f32::consts::FRAC_PI_2);
        assert_eq!(renderer.world_to_screen(&p), before);

        renderer.refresh_projection();
        let after = renderer.world_to_screen(&p);
        assert!((renderer.projection().pixels_per_world_unit - 100.0).abs() < 1e-3);
        assert!((after.x - (100.0 + 25.0)).abs() < 1e-3);
        assert!((after.z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn custom_illumination_is_used() {
        use crate::material_system::light::Unlit;
        let scene = Scene::new(vec![flat_triangle(Color::new(200.0, 100.0, 50.0), 5.0, 1.0)]);
        let mut renderer = Renderer::with_light(scene, RenderTarget::new(64, 64).unwrap(), Unlit(0.5));
        renderer.render();
        let center = renderer.target().pixel(30, 30).unwrap();
        assert!(close(center, [100, 50, 25]), "{:?}", center);
    }
}
