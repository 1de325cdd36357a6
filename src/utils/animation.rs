use crate::core::renderer::{FrameStats, Renderer};
use crate::core::scene::Scene;
use crate::core::scene_object::Transformable;
use crate::io::render_settings::RenderSettings;
use crate::io::save_utils::{depth_path, frame_path, save_color, save_depth};
use crate::material_system::light::Illumination;
use log::{debug, info};
use std::time::Instant;

/// Scripted per-second motion applied between frames.
///
/// Rates are radians per second, speeds world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameUpdate {
    pub object_spin: f32,
    pub camera_yaw_rate: f32,
    pub camera_pitch_rate: f32,
    pub camera_strafe_speed: f32,
    pub camera_forward_speed: f32,
}

impl FrameUpdate {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        FrameUpdate {
            object_spin: settings.object_spin.to_radians(),
            camera_yaw_rate: settings.camera_yaw_rate.to_radians(),
            camera_pitch_rate: settings.camera_pitch_rate.to_radians(),
            camera_strafe_speed: settings.camera_strafe_speed,
            camera_forward_speed: settings.camera_forward_speed,
        }
    }

    /// Advances `scene` by `dt` seconds. The camera moves along its own
    /// right and forward axes as they were before this step's turn.
    pub fn apply(&self, scene: &mut Scene, dt: f32) {
        for object in scene.objects.iter_mut() {
            object.add_yaw(self.object_spin * dt);
        }

        let camera = &mut scene.camera;
        let step = camera.right() * (self.camera_strafe_speed * dt)
            + camera.forward() * (self.camera_forward_speed * dt);
        camera.translate(&step);
        camera.add_yaw(self.camera_yaw_rate * dt);
        camera.add_pitch(self.camera_pitch_rate * dt);
    }
}

/// Renders `settings.frames` frames with a fixed time step of `1 / fps`,
/// advancing the scene after each one. Every frame is written when
/// `save_all_frames` is set, otherwise only the last.
pub fn run_animation_loop<L: Illumination>(
    renderer: &mut Renderer<L>,
    settings: &RenderSettings,
) -> Result<Vec<FrameStats>, String> {
    let total_frames = settings.frames.max(1);
    let dt = settings.frame_dt();
    let update = FrameUpdate::from_settings(settings);
    info!("rendering {} frame(s), dt = {:.4}s", total_frames, dt);

    let loop_start = Instant::now();
    let mut all_stats = Vec::with_capacity(total_frames);

    for frame in 0..total_frames {
        let stats = renderer.render();
        debug!(
            "frame {}/{}: {} pixels, {} culled, {} discarded, {:?}",
            frame + 1,
            total_frames,
            stats.pixels_written,
            stats.culled,
            stats.discarded,
            stats.elapsed
        );

        if settings.save_all_frames || frame + 1 == total_frames {
            let path = frame_path(&settings.output_dir, &settings.output, frame, total_frames);
            save_color(renderer.target(), &path)?;
            if settings.save_depth {
                save_depth(renderer.target(), depth_path(&path))?;
            }
        }

        all_stats.push(stats);
        update.apply(renderer.scene_mut(), dt);
    }

    let pixels: usize = all_stats.iter().map(|s| s.pixels_written).sum();
    info!(
        "{} frame(s) in {:?}, {} pixels written",
        total_frames,
        loop_start.elapsed(),
        pixels
    );
    Ok(all_stats)
}
