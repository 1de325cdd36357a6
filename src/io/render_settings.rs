use crate::geometry::camera::Camera;
use crate::geometry::rotation::Rotation;
use crate::material_system::light::DirectionalLight;
use nalgebra::Vector3;

/// Everything a headless run can be configured with.
///
/// Vectors are kept as `"x,y,z"` strings so they survive a TOML round trip
/// unchanged; the `*_vec` helpers parse them on demand. Angles are degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    // ===== files =====
    /// OBJ mesh to load; the built-in cube is used when absent
    pub obj: Option<String>,
    /// Texture file, overrides the MTL texture
    pub texture: Option<String>,
    /// Base name of the written frames
    pub output: String,
    pub output_dir: String,
    /// Also write a JET-coloured depth image
    pub save_depth: bool,

    // ===== render =====
    pub width: usize,
    pub height: usize,

    // ===== camera =====
    pub camera_offset: String,
    pub camera_yaw: f32,
    pub camera_pitch: f32,
    /// Horizontal field of view
    pub fov_degrees: f32,

    // ===== object =====
    pub object_offset: String,
    pub object_yaw: f32,
    pub object_pitch: f32,
    pub object_scale: f32,
    /// Seed for a procedural noise texture when no texture file is found
    pub noise_seed: Option<u64>,

    // ===== lighting =====
    /// When off every pixel shows its plain texel colour
    pub use_lighting: bool,
    pub ambient: f32,
    pub light_direction: String,

    // ===== animation =====
    pub frames: usize,
    pub fps: usize,
    /// Object yaw rate, degrees per second
    pub object_spin: f32,
    pub camera_yaw_rate: f32,
    pub camera_pitch_rate: f32,
    /// World units per second along the camera's right axis
    pub camera_strafe_speed: f32,
    /// World units per second along the camera's forward axis
    pub camera_forward_speed: f32,
    pub save_all_frames: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            obj: None,
            texture: None,
            output: "frame".to_string(),
            output_dir: "output".to_string(),
            save_depth: false,

            width: 1280,
            height: 720,

            camera_offset: "0,0,0".to_string(),
            camera_yaw: 0.0,
            camera_pitch: 0.0,
            fov_degrees: 120.0,

            object_offset: "0,0,5".to_string(),
            object_yaw: 0.0,
            object_pitch: 0.0,
            object_scale: 1.0,
            noise_seed: None,

            use_lighting: true,
            ambient: 0.5,
            light_direction: "0,0,-1".to_string(),

            frames: 1,
            fps: 30,
            object_spin: 57.29578,
            camera_yaw_rate: 0.0,
            camera_pitch_rate: 0.0,
            camera_strafe_speed: 0.0,
            camera_forward_speed: 0.0,
            save_all_frames: false,
        }
    }
}

/// Parses `"x,y,z"` into a vector.
pub fn parse_vec3(s: &str) -> Result<Vector3<f32>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got '{}'", s));
    }
    let mut out = Vector3::zeros();
    for (i, part) in parts.iter().enumerate() {
        out[i] = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid number '{}': {}", part.trim(), e))?;
    }
    Ok(out)
}

impl RenderSettings {
    pub fn camera_offset_vec(&self) -> Result<Vector3<f32>, String> {
        parse_vec3(&self.camera_offset).map_err(|e| format!("camera offset: {}", e))
    }

    pub fn object_offset_vec(&self) -> Result<Vector3<f32>, String> {
        parse_vec3(&self.object_offset).map_err(|e| format!("object offset: {}", e))
    }

    pub fn light_direction_vec(&self) -> Result<Vector3<f32>, String> {
        let direction =
            parse_vec3(&self.light_direction).map_err(|e| format!("light direction: {}", e))?;
        if direction.norm_squared() < 1e-12 {
            return Err("light direction must not be zero".to_string());
        }
        Ok(direction)
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// Fixed time step of the frame loop in seconds.
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    pub fn camera(&self) -> Result<Camera, String> {
        Ok(Camera::new(
            self.camera_offset_vec()?,
            Rotation::new(self.camera_yaw.to_radians(), self.camera_pitch.to_radians()),
            self.fov_radians(),
        ))
    }

    pub fn object_rotation(&self) -> Rotation {
        Rotation::new(self.object_yaw.to_radians(), self.object_pitch.to_radians())
    }

    pub fn directional_light(&self) -> Result<DirectionalLight, String> {
        Ok(DirectionalLight::new(self.light_direction_vec()?, self.ambient))
    }

    /// Checks everything that would otherwise fail halfway through a run.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("image width and height must be greater than 0".to_string());
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(format!(
                "fov_degrees must lie in (0, 180), got {}",
                self.fov_degrees
            ));
        }
        if let Some(obj_path) = &self.obj {
            if !std::path::Path::new(obj_path).exists() {
                return Err(format!("OBJ file '{}' not found", obj_path));
            }
        }
        if self.output.trim().is_empty() {
            return Err("output name must not be empty".to_string());
        }
        if self.output_dir.trim().is_empty() {
            return Err("output directory must not be empty".to_string());
        }
        if self.frames == 0 {
            return Err("frames must be at least 1".to_string());
        }
        self.camera_offset_vec()?;
        self.object_offset_vec()?;
        self.light_direction_vec()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_vec3_accepts_spaces_and_rejects_garbage() {
        assert_eq!(
            parse_vec3(" 1, -2.5 ,3").unwrap(),
            Vector3::new(1.0, -2.5, 3.0)
        );
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,two,3").is_err());
    }

    #[test]
    fn defaults_match_the_reference_scene() {
        let settings = RenderSettings::default();
        assert_eq!((settings.width, settings.height), (1280, 720));
        assert!((settings.fov_radians() - 2.0 * std::f32::consts::PI / 3.0).abs() < 1e-5);
        assert_eq!(
            settings.object_offset_vec().unwrap(),
            Vector3::new(0.0, 0.0, 5.0)
        );
        assert_eq!(settings.directional_light().unwrap(), DirectionalLight::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_names_the_problem() {
        let settings = RenderSettings {
            camera_offset: "0,0".to_string(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.contains("camera offset"), "{}", err);

        let settings = RenderSettings {
            light_direction: "0,0,0".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = RenderSettings {
            fov_degrees: 180.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn camera_uses_radians() {
        let settings = RenderSettings {
            camera_yaw: 90.0,
            fov_degrees: 90.0,
            ..Default::default()
        };
        let camera = settings.camera().unwrap();
        assert!((camera.rotation.yaw() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((camera.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
