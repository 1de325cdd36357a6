use crate::io::render_settings::{RenderSettings, parse_vec3};
use log::{info, warn};
use std::path::Path;
use toml::Value;

/// Reads and writes `RenderSettings` as TOML.
///
/// Missing sections and keys keep their defaults and unknown keys are
/// ignored. A key holding the wrong type is an error naming that key; a
/// well-typed but unusable value is replaced by its default with a warning.
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RenderSettings, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config file {:?}: {}", path, e))?;
        info!("loaded config file {:?}", path);

        Self::load_from_content(&content)
    }

    pub fn load_from_content(content: &str) -> Result<RenderSettings, String> {
        let toml_value: Value =
            toml::from_str(content).map_err(|e| format!("failed to parse TOML: {}", e))?;

        Self::parse_toml_to_settings(toml_value)
    }

    pub fn save_to_file<P: AsRef<Path>>(settings: &RenderSettings, path: P) -> Result<(), String> {
        let toml_content = Self::settings_to_toml(settings);
        std::fs::write(path, toml_content).map_err(|e| format!("failed to write config file: {}", e))
    }

    /// Writes the defaults, with a sample OBJ path, as a starting point.
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), String> {
        let settings = RenderSettings {
            obj: Some("models/cube.obj".to_string()),
            ..Default::default()
        };

        Self::save_to_file(&settings, path)
            .map_err(|e| format!("failed to create example config: {}", e))
    }

    // ===== TOML -> RenderSettings =====

    fn parse_toml_to_settings(toml: Value) -> Result<RenderSettings, String> {
        let mut settings = RenderSettings::default();

        if let Some(files) = Self::section(&toml, "files")? {
            Self::parse_files_section(&mut settings, files)?;
        }
        if let Some(render) = Self::section(&toml, "render")? {
            Self::parse_render_section(&mut settings, render)?;
        }
        if let Some(camera) = Self::section(&toml, "camera")? {
            Self::parse_camera_section(&mut settings, camera)?;
        }
        if let Some(object) = Self::section(&toml, "object")? {
            Self::parse_object_section(&mut settings, object)?;
        }
        if let Some(lighting) = Self::section(&toml, "lighting")? {
            Self::parse_lighting_section(&mut settings, lighting)?;
        }
        if let Some(animation) = Self::section(&toml, "animation")? {
            Self::parse_animation_section(&mut settings, animation)?;
        }

        Ok(settings)
    }

    fn section<'a>(toml: &'a Value, name: &str) -> Result<Option<&'a toml::Table>, String> {
        match toml.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_table()
                .map(Some)
                .ok_or_else(|| format!("[{}] must be a table", name)),
        }
    }

    // ===== typed key readers =====

    fn read_str<'a>(table: &'a toml::Table, key: &str) -> Result<Option<&'a str>, String> {
        match table.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| format!("'{}' must be a string", key)),
        }
    }

    fn read_bool(table: &toml::Table, key: &str) -> Result<Option<bool>, String> {
        match table.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| format!("'{}' must be a boolean", key)),
        }
    }

    fn read_int(table: &toml::Table, key: &str) -> Result<Option<i64>, String> {
        match table.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_integer()
                .map(Some)
                .ok_or_else(|| format!("'{}' must be an integer", key)),
        }
    }

    /// Integers are accepted where floats are expected.
    fn read_float(table: &toml::Table, key: &str) -> Result<Option<f32>, String> {
        match table.get(key) {
            None => Ok(None),
            Some(Value::Float(f)) => Ok(Some(*f as f32)),
            Some(Value::Integer(i)) => Ok(Some(*i as f32)),
            Some(_) => Err(format!("'{}' must be a number", key)),
        }
    }

    /// A `"x,y,z"` string that must parse.
    fn read_vec3(table: &toml::Table, key: &str) -> Result<Option<String>, String> {
        match Self::read_str(table, key)? {
            None => Ok(None),
            Some(s) => {
                parse_vec3(s).map_err(|e| format!("'{}': {}", key, e))?;
                Ok(Some(s.to_string()))
            }
        }
    }

    /// Positive integer, or the default with a warning.
    fn read_count(table: &toml::Table, key: &str, default: usize) -> Result<Option<usize>, String> {
        match Self::read_int(table, key)? {
            None => Ok(None),
            Some(n) if n > 0 => Ok(Some(n as usize)),
            Some(n) => {
                warn!("invalid {} {}, using default {}", key, n, default);
                Ok(Some(default))
            }
        }
    }

    // ===== sections =====

    fn parse_files_section(
        settings: &mut RenderSettings,
        files: &toml::Table,
    ) -> Result<(), String> {
        if let Some(obj) = Self::read_str(files, "obj")? {
            settings.obj = Some(obj.to_string());
        }
        if let Some(texture) = Self::read_str(files, "texture")? {
            settings.texture = Some(texture.to_string());
        }
        if let Some(output) = Self::read_str(files, "output")? {
            settings.output = output.to_string();
        }
        if let Some(output_dir) = Self::read_str(files, "output_dir")? {
            settings.output_dir = output_dir.to_string();
        }
        if let Some(save_depth) = Self::read_bool(files, "save_depth")? {
            settings.save_depth = save_depth;
        }
        Ok(())
    }

    fn parse_render_section(
        settings: &mut RenderSettings,
        render: &toml::Table,
    ) -> Result<(), String> {
        let defaults = RenderSettings::default();
        if let Some(width) = Self::read_count(render, "width", defaults.width)? {
            settings.width = width;
        }
        if let Some(height) = Self::read_count(render, "height", defaults.height)? {
            settings.height = height;
        }
        Ok(())
    }

    fn parse_camera_section(
        settings: &mut RenderSettings,
        camera: &toml::Table,
    ) -> Result<(), String> {
        if let Some(offset) = Self::read_vec3(camera, "offset")? {
            settings.camera_offset = offset;
        }
        if let Some(yaw) = Self::read_float(camera, "yaw_degrees")? {
            settings.camera_yaw = yaw;
        }
        if let Some(pitch) = Self::read_float(camera, "pitch_degrees")? {
            settings.camera_pitch = pitch;
        }
        if let Some(fov) = Self::read_float(camera, "fov_degrees")? {
            if fov > 0.0 && fov < 180.0 {
                settings.fov_degrees = fov;
            } else {
                warn!(
                    "fov_degrees {} outside (0, 180), using default {}",
                    fov,
                    RenderSettings::default().fov_degrees
                );
            }
        }
        Ok(())
    }

    fn parse_object_section(
        settings: &mut RenderSettings,
        object: &toml::Table,
    ) -> Result<(), String> {
        if let Some(offset) = Self::read_vec3(object, "offset")? {
            settings.object_offset = offset;
        }
        if let Some(yaw) = Self::read_float(object, "yaw_degrees")? {
            settings.object_yaw = yaw;
        }
        if let Some(pitch) = Self::read_float(object, "pitch_degrees")? {
            settings.object_pitch = pitch;
        }
        if let Some(scale) = Self::read_float(object, "scale")? {
            if scale > 0.0 && scale.is_finite() {
                settings.object_scale = scale;
            } else {
                warn!("invalid object scale {}, using 1", scale);
            }
        }
        if let Some(seed) = Self::read_int(object, "noise_seed")? {
            settings.noise_seed = Some(seed as u64);
        }
        Ok(())
    }

    fn parse_lighting_section(
        settings: &mut RenderSettings,
        lighting: &toml::Table,
    ) -> Result<(), String> {
        if let Some(use_lighting) = Self::read_bool(lighting, "use_lighting")? {
            settings.use_lighting = use_lighting;
        }
        if let Some(ambient) = Self::read_float(lighting, "ambient")? {
            if (0.0..=1.0).contains(&ambient) {
                settings.ambient = ambient;
            } else {
                let clamped = ambient.clamp(0.0, 1.0);
                warn!("ambient {} outside [0, 1], clamped to {}", ambient, clamped);
                settings.ambient = clamped;
            }
        }
        if let Some(direction) = Self::read_vec3(lighting, "direction")? {
            settings.light_direction = direction;
        }
        Ok(())
    }

    fn parse_animation_section(
        settings: &mut RenderSettings,
        animation: &toml::Table,
    ) -> Result<(), String> {
        let defaults = RenderSettings::default();
        if let Some(frames) = Self::read_count(animation, "frames", defaults.frames)? {
            settings.frames = frames;
        }
        if let Some(fps) = Self::read_count(animation, "fps", defaults.fps)? {
            settings.fps = fps;
        }
        if let Some(spin) = Self::read_float(animation, "object_spin")? {
            settings.object_spin = spin;
        }
        if let Some(rate) = Self::read_float(animation, "camera_yaw_rate")? {
            settings.camera_yaw_rate = rate;
        }
        if let Some(rate) = Self::read_float(animation, "camera_pitch_rate")? {
            settings.camera_pitch_rate = rate;
        }
        if let Some(speed) = Self::read_float(animation, "camera_strafe_speed")? {
            settings.camera_strafe_speed = speed;
        }
        if let Some(speed) = Self::read_float(animation, "camera_forward_speed")? {
            settings.camera_forward_speed = speed;
        }
        if let Some(save_all) = Self::read_bool(animation, "save_all_frames")? {
            settings.save_all_frames = save_all;
        }
        Ok(())
    }

    // ===== RenderSettings -> TOML =====

    pub fn settings_to_toml(settings: &RenderSettings) -> String {
        let mut content = String::new();

        content.push_str("# perspective-rasterizer configuration\n");
        content.push_str("# angles in degrees, rates per second\n\n");

        content.push_str("[files]\n");
        if let Some(obj) = &settings.obj {
            content.push_str(&format!("obj = {}\n", toml_string(obj)));
        } else {
            content.push_str("# obj = \"path/to/model.obj\"  # renders a cube when unset\n");
        }
        if let Some(texture) = &settings.texture {
            content.push_str(&format!("texture = {}\n", toml_string(texture)));
        } else {
            content.push_str("# texture = \"path/to/texture.png\"  # overrides the MTL texture\n");
        }
        content.push_str(&format!("output = {}\n", toml_string(&settings.output)));
        content.push_str(&format!("output_dir = {}\n", toml_string(&settings.output_dir)));
        content.push_str(&format!("save_depth = {}\n", settings.save_depth));
        content.push('\n');

        content.push_str("[render]\n");
        content.push_str(&format!("width = {}\n", settings.width));
        content.push_str(&format!("height = {}\n", settings.height));
        content.push('\n');

        content.push_str("[camera]\n");
        content.push_str(&format!("offset = {}\n", toml_string(&settings.camera_offset)));
        content.push_str(&format!("yaw_degrees = {:?}\n", settings.camera_yaw));
        content.push_str(&format!("pitch_degrees = {:?}\n", settings.camera_pitch));
        content.push_str(&format!("fov_degrees = {:?}\n", settings.fov_degrees));
        content.push('\n');

        content.push_str("[object]\n");
        content.push_str(&format!("offset = {}\n", toml_string(&settings.object_offset)));
        content.push_str(&format!("yaw_degrees = {:?}\n", settings.object_yaw));
        content.push_str(&format!("pitch_degrees = {:?}\n", settings.object_pitch));
        content.push_str(&format!("scale = {:?}\n", settings.object_scale));
        if let Some(seed) = settings.noise_seed {
            content.push_str(&format!("noise_seed = {}\n", seed));
        } else {
            content.push_str("# noise_seed = 42  # procedural texture when no image is found\n");
        }
        content.push('\n');

        content.push_str("[lighting]\n");
        content.push_str(&format!("use_lighting = {}\n", settings.use_lighting));
        content.push_str(&format!("ambient = {:?}\n", settings.ambient));
        content.push_str(&format!("direction = {}\n", toml_string(&settings.light_direction)));
        content.push('\n');

        content.push_str("[animation]\n");
        content.push_str(&format!("frames = {}\n", settings.frames));
        content.push_str(&format!("fps = {}\n", settings.fps));
        content.push_str(&format!("object_spin = {:?}\n", settings.object_spin));
        content.push_str(&format!("camera_yaw_rate = {:?}\n", settings.camera_yaw_rate));
        content.push_str(&format!(
            "camera_pitch_rate = {:?}\n",
            settings.camera_pitch_rate
        ));
        content.push_str(&format!(
            "camera_strafe_speed = {:?}\n",
            settings.camera_strafe_speed
        ));
        content.push_str(&format!(
            "camera_forward_speed = {:?}\n",
            settings.camera_forward_speed
        ));
        content.push_str(&format!("save_all_frames = {}\n", settings.save_all_frames));

        content
    }
}

/// Quoted and escaped TOML string.
fn toml_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}
