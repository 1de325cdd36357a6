use crate::io::config_loader::TomlConfigLoader;
use crate::io::render_settings::RenderSettings;
use clap::Parser;
use log::info;

/// Headless perspective rasterizer driven by a TOML file.
#[derive(Parser, Debug)]
#[command(name = "perspective-rasterizer")]
#[command(about = "Renders textured triangle meshes to image files on the CPU")]
pub struct SimpleCli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Number of frames to render, overrides [animation] frames
    #[arg(short, long, value_name = "N")]
    pub frames: Option<usize>,

    /// Output base name, overrides [files] output
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Write an example configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub write_example_config: Option<String>,
}

impl SimpleCli {
    /// Parses the command line. `None` means there is nothing to render.
    pub fn process() -> Result<Option<RenderSettings>, String> {
        Self::parse().into_settings()
    }

    pub fn into_settings(self) -> Result<Option<RenderSettings>, String> {
        if let Some(path) = &self.write_example_config {
            TomlConfigLoader::create_example_config(path)?;
            info!("example config written to {}", path);
            return Ok(None);
        }

        let mut settings = if let Some(config_path) = &self.config {
            info!("loading config file: {}", config_path);
            TomlConfigLoader::load_from_file(config_path)
                .map_err(|e| format!("config file could not be loaded: {}", e))?
        } else {
            info!("no config file given, using defaults");
            RenderSettings::default()
        };

        if let Some(frames) = self.frames {
            settings.frames = frames;
        }
        if let Some(output) = self.output {
            settings.output = output;
        }
        Ok(Some(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let cli = SimpleCli::try_parse_from(["perspective-rasterizer", "-f", "3", "--output", "spin"])
            .unwrap();
        let settings = cli.into_settings().unwrap().unwrap();
        assert_eq!(settings.frames, 3);
        assert_eq!(settings.output, "spin");
        assert_eq!(settings.width, RenderSettings::default().width);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = SimpleCli::try_parse_from([
            "perspective-rasterizer",
            "--config",
            "/nonexistent/dir/render.toml",
        ])
        .unwrap();
        assert!(cli.into_settings().is_err());
    }

    #[test]
    fn example_config_is_written_and_loadable() {
        let path = std::env::temp_dir().join(format!(
            "perspective_rasterizer_example_{}.toml",
            std::process::id()
        ));
        let path_str = path.to_string_lossy().into_owned();
        let cli = SimpleCli::try_parse_from([
            "perspective-rasterizer",
            "--write-example-config",
            path_str.as_str(),
        ])
        .unwrap();
        assert!(cli.into_settings().unwrap().is_none());

        let settings = TomlConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(settings.obj.as_deref(), Some("models/cube.obj"));
        let _ = std::fs::remove_file(&path);
    }
}
