use crate::core::scene::Scene;
use crate::core::scene_object::SceneObject;
use crate::io::obj_loader::load_obj;
use crate::io::render_settings::RenderSettings;
use crate::material_system::texture::{Texture, load_texture};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Side length of the procedural noise texture.
const NOISE_TEXTURE_SIZE: usize = 64;

/// Turns `RenderSettings` into a ready-to-render scene.
pub struct ResourceLoader;

impl ResourceLoader {
    /// Picks the first texture that loads: the configured file, then the MTL
    /// texture, then seeded noise, then the default grey.
    pub fn resolve_texture(settings: &RenderSettings, mtl_texture: Option<&Path>) -> Texture {
        let candidates = settings
            .texture
            .as_deref()
            .map(Path::new)
            .into_iter()
            .chain(mtl_texture);
        for path in candidates {
            match load_texture(path) {
                Ok(texture) => return texture,
                Err(e) => warn!("{}, trying next texture source", e),
            }
        }

        if let Some(seed) = settings.noise_seed {
            match Texture::noise(NOISE_TEXTURE_SIZE, NOISE_TEXTURE_SIZE, seed) {
                Ok(texture) => {
                    info!("using noise texture, seed {}", seed);
                    return texture;
                }
                Err(e) => warn!("{}", e),
            }
        }

        info!("using default grey texture");
        Texture::default()
    }

    /// Loads the configured mesh, or the built-in cube, placed per the
    /// `[object]` settings and seen through the `[camera]` settings.
    pub fn create_scene(settings: &RenderSettings) -> Result<Scene, String> {
        let load_start = Instant::now();

        let object = match &settings.obj {
            Some(obj_path) => {
                if !Path::new(obj_path).exists() {
                    return Err(format!("OBJ file not found: {}", obj_path));
                }
                let mut mesh = load_obj(obj_path)?;
                let texture_path = mesh.texture_path.take();
                let texture = Self::resolve_texture(settings, texture_path.as_deref());
                mesh.into_scene_object(Arc::new(texture))?
            }
            None => {
                info!("no OBJ configured, rendering the built-in cube");
                SceneObject::cube(Arc::new(Self::resolve_texture(settings, None)))
            }
        };

        let object = object
            .with_offset(settings.object_offset_vec()?)
            .with_rotation(settings.object_rotation())
            .with_scale(settings.object_scale);

        let scene = Scene::new(vec![object]).with_camera(settings.camera()?);
        info!(
            "scene ready: {} object(s), {} triangles in {:?}",
            scene.object_count(),
            scene.triangle_count(),
            load_start.elapsed()
        );
        Ok(scene)
    }
}
