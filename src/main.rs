use log::{error, info};
use perspective_rasterizer::core::render_target::RenderTarget;
use perspective_rasterizer::core::renderer::Renderer;
use perspective_rasterizer::io::render_settings::RenderSettings;
use perspective_rasterizer::io::resource_loader::ResourceLoader;
use perspective_rasterizer::io::simple_cli::SimpleCli;
use perspective_rasterizer::material_system::light::Unlit;
use perspective_rasterizer::utils::animation::run_animation_loop;

fn run(settings: &RenderSettings) -> Result<(), String> {
    settings.validate()?;

    let scene = ResourceLoader::create_scene(settings)?;
    let target = RenderTarget::new(settings.width, settings.height)?;
    info!(
        "render target {}x{}, fov {:.1} degrees",
        settings.width, settings.height, settings.fov_degrees
    );

    if settings.use_lighting {
        let light = settings.directional_light()?;
        let mut renderer = Renderer::with_light(scene, target, light);
        run_animation_loop(&mut renderer, settings)?;
    } else {
        let mut renderer = Renderer::with_light(scene, target, Unlit(1.0));
        run_animation_loop(&mut renderer, settings)?;
    }
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(settings) = SimpleCli::process()? else {
        return Ok(());
    };

    run(&settings).inspect_err(|e| error!("render failed: {}", e))
}
