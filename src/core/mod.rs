pub mod rasterizer;
pub mod render_target;
pub mod renderer;
pub mod scene;
pub mod scene_object;
