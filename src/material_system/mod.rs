pub mod color;
pub mod light;
pub mod texture;
