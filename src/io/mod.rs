pub mod config_loader;
pub mod obj_loader;
pub mod render_settings;
pub mod resource_loader;
pub mod save_utils;
pub mod simple_cli;
