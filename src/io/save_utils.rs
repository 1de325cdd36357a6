use crate::core::render_target::{CLEAR_DEPTH, RenderTarget};
use crate::material_system::color::{BLACK_RGBA, jet, to_rgba8};
use image::ColorType;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Output path for one frame. Single-frame runs get no index suffix.
pub fn frame_path(output_dir: &str, output_name: &str, frame: usize, total_frames: usize) -> PathBuf {
    let file_name = if total_frames > 1 {
        format!("{}_{:04}.png", output_name, frame)
    } else {
        format!("{}.png", output_name)
    };
    Path::new(output_dir).join(file_name)
}

/// Path of the depth image saved beside `color_path`.
pub fn depth_path(color_path: &Path) -> PathBuf {
    let stem = color_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    color_path.with_file_name(format!("{}_depth.png", stem))
}

/// Copies RGBA rows bottom-up, so camera +y ends up at the top of the image.
pub fn flip_rows(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let row_len = width * 4;
    let mut flipped = Vec::with_capacity(rgba.len());
    for y in (0..height).rev() {
        flipped.extend_from_slice(&rgba[y * row_len..(y + 1) * row_len]);
    }
    flipped
}

/// JET visualisation of reciprocal depth, normalized over the pixels that were
/// written. Unwritten pixels stay black, nearer surfaces run hotter.
pub fn depth_to_rgba(depth_buffer: &[f32]) -> Vec<u8> {
    let written = depth_buffer.iter().copied().filter(|&d| d > CLEAR_DEPTH);
    let (min, max) = written.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
        (lo.min(d), hi.max(d))
    });
    let range = max - min;
    let inv_range = if range > 1e-12 { 1.0 / range } else { 0.0 };

    let mut rgba = Vec::with_capacity(depth_buffer.len() * 4);
    for &depth in depth_buffer {
        if depth > CLEAR_DEPTH {
            // a single depth value maps to the hot end
            let t = if inv_range > 0.0 { (depth - min) * inv_range } else { 1.0 };
            rgba.extend_from_slice(&to_rgba8(&jet(t)));
        } else {
            rgba.extend_from_slice(&BLACK_RGBA);
        }
    }
    rgba
}

fn write_rgba(path: &Path, rgba: &[u8], width: usize, height: usize) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create directory {:?}: {}", parent, e))?;
        }
    }
    image::save_buffer(
        path,
        rgba,
        width as u32,
        height as u32,
        ColorType::Rgba8,
    )
    .map_err(|e| format!("failed to save image to {:?}: {}", path, e))
}

/// Writes the colour buffer. The format follows the file extension.
pub fn save_color<P: AsRef<Path>>(target: &RenderTarget, path: P) -> Result<(), String> {
    let path = path.as_ref();
    let rgba = flip_rows(target.color_bytes(), target.width(), target.height());
    write_rgba(path, &rgba, target.width(), target.height())?;
    info!("image saved to {:?}", path);
    Ok(())
}

pub fn save_depth<P: AsRef<Path>>(target: &RenderTarget, path: P) -> Result<(), String> {
    let path = path.as_ref();
    let rgba = depth_to_rgba(target.depth_buffer());
    let rgba = flip_rows(&rgba, target.width(), target.height());
    write_rgba(path, &rgba, target.width(), target.height())?;
    debug!("depth image saved to {:?}", path);
    Ok(())
}
