use crate::geometry::math::clamp;
use crate::material_system::color::{Color, get_random_color, seeded_rng};
use image::DynamicImage;
use log::{debug, info};
use nalgebra::Vector2;
use std::path::Path;

/// Grey used by `Texture::default()`.
pub const DEFAULT_TEXEL: f32 = 200.0;

/// A 2D grid of colors with nearest-neighbour, edge-clamped sampling.
///
/// Texels are row-major with row 0 at v = 0 (the bottom of the source image).
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<Color>,
}

impl Texture {
    pub fn new(width: usize, height: usize, texels: Vec<Color>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid texture size: {}x{}", width, height));
        }
        let count = width
            .checked_mul(height)
            .ok_or_else(|| format!("Texture too large: {}x{}", width, height))?;
        if texels.len() != count {
            return Err(format!(
                "texel count {} does not match {}x{} texture",
                texels.len(),
                width,
                height
            ));
        }
        Ok(Texture {
            width,
            height,
            texels,
        })
    }

    /// 1x1 texture of a single color.
    pub fn solid(color: Color) -> Self {
        Texture {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    /// Seeded random colors, one per texel.
    pub fn noise(width: usize, height: usize, seed: u64) -> Result<Self, String> {
        let mut rng = seeded_rng(seed);
        let texels = (0..width * height)
            .map(|_| get_random_color(&mut rng))
            .collect();
        Self::new(width, height, texels)
    }

    /// Copies an already decoded image. Alpha is dropped, so 24 and 32 bit
    /// sources behave the same. Rows are flipped so v grows upward.
    pub fn from_image(img: &DynamicImage) -> Result<Self, String> {
        let rgb = img.flipv().into_rgb8();
        let (width, height) = rgb.dimensions();
        let texels = rgb
            .pixels()
            .map(|p| Color::new(p[0] as f32, p[1] as f32, p[2] as f32))
            .collect();
        Self::new(width as usize, height as usize, texels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest-neighbour lookup. `uv` outside [0, 1] clamps to the edge texel.
    #[inline]
    pub fn sample(&self, uv: &Vector2<f32>) -> Color {
        let s = Self::texel_index(uv.x, self.width);
        let t = Self::texel_index(uv.y, self.height);
        self.texels[t * self.width + s]
    }

    #[inline]
    fn texel_index(coord: f32, size: usize) -> usize {
        let max = size as i64 - 1;
        // `as` saturates and maps NaN to 0
        let raw = (coord * max as f32).floor() as i64;
        clamp(raw, 0, max) as usize
    }
}

impl Default for Texture {
    fn default() -> Self {
        let (width, height) = (20, 20);
        Texture {
            width,
            height,
            texels: vec![Color::repeat(DEFAULT_TEXEL); width * height],
        }
    }
}

/// Decodes an image file into a texture.
pub fn load_texture<P: AsRef<Path>>(path: P) -> Result<Texture, String> {
    let path_ref = path.as_ref();
    debug!("Decoding texture: {:?}", path_ref);
    let img =
        image::open(path_ref).map_err(|e| format!("Failed to load texture {:?}: {}", path_ref, e))?;
    let texture = Texture::from_image(&img)?;
    info!(
        "Loaded texture {:?} ({}x{})",
        path_ref, texture.width(), texture.height()
    );
    Ok(texture)
}
