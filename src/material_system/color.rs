use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// RGB color with float channels in the 0-255 range.
pub type Color = Vector3<f32>;

pub const BLACK_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Converts a 0-255 float color to an opaque RGBA8 pixel.
#[inline]
pub fn to_rgba8(color: &Color) -> [u8; 4] {
    [
        color.x.clamp(0.0, 255.0) as u8,
        color.y.clamp(0.0, 255.0) as u8,
        color.z.clamp(0.0, 255.0) as u8,
        255,
    ]
}

/// Draws a color from `rng`; seed the generator for repeatable output.
pub fn get_random_color(rng: &mut StdRng) -> Color {
    Color::new(
        rng.random::<f32>() * 255.0,
        rng.random::<f32>() * 255.0,
        rng.random::<f32>() * 255.0,
    )
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Maps a normalized value in [0, 1] to the JET colormap, 0-255 channels.
pub fn jet(value: f32) -> Color {
    let value = value.clamp(0.0, 1.0);
    let mut r = 0.0;
    let g;
    let mut b = 0.0;

    if value <= 0.25 {
        // Blue to Cyan
        b = 1.0;
        g = value * 4.0;
    } else if value <= 0.5 {
        // Cyan to Green
        g = 1.0;
        b = 1.0 - (value - 0.25) * 4.0;
    } else if value <= 0.75 {
        // Green to Yellow
        g = 1.0;
        r = (value - 0.5) * 4.0;
    } else {
        // Yellow to Red
        r = 1.0;
        g = 1.0 - (value - 0.75) * 4.0;
    }

    Color::new(r, g, b) * 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_conversion_saturates() {
        assert_eq!(to_rgba8(&Color::new(-4.0, 127.9, 300.0)), [0, 127, 255, 255]);
    }

    #[test]
    fn random_colors_repeat_for_same_seed() {
        let a = get_random_color(&mut seeded_rng(7));
        let b = get_random_color(&mut seeded_rng(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|c| (0.0..=255.0).contains(c)));
    }

    #[test]
    fn jet_endpoints() {
        assert_eq!(jet(0.0), Color::new(0.0, 0.0, 255.0));
        assert_eq!(jet(1.0), Color::new(255.0, 0.0, 0.0));
        assert_eq!(jet(0.5), Color::new(0.0, 255.0, 0.0));
    }
}
