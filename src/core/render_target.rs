use crate::material_system::color::BLACK_RGBA;

/// Depth value meaning "nothing seen yet". Stored values are reciprocal
/// camera-space depth, so anything visible is strictly greater.
pub const CLEAR_DEPTH: f32 = 0.0;

/// Color and depth buffers covering the same `width x height` pixels, row-major.
///
/// Both allocations are made once in `new` and reused for every frame.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    width: usize,
    height: usize,
    /// RGBA8, four bytes per pixel.
    color_buffer: Vec<u8>,
    /// Reciprocal camera-space depth, larger is nearer.
    depth_buffer: Vec<f32>,
}

impl RenderTarget {
    pub fn new(width: usize, height: usize) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid render target size: {}x{}", width, height));
        }
        let num_pixels = width
            .checked_mul(height)
            .filter(|n| n.checked_mul(4).is_some())
            .ok_or_else(|| format!("Render target too large: {}x{}", width, height))?;
        let mut target = RenderTarget {
            width,
            height,
            color_buffer: vec![0; num_pixels * 4],
            depth_buffer: vec![CLEAR_DEPTH; num_pixels],
        };
        target.clear();
        Ok(target)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resets color to opaque black and depth to `CLEAR_DEPTH`, in place.
    pub fn clear(&mut self) {
        for pixel in self.color_buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&BLACK_RGBA);
        }
        self.depth_buffer.fill(CLEAR_DEPTH);
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let i = self.index(x, y)? * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.color_buffer[i..i + 4]);
        Some(rgba)
    }

    #[inline]
    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x, y).map(|i| self.depth_buffer[i])
    }

    /// Stores color and depth for one pixel. Returns `false` when out of bounds.
    #[inline]
    pub fn write(&mut self, x: usize, y: usize, rgba: [u8; 4], depth: f32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.depth_buffer[i] = depth;
                self.color_buffer[i * 4..i * 4 + 4].copy_from_slice(&rgba);
                true
            }
            None => false,
        }
    }

    /// Raw RGBA8 bytes for the display/export side.
    pub fn color_bytes(&self) -> &[u8] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// True when no pixel has been written since the last clear.
    pub fn is_clear(&self) -> bool {
        self.depth_buffer.iter().all(|&d| d == CLEAR_DEPTH)
            && self
                .color_buffer
                .chunks_exact(4)
                .all(|pixel| pixel == BLACK_RGBA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_target() {
        assert!(RenderTarget::new(0, 10).is_err());
        assert!(RenderTarget::new(10, 0).is_err());
    }

    #[test]
    fn rejects_sizes_whose_buffers_overflow() {
        assert!(RenderTarget::new(usize::MAX, 2).is_err());
        assert!(RenderTarget::new(usize::MAX / 4 + 1, 1).is_err());
    }

    #[test]
    fn new_target_is_cleared() {
        let target = RenderTarget::new(4, 3).unwrap();
        assert_eq!(target.color_bytes().len(), 4 * 3 * 4);
        assert_eq!(target.depth_buffer().len(), 4 * 3);
        assert!(target.is_clear());
        assert_eq!(target.pixel(3, 2), Some([0, 0, 0, 255]));
        assert_eq!(target.depth(0, 0), Some(0.0));
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut target = RenderTarget::new(4, 3).unwrap();
        assert_eq!(target.pixel(4, 0), None);
        assert_eq!(target.depth(0, 3), None);
        assert!(!target.write(4, 0, [1, 2, 3, 255], 1.0));
        assert!(target.is_clear());
    }

    #[test]
    fn write_is_row_major() {
        let mut target = RenderTarget::new(4, 3).unwrap();
        assert!(target.write(1, 2, [9, 8, 7, 255], 0.5));
        let i = 2 * 4 + 1;
        assert_eq!(&target.color_bytes()[i * 4..i * 4 + 4], &[9, 8, 7, 255]);
        assert_eq!(target.depth_buffer()[i], 0.5);
        assert_eq!(target.pixel(1, 2), Some([9, 8, 7, 255]));
    }

    #[test]
    fn clear_reuses_allocations() {
        let mut target = RenderTarget::new(8, 8).unwrap();
        let color_ptr = target.color_bytes().as_ptr();
        let depth_ptr = target.depth_buffer().as_ptr();

        target.write(3, 3, [200, 100, 50, 255], 0.25);
        assert!(!target.is_clear());
        target.clear();

        assert!(target.is_clear());
        assert_eq!(target.color_bytes().as_ptr(), color_ptr);
        assert_eq!(target.depth_buffer().as_ptr(), depth_ptr);
    }
}
