// src/font/pixmap.rs

//! CPU-side atlas surface.
//!
//! Glyph coverage is composited into an [`AtlasPixmap`] before the whole
//! atlas is encoded and uploaded in one piece. Pixels are BGRA packed into
//! `u32`s (blue in the low byte) so the buffer serializes straight into
//! the TGA blob.
//!
//! Outlined glyphs are drawn in two passes: the stroke coverage lands
//! first as black, then the fill blends white over it. Unoutlined glyphs
//! write white directly. All writes are clipped to the surface.

use crate::tga;

/// Packs BGRA channels into the atlas pixel format.
pub fn pack_bgra(r: u8, g: u8, b: u8, a: u8) -> u32 {
    b as u32 | (g as u32) << 8 | (r as u32) << 16 | (a as u32) << 24
}

/// A square BGRA surface, initially transparent black.
pub struct AtlasPixmap {
    size: u32,
    pixels: Vec<u32>,
}

impl AtlasPixmap {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            pixels: vec![0; (size * size) as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.size && y < self.size {
            Some((y * self.size + x) as usize)
        } else {
            None
        }
    }

    /// Reads one pixel; `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes white at `coverage` alpha (the unoutlined glyph pass).
    pub fn write_fill(&mut self, x: u32, y: u32, coverage: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = pack_bgra(255, 255, 255, coverage);
        }
    }

    /// Writes black at `coverage` alpha (the stroke pass of an outlined
    /// glyph).
    pub fn write_stroke(&mut self, x: u32, y: u32, coverage: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = pack_bgra(0, 0, 0, coverage);
        }
    }

    /// Alpha-blends white at `coverage` over the existing pixel (the fill
    /// pass of an outlined glyph): each color channel moves toward the
    /// source by `coverage / 255`, alpha accumulates and saturates.
    pub fn blend_fill(&mut self, x: u32, y: u32, coverage: u8) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let dst = self.pixels[i];
        let (b, g, r, a) = (
            (dst & 0xff) as u8,
            ((dst >> 8) & 0xff) as u8,
            ((dst >> 16) & 0xff) as u8,
            ((dst >> 24) & 0xff) as u8,
        );
        let blend = |dst_c: u8| -> u8 {
            (dst_c as f32 + ((255 - dst_c as i32) as f32 * coverage as f32) / 255.0) as u8
        };
        self.pixels[i] = pack_bgra(blend(r), blend(g), blend(b), a.saturating_add(coverage));
    }

    /// Encodes the surface as an uploadable TGA blob.
    pub fn encode_tga(&self) -> Vec<u8> {
        tga::encode_bgra(self.size, &self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_writes_white_at_coverage() {
        let mut pm = AtlasPixmap::new(8);
        pm.write_fill(2, 3, 200);
        assert_eq!(pm.pixel(2, 3), Some(pack_bgra(255, 255, 255, 200)));
    }

    #[test]
    fn stroke_writes_black_at_coverage() {
        let mut pm = AtlasPixmap::new(8);
        pm.write_stroke(0, 0, 90);
        assert_eq!(pm.pixel(0, 0), Some(pack_bgra(0, 0, 0, 90)));
    }

    #[test]
    fn fill_blends_over_stroke() {
        let mut pm = AtlasPixmap::new(4);
        pm.write_stroke(1, 1, 200);
        pm.blend_fill(1, 1, 128);
        // Channels move halfway to white, alpha saturates.
        assert_eq!(pm.pixel(1, 1), Some(pack_bgra(128, 128, 128, 255)));
    }

    #[test]
    fn solid_fill_overrides_stroke_color() {
        let mut pm = AtlasPixmap::new(4);
        pm.write_stroke(0, 1, 255);
        pm.blend_fill(0, 1, 255);
        assert_eq!(pm.pixel(0, 1), Some(pack_bgra(255, 255, 255, 255)));
    }

    #[test]
    fn zero_coverage_blend_is_a_no_op_on_color() {
        let mut pm = AtlasPixmap::new(4);
        pm.write_stroke(2, 2, 77);
        pm.blend_fill(2, 2, 0);
        assert_eq!(pm.pixel(2, 2), Some(pack_bgra(0, 0, 0, 77)));
    }

    #[test]
    fn blend_truncates_like_integer_math() {
        let mut pm = AtlasPixmap::new(4);
        // Start from a mid-gray stroke pixel.
        pm.pixels[0] = pack_bgra(100, 100, 100, 10);
        pm.blend_fill(0, 0, 128);
        // 100 + (255 - 100) * 128 / 255 = 177.8 → 177
        assert_eq!(pm.pixel(0, 0), Some(pack_bgra(177, 177, 177, 138)));
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut pm = AtlasPixmap::new(4);
        pm.write_fill(4, 0, 255);
        pm.write_stroke(0, 4, 255);
        pm.blend_fill(100, 100, 255);
        assert!(pm.pixels.iter().all(|&p| p == 0));
        assert_eq!(pm.pixel(4, 0), None);
    }

    #[test]
    fn encodes_itself_as_tga() {
        let pm = AtlasPixmap::new(16);
        let blob = pm.encode_tga();
        assert_eq!(crate::tga::blob_width(&blob), Some(16));
        assert_eq!(blob.len(), 18 + 16 * 16 * 4);
    }
}
