// src/font/glyph.rs

//! Per-codepoint glyph record.

/// Locates a glyph's image: `set` indexes the font's imageset list,
/// `image` the image within that set. Index handles keep the glyph map
/// free of lifetimes into the imageset storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlot {
    pub set: usize,
    pub image: usize,
}

/// One glyph of a font: the pen advance known from load time, and the
/// atlas image filled in by the first rasterization of its page.
#[derive(Debug, Clone)]
pub struct FontGlyph {
    advance: f32,
    image: Option<ImageSlot>,
}

impl FontGlyph {
    pub(crate) fn new(advance: f32) -> Self {
        Self {
            advance,
            image: None,
        }
    }

    /// Horizontal pen advance in pixels.
    pub fn advance(&self) -> f32 {
        self.advance
    }

    /// Atlas image location, once the glyph's page has been rasterized.
    /// Zero-area images (spaces, failed glyphs) still count.
    pub fn image(&self) -> Option<ImageSlot> {
        self.image
    }

    pub fn is_rasterized(&self) -> bool {
        self.image.is_some()
    }

    /// Assigns the atlas image. A glyph is rasterized at most once; the
    /// slot never changes afterwards.
    pub(crate) fn assign_image(&mut self, slot: ImageSlot) {
        debug_assert!(self.image.is_none(), "glyph image assigned twice");
        self.image = Some(slot);
    }
}
