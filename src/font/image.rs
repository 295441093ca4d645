// src/font/image.rs

//! A glyph's rectangle within an atlas texture.

use crate::geometry::{pixel_aligned, RectF, Vector2};

use super::imageset::FontImageset;

/// One packed glyph image: where it sits in the atlas and how to place it
/// relative to a pen position when drawing.
///
/// The pixel-aligned size and offset are cached at definition time; text
/// rendering is hot enough that rounding on every draw call shows up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontImage {
    area: RectF,
    offset: Vector2,
    scaled_size: Vector2,
    scaled_offset: Vector2,
}

impl FontImage {
    pub(crate) fn new(area: RectF, offset: Vector2) -> Self {
        Self {
            area,
            offset,
            scaled_size: Vector2::new(pixel_aligned(area.w), pixel_aligned(area.h)),
            scaled_offset: Vector2::new(pixel_aligned(offset.x), pixel_aligned(offset.y)),
        }
    }

    /// Source rectangle in the owning imageset's texture.
    pub fn area(&self) -> RectF {
        self.area
    }

    /// Unrounded render offset from the pen position.
    pub fn offset(&self) -> Vector2 {
        self.offset
    }

    /// Pixel-aligned image extent.
    pub fn scaled_size(&self) -> Vector2 {
        self.scaled_size
    }

    /// Pixel-aligned render offset.
    pub fn scaled_offset(&self) -> Vector2 {
        self.scaled_offset
    }

    /// True for images that carry no ink (spaces and failed glyphs).
    pub fn is_empty(&self) -> bool {
        self.area.w <= 0.0 || self.area.h <= 0.0
    }

    /// Draws this image with its top-left at `position + scaled_offset`,
    /// stretched to `size`. `owner` must be the imageset this image was
    /// defined in.
    pub fn draw(&self, owner: &FontImageset, position: Vector2, size: Vector2) {
        let dst = RectF::new(
            position.x + self.scaled_offset.x,
            position.y + self.scaled_offset.y,
            size.x,
            size.y,
        );
        owner.draw(self.area, dst);
    }
}
