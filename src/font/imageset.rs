// src/font/imageset.rs

//! An atlas texture and the glyph images packed into it.

use std::rc::Rc;

use log::warn;

use crate::geometry::{RectF, Vector2};
use crate::sink::{GlyphSink, TextureId};

use super::image::FontImage;

/// Text quads draw at a fixed depth in front of ordinary sprites.
const TEXT_Z_ORDER: f32 = 999.0;
/// Opaque white modulation: glyph pixels pass through unchanged.
const TEXT_TINT: u32 = 0xffff_ffff;
/// Zero disables color keying.
const NO_COLOR_KEY: u32 = 0;

/// One rasterization pass's worth of glyphs: a single texture plus the
/// images defined inside it. The imageset owns its texture and releases
/// it through the sink when replaced or dropped.
pub struct FontImageset {
    sink: Rc<dyn GlyphSink>,
    texture: TextureId,
    texture_size: u32,
    images: Vec<FontImage>,
}

impl FontImageset {
    pub(crate) fn new(sink: Rc<dyn GlyphSink>) -> Self {
        Self {
            sink,
            texture: TextureId::INVALID,
            texture_size: 0,
            images: Vec::new(),
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn texture_size(&self) -> u32 {
        self.texture_size
    }

    /// Installs the atlas texture, releasing any previous one. An invalid
    /// id is accepted; the imageset then draws nothing.
    pub(crate) fn set_texture(&mut self, id: TextureId, size: u32) {
        if self.texture.is_valid() {
            self.sink.destroy_texture(self.texture);
        }
        if !id.is_valid() {
            warn!("imageset received an invalid texture; its glyphs will not draw");
        }
        self.texture = id;
        self.texture_size = size;
    }

    /// Records an image at `area` with render offset `offset`, returning
    /// its index within this set.
    pub(crate) fn define_image(&mut self, area: RectF, offset: Vector2) -> usize {
        self.images.push(FontImage::new(area, offset));
        self.images.len() - 1
    }

    pub fn image(&self, index: usize) -> Option<&FontImage> {
        self.images.get(index)
    }

    pub fn images(&self) -> &[FontImage] {
        &self.images
    }

    /// Draws `src` (texture pixels) into `dst` (screen pixels). A no-op
    /// while the texture is invalid.
    pub fn draw(&self, src: RectF, dst: RectF) {
        if !self.texture.is_valid() {
            return;
        }
        self.sink.draw_textured_rect(
            self.texture,
            src,
            dst,
            TEXT_Z_ORDER,
            0.0,
            TEXT_TINT,
            NO_COLOR_KEY,
        );
    }
}

impl Drop for FontImageset {
    fn drop(&mut self) {
        if self.texture.is_valid() {
            self.sink.destroy_texture(self.texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records sink traffic for lifetime assertions.
    #[derive(Default)]
    struct CountingSink {
        destroyed: RefCell<Vec<TextureId>>,
        draws: RefCell<Vec<(TextureId, RectF, RectF, f32, u32, u32)>>,
    }

    impl GlyphSink for CountingSink {
        fn create_texture_from_memory(&self, _blob: &[u8]) -> TextureId {
            TextureId(1)
        }

        fn destroy_texture(&self, id: TextureId) {
            self.destroyed.borrow_mut().push(id);
        }

        fn draw_textured_rect(
            &self,
            id: TextureId,
            src: RectF,
            dst: RectF,
            z: f32,
            _rotation: f32,
            tint: u32,
            color_key: u32,
        ) {
            self.draws
                .borrow_mut()
                .push((id, src, dst, z, tint, color_key));
        }
    }

    #[test]
    fn replacing_a_texture_destroys_the_old_one() {
        let sink = Rc::new(CountingSink::default());
        let mut set = FontImageset::new(sink.clone());
        set.set_texture(TextureId(7), 64);
        set.set_texture(TextureId(9), 128);
        assert_eq!(*sink.destroyed.borrow(), vec![TextureId(7)]);
        assert_eq!(set.texture(), TextureId(9));
        assert_eq!(set.texture_size(), 128);
    }

    #[test]
    fn dropping_the_set_destroys_its_texture() {
        let sink = Rc::new(CountingSink::default());
        {
            let mut set = FontImageset::new(sink.clone());
            set.set_texture(TextureId(5), 32);
        }
        assert_eq!(*sink.destroyed.borrow(), vec![TextureId(5)]);
    }

    #[test]
    fn invalid_texture_never_reaches_the_sink() {
        let sink = Rc::new(CountingSink::default());
        {
            let set = FontImageset::new(sink.clone());
            set.draw(
                RectF::new(0.0, 0.0, 4.0, 4.0),
                RectF::new(0.0, 0.0, 4.0, 4.0),
            );
        }
        assert!(sink.destroyed.borrow().is_empty());
        assert!(sink.draws.borrow().is_empty());
    }

    #[test]
    fn draws_carry_the_text_constants() {
        let sink = Rc::new(CountingSink::default());
        let mut set = FontImageset::new(sink.clone());
        set.set_texture(TextureId(3), 64);
        set.draw(
            RectF::new(1.0, 2.0, 3.0, 4.0),
            RectF::new(10.0, 20.0, 3.0, 4.0),
        );
        let draws = sink.draws.borrow();
        assert_eq!(draws.len(), 1);
        let (id, _, _, z, tint, key) = draws[0];
        assert_eq!(id, TextureId(3));
        assert_eq!(z, 999.0);
        assert_eq!(tint, 0xffff_ffff);
        assert_eq!(key, 0);
    }

    #[test]
    fn images_index_in_definition_order() {
        let sink = Rc::new(CountingSink::default());
        let mut set = FontImageset::new(sink);
        let a = set.define_image(RectF::new(0.0, 0.0, 4.0, 4.0), Vector2::new(0.0, 0.0));
        let b = set.define_image(RectF::new(8.0, 0.0, 2.0, 2.0), Vector2::new(1.0, -1.0));
        assert_eq!((a, b), (0, 1));
        assert_eq!(set.images().len(), 2);
        assert_eq!(set.image(1).unwrap().area().x, 8.0);
        assert!(set.image(2).is_none());
    }
}
