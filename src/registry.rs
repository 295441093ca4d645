// src/registry.rs

//! Handle-based font registry.
//!
//! Embedders that expose a flat API (FFI layers, scripting bindings) need
//! to refer to fonts by value rather than by ownership. [`FontRegistry`]
//! owns the [`Font`]s and hands out `u32` ids: zero is never issued, so it
//! can serve as the "no font" sentinel on flat boundaries. Ids are never
//! reused within one registry.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, warn};

use crate::config::FontOptions;
use crate::error::FontError;
use crate::font::Font;
use crate::geometry::Vector2;
use crate::raster::RasterEngine;
use crate::sink::GlyphSink;

/// Identifier of a font owned by a [`FontRegistry`]. Never zero.
pub type FontId = u32;

/// Owns fonts on behalf of a flat, handle-based caller.
pub struct FontRegistry<E: RasterEngine> {
    engine: Arc<E>,
    sink: Rc<dyn GlyphSink>,
    fonts: HashMap<FontId, Font<E>>,
    next_id: FontId,
}

impl<E: RasterEngine> FontRegistry<E> {
    /// Every font created through this registry shares `engine` and
    /// uploads its atlases through `sink`.
    pub fn new(engine: Arc<E>, sink: Rc<dyn GlyphSink>) -> Self {
        Self {
            engine,
            sink,
            fonts: HashMap::new(),
            next_id: 1,
        }
    }

    /// Loads a font file from disk and registers it.
    pub fn create_font(
        &mut self,
        path: impl AsRef<Path>,
        options: FontOptions,
    ) -> Result<FontId, FontError> {
        let font = Font::from_file(self.engine.clone(), self.sink.clone(), path, options)?;
        Ok(self.register(font))
    }

    /// Loads a font from raw bytes and registers it.
    pub fn create_font_from_memory(
        &mut self,
        data: Arc<[u8]>,
        options: FontOptions,
    ) -> Result<FontId, FontError> {
        if data.is_empty() {
            return Err(FontError::EmptyFontData);
        }
        let font = Font::from_bytes(self.engine.clone(), self.sink.clone(), data, options)?;
        Ok(self.register(font))
    }

    fn register(&mut self, font: Font<E>) -> FontId {
        let id = self.next_id;
        self.next_id += 1;
        debug!("registered font {id} ({} glyphs)", font.glyph_count());
        self.fonts.insert(id, font);
        id
    }

    /// Destroys a font and its atlas textures. Returns whether `id` named
    /// a live font.
    pub fn destroy_font(&mut self, id: FontId) -> bool {
        let removed = self.fonts.remove(&id).is_some();
        if !removed {
            warn!("destroy of unknown font {id}");
        }
        removed
    }

    pub fn font(&self, id: FontId) -> Option<&Font<E>> {
        self.fonts.get(&id)
    }

    pub fn font_mut(&mut self, id: FontId) -> Option<&mut Font<E>> {
        self.fonts.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Draws `text` with font `id` at its native size. Returns whether the
    /// font exists; drawing itself cannot fail.
    pub fn draw_text(&mut self, id: FontId, text: &str, position: Vector2) -> bool {
        let Some(font) = self.fonts.get_mut(&id) else {
            return false;
        };
        font.draw_text(text, position, 1.0);
        true
    }

    /// Measures `text` with font `id`, or `None` for an unknown id.
    pub fn text_width(&mut self, id: FontId, text: &str) -> Option<f32> {
        self.fonts.get_mut(&id).map(|f| f.text_width(text, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectF;
    use crate::raster::{F26Dot6, FaceFlags, FaceMetrics, GlyphMetrics, Span};
    use crate::sink::TextureId;

    /// Engine with an empty charmap; enough to exercise handle bookkeeping.
    struct EmptyEngine;

    impl RasterEngine for EmptyEngine {
        type Face = ();

        fn open_face(&self, data: Arc<[u8]>) -> Result<(), FontError> {
            if data.first() == Some(&0xff) {
                return Err(FontError::MissingCharmap);
            }
            Ok(())
        }

        fn face_flags(&self, _face: &()) -> FaceFlags {
            FaceFlags::SCALABLE
        }

        fn fixed_sizes(&self, _face: &()) -> Vec<f32> {
            Vec::new()
        }

        fn set_char_size(&self, _face: &mut (), _size: F26Dot6, _dpi: u32) -> Result<(), FontError> {
            Ok(())
        }

        fn face_metrics(&self, _face: &()) -> FaceMetrics {
            FaceMetrics::default()
        }

        fn codepoints(&self, _face: &()) -> Vec<u32> {
            Vec::new()
        }

        fn glyph_metrics(&self, _face: &(), _codepoint: u32) -> Option<GlyphMetrics> {
            None
        }

        fn fill_spans(&self, _face: &(), _codepoint: u32) -> Option<Vec<Span>> {
            None
        }

        fn stroke_spans(&self, _face: &(), _codepoint: u32, _radius: f32) -> Option<Vec<Span>> {
            None
        }
    }

    struct NullSink;

    impl GlyphSink for NullSink {
        fn create_texture_from_memory(&self, _blob: &[u8]) -> TextureId {
            TextureId::INVALID
        }

        fn destroy_texture(&self, _id: TextureId) {}

        fn draw_textured_rect(
            &self,
            _id: TextureId,
            _src: RectF,
            _dst: RectF,
            _z: f32,
            _rotation: f32,
            _tint: u32,
            _color_key: u32,
        ) {
        }
    }

    fn registry() -> FontRegistry<EmptyEngine> {
        FontRegistry::new(Arc::new(EmptyEngine), Rc::new(NullSink))
    }

    fn bytes() -> Arc<[u8]> {
        Arc::from(vec![0u8; 4])
    }

    #[test]
    fn ids_start_at_one_and_never_repeat() {
        let mut fonts = registry();
        let a = fonts
            .create_font_from_memory(bytes(), FontOptions::default())
            .unwrap();
        let b = fonts
            .create_font_from_memory(bytes(), FontOptions::default())
            .unwrap();
        assert_eq!((a, b), (1, 2));

        assert!(fonts.destroy_font(a));
        assert!(!fonts.destroy_font(a), "double destroy is refused");
        let c = fonts
            .create_font_from_memory(bytes(), FontOptions::default())
            .unwrap();
        assert_eq!(c, 3, "destroyed ids are not recycled");
        assert_eq!(fonts.len(), 2);
    }

    #[test]
    fn empty_data_is_rejected_before_the_engine_sees_it() {
        let mut fonts = registry();
        let result = fonts.create_font_from_memory(Arc::from(Vec::new()), FontOptions::default());
        assert!(matches!(result, Err(FontError::EmptyFontData)));
        assert!(fonts.is_empty());
    }

    #[test]
    fn load_failures_register_nothing() {
        let mut fonts = registry();
        let result = fonts.create_font_from_memory(Arc::from(vec![0xffu8]), FontOptions::default());
        assert!(matches!(result, Err(FontError::MissingCharmap)));
        assert!(fonts.is_empty());
        // The failed attempt did not burn an id.
        let id = fonts
            .create_font_from_memory(bytes(), FontOptions::default())
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn unknown_ids_are_refused_everywhere() {
        let mut fonts = registry();
        assert!(!fonts.draw_text(9, "x", Vector2::new(0.0, 0.0)));
        assert_eq!(fonts.text_width(9, "x"), None);
        assert!(fonts.font(9).is_none());
        assert!(fonts.font_mut(9).is_none());
    }

    #[test]
    fn queries_reach_the_owned_font() {
        let mut fonts = registry();
        let id = fonts
            .create_font_from_memory(bytes(), FontOptions::default())
            .unwrap();
        // The empty charmap measures everything at zero but the calls land.
        assert_eq!(fonts.text_width(id, "hello"), Some(0.0));
        assert!(fonts.draw_text(id, "hello", Vector2::new(1.0, 2.0)));
        assert_eq!(fonts.font(id).unwrap().glyph_count(), 0);
    }
}
