// src/sink.rs

//! The rendering-backend seam.
//!
//! Fonts never talk to a GPU or a windowing system directly; they hand
//! finished atlas blobs and per-glyph quads to a [`GlyphSink`]. Backends
//! implement this trait over whatever renderer they drive, and tests
//! implement it with a recorder.

use crate::geometry::RectF;

/// Opaque handle to a texture owned by the rendering backend.
///
/// Zero is reserved as the invalid handle, matching the convention that a
/// failed texture upload yields a handle that draws nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    pub const INVALID: TextureId = TextureId(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Receives textures and draw calls produced by the font system.
///
/// Implementations use interior mutability; fonts hold the sink as
/// `Rc<dyn GlyphSink>` and call it from a single thread.
pub trait GlyphSink {
    /// Uploads an encoded image blob (TGA) and returns its handle, or
    /// [`TextureId::INVALID`] on failure.
    fn create_texture_from_memory(&self, blob: &[u8]) -> TextureId;

    /// Releases a texture. Must tolerate invalid handles and repeated
    /// destruction of the same handle.
    fn destroy_texture(&self, id: TextureId);

    /// Draws the `src` region of texture `id` into the screen-space rect
    /// `dst`. `tint` is packed RGBA modulation; `color_key` of zero means
    /// no keying.
    #[allow(clippy::too_many_arguments)]
    fn draw_textured_rect(
        &self,
        id: TextureId,
        src: RectF,
        dst: RectF,
        z: f32,
        rotation: f32,
        tint: u32,
        color_key: u32,
    );
}
