// src/lib.rs

//! # glyphpack
//!
//! Font glyph rasterization and texture-atlas packing for 2D renderers.
//!
//! A [`Font`] parses a TrueType/OpenType file, records metrics for every
//! mapped codepoint up front, and rasterizes glyphs lazily in 256-codepoint
//! pages. Each rasterization pass shelf-packs coverage bitmaps into the
//! smallest power-of-two atlas that fits, then uploads the atlas through a
//! caller-supplied [`GlyphSink`]. The crate never touches a GPU or a window
//! itself; backends implement the sink over whatever renderer they drive.
//!
//! ```no_run
//! use std::rc::Rc;
//! use glyphpack::{Font, FontOptions, FontRegistry, TtfEngine};
//! # use glyphpack::{GlyphSink, RectF, TextureId, Vector2};
//! # struct MySink;
//! # impl GlyphSink for MySink {
//! #     fn create_texture_from_memory(&self, _: &[u8]) -> TextureId { TextureId(1) }
//! #     fn destroy_texture(&self, _: TextureId) {}
//! #     fn draw_textured_rect(&self, _: TextureId, _: RectF, _: RectF,
//! #         _: f32, _: f32, _: u32, _: u32) {}
//! # }
//!
//! let sink: Rc<dyn GlyphSink> = Rc::new(MySink);
//! let mut font = Font::from_file(
//!     TtfEngine::acquire(),
//!     sink,
//!     "DejaVuSans.ttf",
//!     FontOptions::sized(16.0),
//! )?;
//! let width = font.text_width("hello", 1.0);
//! font.draw_text("hello", Vector2::new(10.0, 10.0), 1.0);
//! # Ok::<(), glyphpack::FontError>(())
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod geometry;
pub mod raster;
pub mod registry;
pub mod sink;
pub mod tga;

pub use config::FontOptions;
pub use error::FontError;
pub use font::{Font, FontGlyph, FontImage, FontImageset, ImageSlot};
pub use geometry::{pixel_aligned, RectF, Vector2};
pub use raster::{RasterEngine, Span, TtfEngine};
pub use registry::{FontId, FontRegistry};
pub use sink::{GlyphSink, TextureId};
