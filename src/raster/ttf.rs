// src/raster/ttf.rs

//! Production raster engine over `ttf-parser`.
//!
//! One [`TtfEngine`] is shared by every font in the process, acquired with
//! [`TtfEngine::acquire`] and torn down automatically when the last font
//! drops its handle.
//!
//! `ttf_parser::Face` borrows the font bytes it was parsed from, so faces
//! are not stored across calls. Everything the infallible trait methods
//! need (flags, charmap, vertical metrics) is captured into [`TtfFace`] at
//! open time; glyph-level calls re-parse on demand, which is a cheap
//! header walk over the shared byte buffer.

use std::sync::{Arc, Mutex, Weak};

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use ttf_parser::Face;

use super::coverage;
use super::outline::EdgeBuilder;
use super::stroke;
use super::{F26Dot6, FaceFlags, FaceMetrics, GlyphMetrics, RasterEngine, Span, F26DOT6_TO_PX};
use crate::error::FontError;

/// The process-wide engine slot. Holds a weak handle so the engine lives
/// exactly as long as some font needs it.
static SHARED_ENGINE: Lazy<Mutex<Weak<TtfEngine>>> = Lazy::new(|| Mutex::new(Weak::new()));

/// TrueType/OpenType raster engine.
pub struct TtfEngine {
    _private: (),
}

impl TtfEngine {
    /// Returns the shared engine, creating it if no font currently holds
    /// one. Handles from concurrent callers alias the same instance.
    pub fn acquire() -> Arc<TtfEngine> {
        let mut slot = SHARED_ENGINE.lock().unwrap();
        if let Some(engine) = slot.upgrade() {
            debug!("reusing shared TrueType engine");
            return engine;
        }
        info!("initializing TrueType engine");
        let engine = Arc::new(TtfEngine { _private: () });
        *slot = Arc::downgrade(&engine);
        engine
    }

    fn reparse<'a>(&self, face: &'a TtfFace) -> Option<Face<'a>> {
        match Face::parse(&face.data, 0) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!("font data no longer parses: {err}");
                None
            }
        }
    }
}

impl Drop for TtfEngine {
    fn drop(&mut self) {
        info!("tearing down TrueType engine");
    }
}

/// Per-font state for [`TtfEngine`].
pub struct TtfFace {
    data: Arc<[u8]>,
    flags: FaceFlags,
    units_per_em: u16,
    ascender_units: i16,
    descender_units: i16,
    line_gap_units: i16,
    codepoints: Vec<u32>,
    /// Pixels per font unit at the active size; zero until a size is set.
    scale: f32,
    metrics: FaceMetrics,
}

/// Font units to 26.6 fixed-point pixels at `scale` pixels per unit.
fn to_f26dot6(units: f32, scale: f32) -> F26Dot6 {
    (units * scale * 64.0).round() as F26Dot6
}

impl RasterEngine for TtfEngine {
    type Face = TtfFace;

    fn open_face(&self, data: Arc<[u8]>) -> Result<TtfFace, FontError> {
        if data.is_empty() {
            return Err(FontError::EmptyFontData);
        }
        let face = Face::parse(&data, 0)?;

        let mut flags = FaceFlags::empty();
        let tables = face.tables();
        if tables.glyf.is_some() || tables.cff.is_some() {
            flags |= FaceFlags::SCALABLE;
        }

        // Pick the unicode cmap subtable with the widest coverage; fonts
        // often carry a BMP-only table next to a full-repertoire one.
        let Some(cmap) = tables.cmap else {
            return Err(FontError::MissingCharmap);
        };
        let mut codepoints: Vec<u32> = Vec::new();
        let mut found_unicode = false;
        for subtable in cmap.subtables {
            if !subtable.is_unicode() {
                continue;
            }
            found_unicode = true;
            let mut list = Vec::new();
            subtable.codepoints(|cp| {
                let mapped = char::from_u32(cp)
                    .and_then(|ch| face.glyph_index(ch))
                    .is_some();
                if mapped {
                    list.push(cp);
                }
            });
            if list.len() > codepoints.len() {
                codepoints = list;
            }
        }
        if !found_unicode {
            return Err(FontError::MissingCharmap);
        }
        codepoints.sort_unstable();
        codepoints.dedup();

        debug!(
            "opened face: {} mapped codepoints, flags {:?}",
            codepoints.len(),
            flags
        );

        Ok(TtfFace {
            flags,
            units_per_em: face.units_per_em(),
            ascender_units: face.ascender(),
            descender_units: face.descender(),
            line_gap_units: face.line_gap(),
            codepoints,
            scale: 0.0,
            metrics: FaceMetrics::default(),
            data,
        })
    }

    fn face_flags(&self, face: &TtfFace) -> FaceFlags {
        face.flags
    }

    fn fixed_sizes(&self, _face: &TtfFace) -> Vec<f32> {
        // Bitmap strike enumeration is not exposed by the parser; faces
        // without outlines are rejected at size selection instead.
        Vec::new()
    }

    fn set_char_size(
        &self,
        face: &mut TtfFace,
        size: F26Dot6,
        dpi: u32,
    ) -> Result<(), FontError> {
        let points = size as f32 * F26DOT6_TO_PX;
        if !face.flags.contains(FaceFlags::SCALABLE) {
            return Err(FontError::NoUsableSize(points));
        }
        let dpi = if dpi == 0 { 72 } else { dpi };
        let ppem = points * dpi as f32 / 72.0;
        if ppem <= 0.0 || face.units_per_em == 0 {
            return Err(FontError::InvalidPointSize(points));
        }
        face.scale = ppem / face.units_per_em as f32;
        face.metrics = FaceMetrics {
            ascender: face.ascender_units as f32 * face.scale,
            descender: face.descender_units as f32 * face.scale,
            height: (face.ascender_units as f32 - face.descender_units as f32
                + face.line_gap_units as f32)
                * face.scale,
        };
        Ok(())
    }

    fn face_metrics(&self, face: &TtfFace) -> FaceMetrics {
        face.metrics
    }

    fn codepoints(&self, face: &TtfFace) -> Vec<u32> {
        face.codepoints.clone()
    }

    fn glyph_metrics(&self, face: &TtfFace, codepoint: u32) -> Option<GlyphMetrics> {
        let parsed = self.reparse(face)?;
        let ch = char::from_u32(codepoint)?;
        let glyph = parsed.glyph_index(ch)?;
        let advance = parsed.glyph_hor_advance(glyph).unwrap_or(0) as f32;
        // Glyphs with no outline (spaces) keep their advance and report a
        // zero-size box.
        let (width, height, bearing_x, bearing_y) = match parsed.glyph_bounding_box(glyph) {
            Some(bbox) => (
                bbox.width() as f32,
                bbox.height() as f32,
                bbox.x_min as f32,
                bbox.y_max as f32,
            ),
            None => (0.0, 0.0, 0.0, 0.0),
        };
        let s = face.scale;
        Some(GlyphMetrics {
            width: to_f26dot6(width, s),
            height: to_f26dot6(height, s),
            hori_advance: to_f26dot6(advance, s),
            hori_bearing_x: to_f26dot6(bearing_x, s),
            hori_bearing_y: to_f26dot6(bearing_y, s),
        })
    }

    fn fill_spans(&self, face: &TtfFace, codepoint: u32) -> Option<Vec<Span>> {
        let parsed = self.reparse(face)?;
        let ch = char::from_u32(codepoint)?;
        let glyph = parsed.glyph_index(ch)?;
        let mut builder = EdgeBuilder::new(face.scale);
        // `None` here means an inkless glyph, not a failure.
        let _ = parsed.outline_glyph(glyph, &mut builder);
        Some(coverage::rasterize(&builder.finish()))
    }

    fn stroke_spans(&self, face: &TtfFace, codepoint: u32, radius: f32) -> Option<Vec<Span>> {
        let fill = self.fill_spans(face, codepoint)?;
        Some(stroke::dilate(&fill, radius))
    }
}
