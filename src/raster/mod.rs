// src/raster/mod.rs

//! The raster-engine seam.
//!
//! [`RasterEngine`] abstracts the font parser and scan converter behind a
//! trait so the font cache can be driven by the production TrueType engine
//! ([`TtfEngine`]) or by a mock in tests. The contract is deliberately
//! narrow: open a face, activate a character size, enumerate the charmap,
//! and produce coverage spans per glyph.
//!
//! ## Units
//!
//! Glyph metrics cross this boundary in 26.6 fixed point (64 units per
//! pixel), face-level metrics in whole pixels, sizes in points. Span
//! coordinates are pixels relative to the glyph origin on the baseline,
//! with y growing upward.

pub mod coverage;
pub mod outline;
pub mod stroke;
pub mod ttf;

pub use ttf::TtfEngine;

use std::sync::Arc;

use bitflags::bitflags;

use crate::error::FontError;

/// 26.6 fixed-point value: 64 units per pixel (or per point, at the
/// size-selection boundary).
pub type F26Dot6 = i32;

/// Converts a 26.6 fixed-point value to pixels.
pub const F26DOT6_TO_PX: f32 = 1.0 / 64.0;

bitflags! {
    /// Capabilities of an opened face.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FaceFlags: u32 {
        /// The face has scalable outlines.
        const SCALABLE = 1 << 0;
        /// The face carries fixed (bitmap strike) sizes.
        const FIXED_SIZES = 1 << 1;
    }
}

/// Vertical metrics of a face at its active size, in pixels.
///
/// `descender` is zero or negative (distance below the baseline), and
/// `height` is the baseline-to-baseline line height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceMetrics {
    pub ascender: f32,
    pub descender: f32,
    pub height: f32,
}

/// Metrics of a single glyph at the active size, in 26.6 fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    /// Outline bounding-box width.
    pub width: F26Dot6,
    /// Outline bounding-box height.
    pub height: F26Dot6,
    /// Horizontal pen advance.
    pub hori_advance: F26Dot6,
    /// Left-side bearing of the outline box.
    pub hori_bearing_x: F26Dot6,
    /// Distance from the baseline up to the outline box top.
    pub hori_bearing_y: F26Dot6,
}

impl GlyphMetrics {
    pub fn width_px(&self) -> f32 {
        self.width as f32 * F26DOT6_TO_PX
    }

    pub fn height_px(&self) -> f32 {
        self.height as f32 * F26DOT6_TO_PX
    }

    pub fn advance_px(&self) -> f32 {
        self.hori_advance as f32 * F26DOT6_TO_PX
    }

    pub fn bearing_x_px(&self) -> f32 {
        self.hori_bearing_x as f32 * F26DOT6_TO_PX
    }

    pub fn bearing_y_px(&self) -> f32 {
        self.hori_bearing_y as f32 * F26DOT6_TO_PX
    }
}

/// A horizontal run of pixels sharing one coverage value.
///
/// Coordinates are relative to the glyph origin: `x` is the leftmost pixel
/// column of the run, `y` the pixel row counted upward from the baseline
/// row. `coverage` is 0 (blank, normally not emitted) to 255 (solid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x: i32,
    pub y: i32,
    pub len: u32,
    pub coverage: u8,
}

impl Span {
    pub const fn new(x: i32, y: i32, len: u32, coverage: u8) -> Self {
        Self { x, y, len, coverage }
    }
}

/// Integer bounds of a span set. `max_x` is exclusive, `max_y` is the
/// topmost occupied row (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl SpanBounds {
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y + 1) as u32
    }

    /// Smallest bounds covering both `self` and `other`.
    pub fn union(self, other: SpanBounds) -> SpanBounds {
        SpanBounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Bounds of `spans`, or `None` for an empty set.
pub fn span_bounds(spans: &[Span]) -> Option<SpanBounds> {
    let first = spans.first()?;
    let mut b = SpanBounds {
        min_x: first.x,
        max_x: first.x + first.len as i32,
        min_y: first.y,
        max_y: first.y,
    };
    for s in &spans[1..] {
        b.min_x = b.min_x.min(s.x);
        b.max_x = b.max_x.max(s.x + s.len as i32);
        b.min_y = b.min_y.min(s.y);
        b.max_y = b.max_y.max(s.y);
    }
    Some(b)
}

/// A font parser and scan converter.
///
/// One engine instance serves every font in the process; per-font state
/// lives in the associated `Face`. All glyph-level methods return `Option`
/// rather than `Result` because a missing or broken glyph is an expected,
/// recoverable condition handled by the font cache.
pub trait RasterEngine {
    /// Per-font face state.
    type Face;

    /// Parses font bytes into a face. Fails on malformed data or a face
    /// without a usable unicode character map.
    fn open_face(&self, data: Arc<[u8]>) -> Result<Self::Face, FontError>;

    /// Capability flags of the face.
    fn face_flags(&self, face: &Self::Face) -> FaceFlags;

    /// Fixed strike sizes in points, for faces that carry them.
    fn fixed_sizes(&self, face: &Self::Face) -> Vec<f32>;

    /// Activates a character size. `size` is in 26.6 points; a `dpi` of
    /// zero means 72 (one point per pixel).
    fn set_char_size(
        &self,
        face: &mut Self::Face,
        size: F26Dot6,
        dpi: u32,
    ) -> Result<(), FontError>;

    /// Vertical metrics at the active size.
    fn face_metrics(&self, face: &Self::Face) -> FaceMetrics;

    /// Every codepoint in the face's character map, in charmap order.
    fn codepoints(&self, face: &Self::Face) -> Vec<u32>;

    /// Metrics for one codepoint at the active size, or `None` when the
    /// codepoint maps to no glyph or the glyph fails to load.
    fn glyph_metrics(&self, face: &Self::Face, codepoint: u32) -> Option<GlyphMetrics>;

    /// Coverage spans of the filled outline. `Some(vec![])` for glyphs
    /// with no ink (spaces); `None` when the glyph fails to load.
    fn fill_spans(&self, face: &Self::Face, codepoint: u32) -> Option<Vec<Span>>;

    /// Coverage spans of the outline expanded by `radius` pixels on every
    /// side, for stroked rendering.
    fn stroke_spans(&self, face: &Self::Face, codepoint: u32, radius: f32)
        -> Option<Vec<Span>>;
}
