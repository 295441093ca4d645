// src/font/mod.rs

//! The font cache: lazy, page-granular glyph rasterization into shelf-
//! packed texture atlases.
//!
//! A [`Font`] loads its glyph census (codepoints and advances) eagerly at
//! construction but rasterizes nothing until a glyph is first requested.
//! At that point the whole 256-codepoint page around it is rendered in one
//! or more packing passes; each pass picks the smallest power-of-two
//! texture that fits, composites coverage spans into a BGRA pixmap, and
//! uploads it through the [`GlyphSink`] as one atlas. Later requests for
//! any glyph on the page are pure map lookups.
//!
//! Pages are marked rasterized *before* the work happens and are never
//! retried; a glyph whose rendering fails gets a permanent zero-area
//! image so text runs keep working around it.

pub mod glyph;
pub mod image;
pub mod imageset;
pub mod pixmap;


use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, info, trace, warn};

use crate::config::FontOptions;
use crate::error::FontError;
use crate::geometry::{pixel_aligned, RectF, Vector2};
use crate::raster::{span_bounds, F26Dot6, FaceFlags, GlyphMetrics, RasterEngine, Span, SpanBounds};
use crate::sink::GlyphSink;

pub use glyph::{FontGlyph, ImageSlot};
pub use image::FontImage;
pub use imageset::FontImageset;

use pixmap::AtlasPixmap;

/// Codepoints rasterized together when any one of them is requested.
pub const GLYPHS_PER_PAGE: u32 = 256;
/// Width of one word of the page bitset.
const BITS_PER_WORD: u32 = 32;
/// Blank pixels separating packed glyphs.
const INTER_GLYPH_PAD: u32 = 4;
/// Smallest atlas candidate.
const MIN_TEXTURE_SIZE: u32 = 32;
/// Largest atlas a pass may allocate.
const MAX_TEXTURE_SIZE: u32 = 4096;
/// Rendering resolution for scalable faces.
const DPI: u32 = 96;

/// A sized, optionally outlined font and its lazily built glyph atlases.
pub struct Font<E: RasterEngine> {
    engine: Arc<E>,
    sink: Rc<dyn GlyphSink>,
    data: Arc<[u8]>,
    face: E::Face,
    point_size: f32,
    outline_width: f32,
    ascender: f32,
    descender: f32,
    height: f32,
    /// Highest codepoint present in the charmap; bounds all lookups.
    max_codepoint: u32,
    /// One bit per page, set when the page's rasterization has run.
    page_loaded: Vec<u32>,
    glyphs: BTreeMap<u32, FontGlyph>,
    imagesets: Vec<FontImageset>,
}

impl<E: RasterEngine> Font<E> {
    /// Loads a font from raw file bytes.
    ///
    /// Derives the vertical metrics at 96 dpi (scalable faces) or picks
    /// the nearest fixed strike on a 72 dpi basis, then records one glyph
    /// entry per mapped codepoint. No rasterization happens here.
    pub fn from_bytes(
        engine: Arc<E>,
        sink: Rc<dyn GlyphSink>,
        data: Arc<[u8]>,
        options: FontOptions,
    ) -> Result<Self, FontError> {
        if options.point_size.is_nan() || options.point_size <= 0.0 {
            return Err(FontError::InvalidPointSize(options.point_size));
        }
        let outline_width = options.outline_width.max(0.0);

        let mut face = engine.open_face(data.clone())?;

        if engine.face_flags(&face).contains(FaceFlags::SCALABLE) {
            engine.set_char_size(&mut face, (options.point_size * 64.0) as F26Dot6, DPI)?;
        } else {
            // Fixed strikes are specified at 72 dpi, so translate the
            // requested 96 dpi size before searching.
            let target = options.point_size * 72.0 / DPI as f32;
            let best = engine
                .fixed_sizes(&face)
                .into_iter()
                .min_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()));
            let Some(best) = best else {
                return Err(FontError::NoUsableSize(options.point_size));
            };
            info!(
                "face is not scalable; substituting the {best}pt strike for {}pt",
                options.point_size
            );
            engine.set_char_size(&mut face, (best * 64.0) as F26Dot6, 0)?;
        }

        let metrics = engine.face_metrics(&face);

        let mut glyphs = BTreeMap::new();
        let mut max_codepoint = 0u32;
        for cp in engine.codepoints(&face) {
            if cp > max_codepoint {
                max_codepoint = cp;
            }
            if let Some(gm) = engine.glyph_metrics(&face, cp) {
                glyphs.insert(cp, FontGlyph::new(gm.advance_px()));
            }
        }

        let pages = (max_codepoint + GLYPHS_PER_PAGE) / GLYPHS_PER_PAGE;
        let words = (pages + BITS_PER_WORD - 1) / BITS_PER_WORD;

        info!(
            "font ready: {} glyphs across {pages} pages at {}pt (outline {outline_width})",
            glyphs.len(),
            options.point_size
        );

        Ok(Self {
            engine,
            sink,
            data,
            face,
            point_size: options.point_size,
            outline_width,
            ascender: metrics.ascender,
            descender: metrics.descender,
            height: metrics.height,
            max_codepoint,
            page_loaded: vec![0; words as usize],
            glyphs,
            imagesets: Vec::new(),
        })
    }

    /// Loads a font file from disk.
    pub fn from_file(
        engine: Arc<E>,
        sink: Rc<dyn GlyphSink>,
        path: impl AsRef<Path>,
        options: FontOptions,
    ) -> Result<Self, FontError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(engine, sink, Arc::from(bytes), options)
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn outline_width(&self) -> f32 {
        self.outline_width
    }

    /// Pixels from the baseline up to the top of the tallest glyph.
    pub fn ascender(&self) -> f32 {
        self.ascender
    }

    /// Pixels from the baseline down to the lowest descender; zero or
    /// negative.
    pub fn descender(&self) -> f32 {
        self.descender
    }

    /// Baseline-to-baseline line height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn line_spacing(&self, scale: f32) -> f32 {
        self.height * scale
    }

    /// Pixel-aligned distance from the top of a line to its baseline.
    pub fn baseline(&self, scale: f32) -> f32 {
        pixel_aligned(self.ascender * scale)
    }

    pub fn max_codepoint(&self) -> u32 {
        self.max_codepoint
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The raw bytes this font was loaded from.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Atlases built so far. Empty until the first glyph request.
    pub fn imagesets(&self) -> &[FontImageset] {
        &self.imagesets
    }

    /// Looks up a glyph, rasterizing its 256-codepoint page on first
    /// touch. Returns `None` past the charmap's highest codepoint and for
    /// codepoints the charmap never contained.
    pub fn glyph(&mut self, codepoint: u32) -> Option<&FontGlyph> {
        if codepoint > self.max_codepoint {
            return None;
        }
        let page = codepoint / GLYPHS_PER_PAGE;
        let word = (page / BITS_PER_WORD) as usize;
        let bit = 1u32 << (page % BITS_PER_WORD);
        if self.page_loaded[word] & bit == 0 {
            // Mark first: a page that fails to rasterize is not retried.
            self.page_loaded[word] |= bit;
            let start = page * GLYPHS_PER_PAGE;
            let end = start + (GLYPHS_PER_PAGE - 1);
            debug!("rasterizing page {page} (U+{start:04X}..=U+{end:04X})");
            self.rasterize(start, end);
        } else {
            trace!("page {page} already rasterized");
        }
        self.glyphs.get(&codepoint)
    }

    /// Resolves a glyph's image handle.
    pub fn image_at(&self, slot: ImageSlot) -> Option<&FontImage> {
        self.imagesets.get(slot.set)?.image(slot.image)
    }

    /// Width in pixels of `text` rendered at `scale`.
    ///
    /// Tracks both the advance cursor and the rightmost rendered edge
    /// (a final glyph can paint past its own advance) and returns the
    /// larger. Codepoints missing from the font contribute nothing.
    pub fn text_width(&mut self, text: &str, scale: f32) -> f32 {
        let mut width = 0.0f32;
        let mut advance_total = 0.0f32;
        for ch in text.chars() {
            let (advance, slot) = match self.glyph(ch as u32) {
                Some(g) => (g.advance(), g.image()),
                None => continue,
            };
            let rendered = slot
                .and_then(|s| self.image_at(s))
                .map(|img| (img.scaled_size().x + img.scaled_offset().x) * scale)
                .unwrap_or(0.0);
            width = width.max(advance_total + rendered);
            advance_total += advance * scale;
            width = width.max(advance_total);
        }
        width
    }

    /// Draws `text` with the top-left of its line box at `position`.
    ///
    /// Emits one textured quad per inked glyph through the sink; glyphs
    /// whose page failed to build still consume their advance, unknown
    /// codepoints are skipped outright.
    pub fn draw_text(&mut self, text: &str, position: Vector2, scale: f32) {
        let base_y = position.y + self.baseline(scale);
        let mut pen_x = position.x;
        for ch in text.chars() {
            let (advance, slot) = match self.glyph(ch as u32) {
                Some(g) => (g.advance(), g.image()),
                None => continue,
            };
            if let Some(slot) = slot {
                if let Some(owner) = self.imagesets.get(slot.set) {
                    if let Some(img) = owner.image(slot.image) {
                        let off_y = img.scaled_offset().y;
                        let pos = Vector2::new(pen_x, base_y - (off_y - off_y * scale));
                        img.draw(owner, pos, img.scaled_size() * scale);
                    }
                }
            }
            pen_x += advance * scale;
        }
    }

    /// Rasterizes every unrendered glyph in `[start, end]`, spilling into
    /// further codepoints while atlas space is left over.
    ///
    /// Each pass sizes one texture for the remaining requested glyphs,
    /// shelf-packs from the traversal cursor until the texture fills, and
    /// commits the atlas. The call completes when the requested range has
    /// been fully visited or no usable texture size exists.
    fn rasterize(&mut self, start: u32, end: u32) {
        let (order, requested) = self.traversal_order(start, end);
        if requested == 0 {
            return;
        }

        let mut cursor = 0usize;
        let mut finished = false;
        while !finished {
            let Some(tex_size) = self.texture_size(&order[..requested]) else {
                return;
            };

            let mut pixmap = AtlasPixmap::new(tex_size);
            let mut set = FontImageset::new(self.sink.clone());
            let set_index = self.imagesets.len();
            let mut placed = 0u32;

            let mut pen_x = INTER_GLYPH_PAD;
            let mut pen_y = INTER_GLYPH_PAD;
            let mut row_bottom = INTER_GLYPH_PAD;

            while cursor < order.len() {
                let cp = order[cursor];
                if self
                    .glyphs
                    .get(&cp)
                    .map(FontGlyph::is_rasterized)
                    .unwrap_or(true)
                {
                    cursor += 1;
                    continue;
                }

                let Some((gm, fill, stroke, bounds)) = self.glyph_ink(cp) else {
                    // No ink or a failed load: a zero-area image marks the
                    // glyph rasterized without consuming atlas space.
                    trace!("glyph U+{cp:04X} has no ink");
                    let image = set.define_image(
                        RectF::new(pen_x as f32, pen_y as f32, 0.0, 0.0),
                        Vector2::new(0.0, 0.0),
                    );
                    self.assign_image(cp, ImageSlot { set: set_index, image });
                    placed += 1;
                    cursor += 1;
                    continue;
                };

                let w = bounds.width();
                let h = bounds.height();
                if pen_x + w + INTER_GLYPH_PAD > tex_size {
                    pen_x = INTER_GLYPH_PAD;
                    pen_y = row_bottom;
                    if pen_x + w + INTER_GLYPH_PAD > tex_size {
                        debug!("glyph U+{cp:04X} is wider than the {tex_size} px atlas");
                        break;
                    }
                }
                if pen_y + h + INTER_GLYPH_PAD > tex_size {
                    debug!("atlas {tex_size} px full at U+{cp:04X}; ending pass");
                    break;
                }

                // Spans are y-up around the glyph origin; the cell's top
                // row corresponds to the highest span row.
                if self.outline_width > 0.0 {
                    for s in &stroke {
                        composite_span(&mut pixmap, pen_x, pen_y, &bounds, s, SpanPass::Stroke);
                    }
                    for s in &fill {
                        composite_span(&mut pixmap, pen_x, pen_y, &bounds, s, SpanPass::BlendFill);
                    }
                } else {
                    for s in &fill {
                        composite_span(&mut pixmap, pen_x, pen_y, &bounds, s, SpanPass::Fill);
                    }
                }

                let area = RectF::new(pen_x as f32, pen_y as f32, w as f32, h as f32);
                let offset = Vector2::new(
                    gm.bearing_x_px(),
                    -gm.bearing_y_px() + self.descender,
                );
                let image = set.define_image(area, offset);
                self.assign_image(cp, ImageSlot { set: set_index, image });
                placed += 1;

                pen_x += w + INTER_GLYPH_PAD;
                row_bottom = row_bottom.max(pen_y + h + INTER_GLYPH_PAD);
                cursor += 1;
            }

            finished = cursor >= requested;

            if placed == 0 {
                // A sized pass that placed nothing can never make
                // progress; keep the glyphs unrendered and bail out.
                warn!("atlas pass at {tex_size} px placed no glyphs; abandoning range");
                return;
            }

            let blob = pixmap.encode_tga();
            let texture = self.sink.create_texture_from_memory(&blob);
            if !texture.is_valid() {
                warn!("texture upload failed for a {tex_size} px atlas");
            }
            set.set_texture(texture, tex_size);
            self.imagesets.push(set);
            debug!("pass committed: {placed} glyphs into a {tex_size} px atlas");
        }
    }

    /// Codepoints a pass visits, in order: the requested range ascending,
    /// then everything above it ascending, then everything below it
    /// descending. Also returns the requested-range prefix length, which
    /// decides when the range counts as finished.
    fn traversal_order(&self, start: u32, end: u32) -> (Vec<u32>, usize) {
        let mut order: Vec<u32> = self.glyphs.range(start..=end).map(|(&cp, _)| cp).collect();
        let requested = order.len();
        order.extend(
            self.glyphs
                .range((Bound::Excluded(end), Bound::Unbounded))
                .map(|(&cp, _)| cp),
        );
        order.extend(self.glyphs.range(..start).rev().map(|(&cp, _)| cp));
        (order, requested)
    }

    /// Metrics, fill spans, stroke spans, and combined ink bounds for one
    /// glyph, or `None` when the glyph cannot produce ink.
    #[allow(clippy::type_complexity)]
    fn glyph_ink(&self, cp: u32) -> Option<(GlyphMetrics, Vec<Span>, Vec<Span>, SpanBounds)> {
        let gm = self.engine.glyph_metrics(&self.face, cp)?;
        let fill = self.engine.fill_spans(&self.face, cp)?;
        let stroke = if self.outline_width > 0.0 {
            self.engine
                .stroke_spans(&self.face, cp, self.outline_width)
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        let bounds = match (span_bounds(&fill), span_bounds(&stroke)) {
            (Some(a), Some(b)) => a.union(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => return None,
        };
        Some((gm, fill, stroke, bounds))
    }

    fn assign_image(&mut self, cp: u32, slot: ImageSlot) {
        if let Some(g) = self.glyphs.get_mut(&cp) {
            g.assign_image(slot);
        }
    }

    /// Smallest power-of-two texture that fits every unrendered glyph of
    /// `codepoints` under the shelf rules, sized from metrics boxes grown
    /// by the outline. `None` when nothing needs placing or when not even
    /// the largest allowed texture fits.
    fn texture_size(&self, codepoints: &[u32]) -> Option<u32> {
        let mut cells: Vec<(u32, u32)> = Vec::new();
        for &cp in codepoints {
            match self.glyphs.get(&cp) {
                Some(g) if !g.is_rasterized() => {}
                _ => continue,
            }
            let Some(gm) = self.engine.glyph_metrics(&self.face, cp) else {
                continue;
            };
            let grow = 2.0 * self.outline_width;
            let w = (gm.width_px() + grow).ceil() as u32 + INTER_GLYPH_PAD;
            let h = (gm.height_px() + grow).ceil() as u32 + INTER_GLYPH_PAD;
            cells.push((w, h));
        }
        if cells.is_empty() {
            return None;
        }

        let mut size = MIN_TEXTURE_SIZE;
        loop {
            if simulate_pack(&cells, size) {
                return Some(size);
            }
            if size >= MAX_TEXTURE_SIZE {
                warn!(
                    "{} glyphs overflow even a {MAX_TEXTURE_SIZE} px atlas; \
                     leaving them unrendered",
                    cells.len()
                );
                return None;
            }
            size *= 2;
        }
    }
}

/// Which compositing rule a span uses.
#[derive(Clone, Copy)]
enum SpanPass {
    /// Direct white write (unoutlined glyphs).
    Fill,
    /// Direct black write (stroke underlay).
    Stroke,
    /// White alpha-blend over the stroke.
    BlendFill,
}

/// Writes one span into the atlas cell at `(pen_x, pen_y)`, flipping the
/// y-up span row into the top-down pixmap.
fn composite_span(
    pixmap: &mut AtlasPixmap,
    pen_x: u32,
    pen_y: u32,
    bounds: &SpanBounds,
    span: &Span,
    pass: SpanPass,
) {
    let row = pen_y as i32 + (bounds.max_y - span.y);
    let col = pen_x as i32 + (span.x - bounds.min_x);
    for i in 0..span.len as i32 {
        let (x, y) = ((col + i) as u32, row as u32);
        match pass {
            SpanPass::Fill => pixmap.write_fill(x, y, span.coverage),
            SpanPass::Stroke => pixmap.write_stroke(x, y, span.coverage),
            SpanPass::BlendFill => pixmap.blend_fill(x, y, span.coverage),
        }
    }
}

/// Shelf-pack simulation used by the texture-size probe. Mirrors the real
/// packer: wrap when a cell passes the right edge, fail the size when a
/// cell passes the bottom or is wider than the shelf itself.
fn simulate_pack(cells: &[(u32, u32)], size: u32) -> bool {
    let mut x = INTER_GLYPH_PAD;
    let mut y = INTER_GLYPH_PAD;
    let mut bottom = INTER_GLYPH_PAD;
    for &(w, h) in cells {
        if x + w > size {
            x = INTER_GLYPH_PAD;
            y = bottom;
            if x + w > size {
                return false;
            }
        }
        if y + h > size {
            return false;
        }
        x += w;
        bottom = bottom.max(y + h);
    }
    true
}
