// src/raster/stroke.rs

//! Outline stroking as grayscale dilation.
//!
//! An outlined glyph is the fill coverage expanded by the stroke radius in
//! every direction. Expansion is a max-dilation with a soft disk kernel:
//!
//! ```text
//! k(dx, dy) = clamp(radius + 0.5 − √(dx² + dy²), 0, 1) · 255
//! out(p)    = max over (dx, dy) of fill(p + (dx, dy)) · k(dx, dy) / 255
//! ```
//!
//! The half-pixel term antialiases the stroke rim the same way the fill
//! edges are antialiased, and the ink bounding box grows by up to
//! ⌈radius⌉ on each side, which is the estimate the atlas packer sizes
//! cells against.

use super::{span_bounds, Span};

/// Expands span coverage by `radius` pixels on every side.
///
/// A non-positive radius or an empty span set returns the input unchanged.
pub fn dilate(spans: &[Span], radius: f32) -> Vec<Span> {
    let Some(bounds) = span_bounds(spans) else {
        return Vec::new();
    };
    if radius <= 0.0 {
        return spans.to_vec();
    }

    let r = radius.ceil() as i32;
    let origin_x = bounds.min_x - r;
    let origin_y = bounds.min_y - r;
    let w = (bounds.width() + 2 * r as u32) as usize;
    let h = (bounds.height() + 2 * r as u32) as usize;

    let mut fill = vec![0u8; w * h];
    for s in spans {
        let row = (s.y - origin_y) as usize;
        let col = (s.x - origin_x) as usize;
        for i in 0..s.len as usize {
            let cell = &mut fill[row * w + col + i];
            *cell = (*cell).max(s.coverage);
        }
    }

    let kernel = disk_kernel(radius, r);

    let mut out = Vec::new();
    let mut row_buf = vec![0u8; w];
    for y in 0..h as i32 {
        for (x, cell) in row_buf.iter_mut().enumerate() {
            let mut best = 0u8;
            for &(dx, dy, k) in &kernel {
                let sx = x as i32 + dx;
                let sy = y + dy;
                if sx < 0 || sy < 0 || sx >= w as i32 || sy >= h as i32 {
                    continue;
                }
                let src = fill[sy as usize * w + sx as usize];
                if src == 0 {
                    continue;
                }
                best = best.max((src as u32 * k as u32 / 255) as u8);
                if best == 255 {
                    break;
                }
            }
            *cell = best;
        }
        emit_runs(&row_buf, origin_x, origin_y + y, &mut out);
    }
    out
}

fn disk_kernel(radius: f32, r: i32) -> Vec<(i32, i32, u8)> {
    let mut kernel = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            let k = ((radius + 0.5 - dist).clamp(0.0, 1.0) * 255.0).round() as u8;
            if k > 0 {
                kernel.push((dx, dy, k));
            }
        }
    }
    // Strongest weights first so the early-out at full coverage triggers
    // as soon as possible.
    kernel.sort_by(|a, b| b.2.cmp(&a.2));
    kernel
}

fn emit_runs(row: &[u8], origin_x: i32, y: i32, out: &mut Vec<Span>) {
    let mut run_start = 0usize;
    let mut run_coverage = 0u8;
    for (i, &c) in row.iter().enumerate() {
        if c != run_coverage {
            if run_coverage != 0 {
                out.push(Span::new(
                    origin_x + run_start as i32,
                    y,
                    (i - run_start) as u32,
                    run_coverage,
                ));
            }
            run_start = i;
            run_coverage = c;
        }
    }
    if run_coverage != 0 {
        out.push(Span::new(
            origin_x + run_start as i32,
            y,
            (row.len() - run_start) as u32,
            run_coverage,
        ));
    }
}
