// src/raster/coverage.rs

//! Scanline conversion of edge lists into coverage spans.
//!
//! Fill rule is nonzero winding. Each pixel row is sampled on 4 horizontal
//! scanlines; along each scanline the covered x-intervals are computed
//! exactly from the sorted edge crossings, and their per-pixel overlap is
//! accumulated. The result quantizes to one byte of coverage per pixel,
//! emitted as maximal runs of equal coverage.

use super::outline::Edge;
use super::Span;

/// Vertical scanlines sampled per pixel row.
const SUBSAMPLES: u32 = 4;

/// Converts an edge list (pixel space, y-up) into coverage spans.
///
/// Span coordinates stay in the edge list's coordinate system; callers get
/// rows counted upward, matching the glyph-origin convention.
pub fn rasterize(edges: &[Edge]) -> Vec<Span> {
    let Some(bounds) = edge_bounds(edges) else {
        return Vec::new();
    };
    let (min_x, max_x, min_y, max_y) = bounds;

    let x_origin = min_x.floor() as i32;
    let width = (max_x.ceil() as i32 - x_origin).max(0) as usize;
    if width == 0 {
        return Vec::new();
    }
    let y_lo = min_y.floor() as i32;
    let y_hi = max_y.ceil() as i32;

    let mut spans = Vec::new();
    let mut acc = vec![0.0f32; width];
    let mut crossings: Vec<(f32, i32)> = Vec::new();

    for row in y_lo..y_hi {
        acc.fill(0.0);
        for sub in 0..SUBSAMPLES {
            let ys = row as f32 + (sub as f32 + 0.5) / SUBSAMPLES as f32;
            crossings.clear();
            for e in edges {
                let (y_min, y_max) = if e.y1 > e.y0 {
                    (e.y0, e.y1)
                } else {
                    (e.y1, e.y0)
                };
                if ys >= y_min && ys < y_max {
                    let t = (ys - e.y0) / (e.y1 - e.y0);
                    let x = e.x0 + t * (e.x1 - e.x0);
                    let dir = if e.y1 > e.y0 { 1 } else { -1 };
                    crossings.push((x, dir));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0i32;
            let mut interval_start = 0.0f32;
            for &(x, dir) in &crossings {
                let was_inside = winding != 0;
                winding += dir;
                if !was_inside && winding != 0 {
                    interval_start = x;
                } else if was_inside && winding == 0 {
                    accumulate(&mut acc, x_origin, interval_start, x);
                }
            }
        }
        emit_row_spans(&acc, x_origin, row, &mut spans);
    }
    spans
}

fn edge_bounds(edges: &[Edge]) -> Option<(f32, f32, f32, f32)> {
    let first = edges.first()?;
    let mut min_x = first.x0.min(first.x1);
    let mut max_x = first.x0.max(first.x1);
    let mut min_y = first.y0.min(first.y1);
    let mut max_y = first.y0.max(first.y1);
    for e in &edges[1..] {
        min_x = min_x.min(e.x0.min(e.x1));
        max_x = max_x.max(e.x0.max(e.x1));
        min_y = min_y.min(e.y0.min(e.y1));
        max_y = max_y.max(e.y0.max(e.y1));
    }
    Some((min_x, max_x, min_y, max_y))
}

/// Adds the overlap of `[a, b)` with each pixel cell to the accumulator.
fn accumulate(acc: &mut [f32], x_origin: i32, a: f32, b: f32) {
    let lo = x_origin as f32;
    let hi = lo + acc.len() as f32;
    let a = a.max(lo);
    let b = b.min(hi);
    if a >= b {
        return;
    }
    let first = (a.floor() as i32 - x_origin).max(0) as usize;
    let last = ((b.ceil() as i32 - x_origin).max(0) as usize).min(acc.len());
    for (i, cell) in acc.iter_mut().enumerate().take(last).skip(first) {
        let cell_lo = lo + i as f32;
        let overlap = (b.min(cell_lo + 1.0) - a.max(cell_lo)).max(0.0);
        *cell += overlap;
    }
}

fn emit_row_spans(acc: &[f32], x_origin: i32, row: i32, out: &mut Vec<Span>) {
    let quantize = |a: f32| -> u8 {
        ((a * (255.0 / SUBSAMPLES as f32)).round() as i32).clamp(0, 255) as u8
    };

    let mut run_start = 0usize;
    let mut run_coverage = 0u8;
    for (i, &a) in acc.iter().enumerate() {
        let c = quantize(a);
        if c != run_coverage {
            if run_coverage != 0 {
                out.push(Span::new(
                    x_origin + run_start as i32,
                    row,
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
            x_origin + run_start as i32,
            row,
            (acc.len() - run_start) as u32,
            run_coverage,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed polygon from vertices, y-up. Horizontal edges are dropped at
    /// rasterization time (they never produce crossings), so they are not
    /// filtered here.
    fn polygon(points: &[(f32, f32)]) -> Vec<Edge> {
        let mut edges = Vec::new();
        for i in 0..points.len() {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            if y0 != y1 {
                edges.push(Edge { x0, y0, x1, y1 });
            }
        }
        edges
    }

    fn row_spans(spans: &[Span], y: i32) -> Vec<Span> {
        spans.iter().copied().filter(|s| s.y == y).collect()
    }

    #[test]
    fn empty_edge_list_produces_no_spans() {
        assert!(rasterize(&[]).is_empty());
    }

    #[test]
    fn axis_aligned_square_is_solid() {
        let edges = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let spans = rasterize(&edges);
        assert_eq!(spans.len(), 4, "one solid span per row");
        for y in 0..4 {
            let row = row_spans(&spans, y);
            assert_eq!(row, vec![Span::new(0, y, 4, 255)]);
        }
    }

    #[test]
    fn fractional_right_edge_gets_partial_coverage() {
        let edges = polygon(&[(0.0, 0.0), (3.5, 0.0), (3.5, 2.0), (0.0, 2.0)]);
        let spans = rasterize(&edges);
        for y in 0..2 {
            let row = row_spans(&spans, y);
            assert_eq!(
                row,
                vec![Span::new(0, y, 3, 255), Span::new(3, y, 1, 128)],
                "half-covered boundary column rounds to 128"
            );
        }
    }

    #[test]
    fn opposite_winding_cuts_a_hole() {
        let mut edges = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        // Inner contour wound the other way.
        edges.extend(polygon(&[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)]));
        let spans = rasterize(&edges);
        let row = row_spans(&spans, 2);
        assert_eq!(
            row,
            vec![Span::new(0, 2, 1, 255), Span::new(3, 2, 1, 255)],
            "hole rows keep only the outer shell"
        );
        // Rows outside the hole stay solid.
        assert_eq!(row_spans(&spans, 0), vec![Span::new(0, 0, 4, 255)]);
    }

    #[test]
    fn same_winding_overlap_stays_solid() {
        let mut edges = polygon(&[(0.0, 0.0), (3.0, 0.0), (3.0, 2.0), (0.0, 2.0)]);
        edges.extend(polygon(&[(2.0, 0.0), (5.0, 0.0), (5.0, 2.0), (2.0, 2.0)]));
        let spans = rasterize(&edges);
        for y in 0..2 {
            assert_eq!(
                row_spans(&spans, y),
                vec![Span::new(0, y, 5, 255)],
                "nonzero winding merges overlapping contours"
            );
        }
    }

    #[test]
    fn diagonal_edge_antialiases() {
        // Right triangle with the hypotenuse from (4,0) to (0,4).
        let edges = polygon(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        let spans = rasterize(&edges);
        let row = row_spans(&spans, 0);
        assert_eq!(
            row,
            vec![Span::new(0, 0, 3, 255), Span::new(3, 0, 1, 128)],
            "bottom row: three solid columns and a half-covered one"
        );
        let top = row_spans(&spans, 3);
        assert_eq!(top, vec![Span::new(0, 3, 1, 128)]);
    }

    #[test]
    fn zero_width_contour_has_no_area() {
        let edges = vec![
            Edge { x0: 2.0, y0: 0.0, x1: 2.0, y1: 4.0 },
            Edge { x0: 2.0, y0: 4.0, x1: 2.0, y1: 0.0 },
        ];
        assert!(rasterize(&edges).is_empty());
    }

    #[test]
    fn spans_sit_below_the_baseline_for_descenders() {
        let edges = polygon(&[(0.0, -2.0), (2.0, -2.0), (2.0, 0.0), (0.0, 0.0)]);
        let spans = rasterize(&edges);
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|s| s.y < 0));
    }
}
