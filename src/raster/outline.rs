// src/raster/outline.rs

//! Glyph outline flattening.
//!
//! [`EdgeBuilder`] implements `ttf_parser::OutlineBuilder`, scaling font
//! units into pixel space and flattening quadratic and cubic Béziers into
//! straight edges. The scan converter ([`super::coverage`]) consumes the
//! resulting edge list; it only needs crossings, so horizontal edges are
//! dropped at the source.

use ttf_parser::OutlineBuilder;

type Point = [f32; 2];

/// A non-horizontal line segment in pixel space, y-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Collects scaled, flattened outline edges.
pub struct EdgeBuilder {
    scale: f32,
    edges: Vec<Edge>,
    start: Point,
    current: Point,
}

/// Curve subdivision stops below this chord length squared (0.5 px).
const MIN_LEN_SQ: f32 = 0.25;
/// Curve subdivision stops past this recursion depth.
const MAX_DEPTH: u32 = 8;
/// A quadratic whose control point sits within this distance of the chord
/// midpoint is treated as flat.
const FLATNESS: f32 = 0.25;

impl EdgeBuilder {
    /// `scale` converts font units to pixels.
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            edges: Vec::new(),
            start: [0.0, 0.0],
            current: [0.0, 0.0],
        }
    }

    pub fn finish(self) -> Vec<Edge> {
        self.edges
    }

    fn transform(&self, x: f32, y: f32) -> Point {
        [x * self.scale, y * self.scale]
    }

    fn push_edge(&mut self, p0: Point, p1: Point) {
        if p0[1] != p1[1] {
            self.edges.push(Edge {
                x0: p0[0],
                y0: p0[1],
                x1: p1[0],
                y1: p1[1],
            });
        }
    }

    fn subdivide_quad(&mut self, p0: Point, p1: Point, p2: Point, depth: u32) {
        let mid = lerp(p0, p2, 0.5);
        let dx = p1[0] - mid[0];
        let dy = p1[1] - mid[1];
        if depth > MAX_DEPTH || dx * dx + dy * dy < FLATNESS * FLATNESS {
            self.push_edge(p0, p2);
            return;
        }
        let p01 = lerp(p0, p1, 0.5);
        let p12 = lerp(p1, p2, 0.5);
        let p012 = lerp(p01, p12, 0.5);
        self.subdivide_quad(p0, p01, p012, depth + 1);
        self.subdivide_quad(p012, p12, p2, depth + 1);
    }

    fn subdivide_cubic(&mut self, p0: Point, p1: Point, p2: Point, p3: Point, depth: u32) {
        let d03 = (p3[0] - p0[0]).powi(2) + (p3[1] - p0[1]).powi(2);
        if depth > MAX_DEPTH || d03 < MIN_LEN_SQ {
            self.push_edge(p0, p3);
            return;
        }
        let p01 = lerp(p0, p1, 0.5);
        let p12 = lerp(p1, p2, 0.5);
        let p23 = lerp(p2, p3, 0.5);
        let p012 = lerp(p01, p12, 0.5);
        let p123 = lerp(p12, p23, 0.5);
        let p0123 = lerp(p012, p123, 0.5);
        self.subdivide_cubic(p0, p01, p012, p0123, depth + 1);
        self.subdivide_cubic(p0123, p123, p23, p3, depth + 1);
    }
}

impl OutlineBuilder for EdgeBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.current = self.transform(x, y);
        self.start = self.current;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p1 = self.transform(x, y);
        self.push_edge(self.current, p1);
        self.current = p1;
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p1 = self.transform(x1, y1);
        let p2 = self.transform(x, y);
        self.subdivide_quad(self.current, p1, p2, 0);
        self.current = p2;
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p1 = self.transform(x1, y1);
        let p2 = self.transform(x2, y2);
        let p3 = self.transform(x, y);
        self.subdivide_cubic(self.current, p1, p2, p3, 0);
        self.current = p3;
    }

    fn close(&mut self) {
        if (self.current[0] - self.start[0]).abs() > 1e-4
            || (self.current[1] - self.start[1]).abs() > 1e-4
        {
            self.push_edge(self.current, self.start);
            self.current = self.start;
        }
    }
}

fn lerp(p0: Point, p1: Point, t: f32) -> Point {
    [p0[0] + (p1[0] - p0[0]) * t, p0[1] + (p1[1] - p0[1]) * t]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_become_single_edges() {
        let mut b = EdgeBuilder::new(1.0);
        b.move_to(0.0, 0.0);
        b.line_to(4.0, 8.0);
        let edges = b.finish();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0], Edge { x0: 0.0, y0: 0.0, x1: 4.0, y1: 8.0 });
    }

    #[test]
    fn horizontal_edges_are_dropped() {
        let mut b = EdgeBuilder::new(1.0);
        b.move_to(0.0, 5.0);
        b.line_to(10.0, 5.0);
        assert!(b.finish().is_empty());
    }

    #[test]
    fn degenerate_quad_flattens_to_one_edge() {
        // Control point on the chord: already flat.
        let mut b = EdgeBuilder::new(1.0);
        b.move_to(0.0, 0.0);
        b.quad_to(2.0, 2.0, 4.0, 4.0);
        assert_eq!(b.finish().len(), 1);
    }

    #[test]
    fn curved_quad_subdivides_and_stays_connected() {
        let mut b = EdgeBuilder::new(1.0);
        b.move_to(0.0, 0.0);
        b.quad_to(8.0, 16.0, 16.0, 0.0);
        let edges = b.finish();
        assert!(edges.len() > 1, "a bowed quad must subdivide");
        assert_eq!(edges.first().unwrap().x0, 0.0);
        assert_eq!(edges.last().unwrap().x1, 16.0);
        for pair in edges.windows(2) {
            assert_eq!(pair[0].x1, pair[1].x0);
            assert_eq!(pair[0].y1, pair[1].y0);
        }
    }

    #[test]
    fn cubic_subdivides_toward_endpoint() {
        let mut b = EdgeBuilder::new(1.0);
        b.move_to(0.0, 0.0);
        b.curve_to(0.0, 10.0, 10.0, -10.0, 10.0, 1.0);
        let edges = b.finish();
        assert!(edges.len() > 1);
        assert_eq!(edges.last().unwrap().x1, 10.0);
        assert_eq!(edges.last().unwrap().y1, 1.0);
    }

    #[test]
    fn close_bridges_the_remaining_gap() {
        let mut b = EdgeBuilder::new(1.0);
        b.move_to(0.0, 0.0);
        b.line_to(4.0, 0.5);
        b.line_to(4.0, 4.0);
        b.close();
        let edges = b.finish();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges.last().unwrap().x1, 0.0);
        assert_eq!(edges.last().unwrap().y1, 0.0);
    }

    #[test]
    fn scale_applies_to_every_point() {
        let mut b = EdgeBuilder::new(0.5);
        b.move_to(0.0, 0.0);
        b.line_to(8.0, 4.0);
        let edges = b.finish();
        assert_eq!(edges[0].x1, 4.0);
        assert_eq!(edges[0].y1, 2.0);
    }
}
