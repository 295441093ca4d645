// src/geometry.rs

//! Small value types shared across the font pipeline.
//!
//! Screen space is y-down with the origin at the top-left; glyph span space
//! is y-up around the baseline. Conversions happen at the atlas compositing
//! step, everything here is coordinate-system agnostic.

use std::ops::{Add, Mul, Sub};

/// A 2D point or extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

/// An axis-aligned rectangle with float coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// True when the interiors of `self` and `other` overlap. Rects that
    /// merely touch at an edge do not intersect; zero-area rects never do.
    pub fn intersects(&self, other: &RectF) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True when `other` lies entirely within `self` (edges may coincide).
    pub fn contains(&self, other: &RectF) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Rounds to a whole pixel, half away from zero.
///
/// Glyph placement and scaled image sizes go through this so that text
/// rendered at integral positions stays crisp.
pub fn pixel_aligned(value: f32) -> f32 {
    (value + if value > 0.0 { 0.5 } else { -0.5 }) as i32 as f32
}
