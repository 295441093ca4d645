// src/config.rs

//! Font loading options.
//!
//! Kept `serde`-friendly so engines can embed font settings directly in
//! their configuration files. Missing fields fall back to defaults, which
//! lets configs stay minimal.

use serde::{Deserialize, Serialize};

/// Options applied when a font is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontOptions {
    /// Nominal size in points. Rendered at 96 dpi for scalable faces.
    pub point_size: f32,
    /// Outline (stroke) width in pixels. Zero disables outlining;
    /// negative values are clamped to zero.
    pub outline_width: f32,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            point_size: 12.0,
            outline_width: 0.0,
        }
    }
}

impl FontOptions {
    /// Options for a plain (unoutlined) font at `point_size`.
    pub fn sized(point_size: f32) -> Self {
        Self {
            point_size,
            ..Self::default()
        }
    }

    /// Adds an outline of `width` pixels.
    pub fn with_outline(mut self, width: f32) -> Self {
        self.outline_width = width;
        self
    }
}
