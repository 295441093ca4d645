// src/error.rs

//! Error type for font loading and rasterization.

use thiserror::Error;

/// Errors produced while loading a font or preparing it for rasterization.
///
/// Glyph-level failures (a codepoint that fails to load or render) are not
/// errors; they degrade to empty glyph images so a single bad glyph cannot
/// take down a text run.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse font data: {0}")]
    Parse(#[from] ttf_parser::FaceParsingError),

    #[error("font has no usable unicode character map")]
    MissingCharmap,

    #[error("point size must be positive, got {0}")]
    InvalidPointSize(f32),

    #[error("no fixed strike near {0}pt in a non-scalable font")]
    NoUsableSize(f32),

    #[error("font data is empty")]
    EmptyFontData,

    #[error("raster engine failure: {0}")]
    Raster(String),
}
