// src/tga.rs

//! Minimal TGA encoding for atlas upload.
//!
//! Backends accept encoded image blobs rather than raw pixel pointers, and
//! uncompressed 32-bit TGA is the cheapest container that carries BGRA
//! data unchanged: an 18-byte header followed by the pixels.

/// Byte offsets within the 18-byte TGA header.
const DATA_TYPE_CODE: usize = 2;
const WIDTH_LO: usize = 12;
const HEIGHT_LO: usize = 14;
const BIT_DEPTH: usize = 16;
const IMAGE_DESCRIPTOR: usize = 17;

const HEADER_LEN: usize = 18;

/// Uncompressed truecolor image.
const TYPE_UNCOMPRESSED_TRUECOLOR: u8 = 2;
/// 8 alpha bits, rows stored top-to-bottom.
const DESCRIPTOR_TOP_LEFT_8_ALPHA: u8 = 32;

/// Encodes a square BGRA pixel buffer as an uncompressed 32-bit TGA blob.
///
/// `pixels` holds packed `b | g<<8 | r<<16 | a<<24` values in row-major
/// top-down order, `size * size` of them. Little-endian serialization of
/// those words is exactly the BGRA byte sequence TGA expects.
pub fn encode_bgra(size: u32, pixels: &[u32]) -> Vec<u8> {
    debug_assert_eq!(pixels.len(), (size * size) as usize);

    let mut blob = Vec::with_capacity(HEADER_LEN + pixels.len() * 4);
    let mut header = [0u8; HEADER_LEN];
    header[DATA_TYPE_CODE] = TYPE_UNCOMPRESSED_TRUECOLOR;
    header[WIDTH_LO] = (size & 0xff) as u8;
    header[WIDTH_LO + 1] = ((size >> 8) & 0xff) as u8;
    header[HEIGHT_LO] = (size & 0xff) as u8;
    header[HEIGHT_LO + 1] = ((size >> 8) & 0xff) as u8;
    header[BIT_DEPTH] = 32;
    header[IMAGE_DESCRIPTOR] = DESCRIPTOR_TOP_LEFT_8_ALPHA;
    blob.extend_from_slice(&header);

    for px in pixels {
        blob.extend_from_slice(&px.to_le_bytes());
    }
    blob
}

/// Reads the width field back out of an encoded blob. Used by tests and
/// diagnostics; returns `None` for blobs shorter than a header.
pub fn blob_width(blob: &[u8]) -> Option<u32> {
    if blob.len() < HEADER_LEN {
        return None;
    }
    Some(u16::from_le_bytes([blob[WIDTH_LO], blob[WIDTH_LO + 1]]) as u32)
}
