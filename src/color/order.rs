//! Channel order helpers shared by the wire encoders.

use crate::color::Rgb;

/// Blue, green, red byte order used by APA102 pixel frames
#[inline]
pub const fn bgr_bytes(color: Rgb) -> [u8; 3] {
    [color.b, color.g, color.r]
}

/// Assemble the 24-bit color word sent to WS2812B (`0xGGRRBB`)
///
/// The green channel goes first; this is what the chip expects.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn color_word(color: Rgb) -> u32 {
    ((color.g as u32) << 16) | ((color.r as u32) << 8) | color.b as u32
}

/// Split a `0xGGRRBB` color word back into an RGB color
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_word(word: u32) -> Rgb {
    Rgb {
        r: ((word >> 8) & 0xFF) as u8,
        g: ((word >> 16) & 0xFF) as u8,
        b: (word & 0xFF) as u8,
    }
}
