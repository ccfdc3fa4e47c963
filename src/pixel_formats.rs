// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Pixel layouts and image decoding.
//!
//! Everything in this crate works with 8 bits per channel.  Decoded images carry
//! either 3 ([`Channels::Rgb`]) or 4 ([`Channels::Rgba`]) channels; GPU storage is
//! always RGBA, so 3-channel data gets an opaque alpha channel at upload time.
//!
//! # Supported files
//!
//! | Format | Crate   | Channels produced           |
//! |--------|---------|-----------------------------|
//! | PNG    | `png`   | RGB or RGBA (palettes expanded, 16-bit stripped) |
//! | JPEG   | `image` | RGB                         |
//!
//! The file type is detected from its signature, not its extension.  Grayscale
//! images decode to 1 or 2 channels and are rejected, the same as any other
//! unsupported channel count.
//!
//! ```
//! use sprites_and_glyphs::pixel_formats::{Channels, Unorm4};
//!
//! assert_eq!(Channels::from_count(4), Some(Channels::Rgba));
//! assert_eq!(Channels::from_count(2), None);
//!
//! let red = Unorm4 { r: 255, g: 0, b: 0, a: 255 };
//! assert_eq!(red.luma(), 76);
//! ```

pub(crate) mod png_support;
pub(crate) mod jpeg_support;

use crate::bindings::software::pixel_buffer::PixelBuffer;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Number of interleaved 8-bit channels in a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl Channels {
    /// Maps a decoded channel count to a supported layout.
    ///
    /// Only 3 and 4 are supported; everything else is `None`.
    pub const fn from_count(count: u8) -> Option<Channels> {
        match count {
            3 => Some(Channels::Rgb),
            4 => Some(Channels::Rgba),
            _ => None,
        }
    }

    /// Bytes per pixel.
    pub const fn count(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }
}

/// C-compatible RGBA pixel with 8-bit normalized unsigned values.
///
/// This is the pixel layout of GPU storage and of a locked texture's mirror.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Unorm4 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Unorm4 {
    /// Fully transparent black; the default fill for power-of-two padding.
    pub const TRANSPARENT_BLACK: Unorm4 = Unorm4 { r: 0, g: 0, b: 0, a: 0 };
    /// Opaque black; the default color key.
    pub const BLACK: Unorm4 = Unorm4 { r: 0, g: 0, b: 0, a: 255 };
    /// Opaque white.
    pub const WHITE: Unorm4 = Unorm4 { r: 255, g: 255, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Unorm4 { r, g, b, a }
    }

    /// Grayscale intensity of the color channels (ITU-R BT.601 weights).
    ///
    /// Alpha does not participate.
    pub fn luma(&self) -> u8 {
        let weighted = 299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32;
        ((weighted + 500) / 1000) as u8
    }

    /// True when any color channel is non-zero.  Alpha is ignored.
    pub const fn is_lit(&self) -> bool {
        self.r != 0 || self.g != 0 || self.b != 0
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Errors produced while turning file bytes into a [`PixelBuffer`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("PNG decoding failed: {0}")]
    Png(#[from] png::DecodingError),
    #[error("JPEG decoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
    #[error("unsupported channel count {0}; only 3 or 4 channels are supported")]
    UnsupportedChannels(u8),
    #[error("pixel data holds {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("unrecognized image signature")]
    UnknownFormat,
}

/// Decodes PNG or JPEG bytes, detected by signature.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.starts_with(&PNG_SIGNATURE) {
        png_support::decode_png(bytes)
    } else if bytes.starts_with(&JPEG_SIGNATURE) {
        jpeg_support::decode_jpeg(bytes)
    } else {
        Err(DecodeError::UnknownFormat)
    }
}
