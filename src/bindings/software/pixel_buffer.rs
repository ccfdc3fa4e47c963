/*! CPU-side pixel storage.

[`PixelBuffer`] is what the codecs produce and what a texture uploads.  It is
also the type of a locked texture's mirror, so pixel manipulation between
`lock` and `unlock` happens here.

# Coordinate Systems

- Origin (0, 0) is at the top-left
- X increases to the right
- Y increases downward
- Rows are stored top to bottom, channels interleaved

# Example

```
use sprites_and_glyphs::bindings::software::pixel_buffer::{PixelBuffer, Texel};
use sprites_and_glyphs::pixel_formats::{Channels, Unorm4};

// A 4x4 opaque black image
let mut buffer = PixelBuffer::filled(4, 4, Unorm4::BLACK);
buffer.set_pixel(Texel { x: 1, y: 2 }, Unorm4::WHITE);
assert_eq!(buffer.pixel(Texel { x: 1, y: 2 }), Unorm4::WHITE);

// Pad to 8x8 with transparent pixels on the right and bottom edges
let padded = buffer.padded(8, 8, Unorm4::TRANSPARENT_BLACK);
assert_eq!(padded.width(), 8);
assert_eq!(padded.pixel(Texel { x: 1, y: 2 }), Unorm4::WHITE);
assert_eq!(padded.pixel(Texel { x: 7, y: 7 }), Unorm4::TRANSPARENT_BLACK);
assert_eq!(padded.channels(), Channels::Rgba);
```
*/

use crate::pixel_formats::{Channels, DecodeError, Unorm4};

/// Integer pixel coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Texel {
    pub x: u32,
    pub y: u32,
}

impl Texel {
    /// The origin texel at coordinates (0, 0).
    pub const ZERO: Texel = Texel { x: 0, y: 0 };
}

/// Decoded image data: width, height, 3 or 4 channels, one byte per channel.
///
/// The channel count invariant is enforced by construction; there is no way to
/// build a `PixelBuffer` with 1, 2 or 5 channels.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("byte_len", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Wraps raw row-major bytes.
    ///
    /// Fails when `channel_count` is not 3 or 4, or when `data` does not hold
    /// exactly `width * height * channel_count` bytes.
    pub fn from_raw(width: u32, height: u32, channel_count: u8, data: Vec<u8>) -> Result<Self, DecodeError> {
        let channels = Channels::from_count(channel_count).ok_or(DecodeError::UnsupportedChannels(channel_count))?;
        let expected = width as usize * height as usize * channels.count();
        if data.len() != expected {
            return Err(DecodeError::LengthMismatch { expected, actual: data.len() });
        }
        Ok(Self { width, height, channels, data })
    }

    /// An RGBA buffer with every pixel set to `fill`.
    pub fn filled(width: u32, height: u32, fill: Unorm4) -> Self {
        let len = width as usize * height as usize;
        let mut data = Vec::with_capacity(len * 4);
        for _ in 0..len {
            data.extend_from_slice(&fill.to_array());
        }
        Self { width, height, channels: Channels::Rgba, data }
    }

    /// Creates a buffer whose pixels are computed by a function.
    ///
    /// For [`Channels::Rgb`] the alpha the function returns is dropped.
    pub fn new_with<F: Fn(Texel) -> Unorm4>(width: u32, height: u32, channels: Channels, initialize_with: F) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * channels.count());
        for y in 0..height {
            for x in 0..width {
                let px = initialize_with(Texel { x, y });
                data.extend_from_slice(&px.to_array()[..channels.count()]);
            }
        }
        Self { width, height, channels, data }
    }

    #[inline] pub fn width(&self) -> u32 {
        self.width
    }
    #[inline] pub fn height(&self) -> u32 {
        self.height
    }
    #[inline] pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Raw row-major bytes.
    #[inline] pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Raw row-major bytes, editable in place; the shape cannot change.
    #[inline] pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline] fn offset(&self, texel: Texel) -> usize {
        assert!(texel.x < self.width && texel.y < self.height, "texel {texel:?} outside {}x{}", self.width, self.height);
        (texel.y as usize * self.width as usize + texel.x as usize) * self.channels.count()
    }

    /// Reads one pixel.  3-channel pixels read back with alpha 255.
    ///
    /// # Panics
    /// Panics if `texel` is out of bounds.
    pub fn pixel(&self, texel: Texel) -> Unorm4 {
        let o = self.offset(texel);
        let d = &self.data;
        match self.channels {
            Channels::Rgb => Unorm4::new(d[o], d[o + 1], d[o + 2], 255),
            Channels::Rgba => Unorm4::new(d[o], d[o + 1], d[o + 2], d[o + 3]),
        }
    }

    /// Writes one pixel.  On a 3-channel buffer the alpha is dropped.
    ///
    /// # Panics
    /// Panics if `texel` is out of bounds.
    pub fn set_pixel(&mut self, texel: Texel, value: Unorm4) {
        let o = self.offset(texel);
        let n = self.channels.count();
        self.data[o..o + n].copy_from_slice(&value.to_array()[..n]);
    }

    /// Converts to 4 channels, synthesizing alpha 255 for RGB data.
    pub fn to_rgba(&self) -> PixelBuffer {
        match self.channels {
            Channels::Rgba => self.clone(),
            Channels::Rgb => PixelBuffer::new_with(self.width, self.height, Channels::Rgba, |t| self.pixel(t)),
        }
    }

    /// Drops the alpha channel.
    pub fn without_alpha(&self) -> PixelBuffer {
        match self.channels {
            Channels::Rgb => self.clone(),
            Channels::Rgba => PixelBuffer::new_with(self.width, self.height, Channels::Rgb, |t| self.pixel(t)),
        }
    }

    /// Grows the buffer on its right and bottom edges, filling new pixels with `fill`.
    ///
    /// Existing pixels keep their coordinates.  The channel layout is preserved.
    ///
    /// # Panics
    /// Panics if the new size is smaller than the current one.
    pub fn padded(&self, width: u32, height: u32, fill: Unorm4) -> PixelBuffer {
        assert!(width >= self.width && height >= self.height, "padding cannot shrink {}x{} to {width}x{height}", self.width, self.height);
        let n = self.channels.count();
        let fill = &fill.to_array()[..n];
        let src_row = self.width as usize * n;
        let mut data = Vec::with_capacity(width as usize * height as usize * n);
        for y in 0..height as usize {
            if y < self.height as usize {
                data.extend_from_slice(&self.data[y * src_row..(y + 1) * src_row]);
                for _ in self.width..width {
                    data.extend_from_slice(fill);
                }
            } else {
                for _ in 0..width {
                    data.extend_from_slice(fill);
                }
            }
        }
        PixelBuffer { width, height, channels: self.channels, data }
    }

    /// Sets alpha to 0 on every pixel whose RGBA value equals `key`.
    ///
    /// Returns the number of pixels keyed out.
    ///
    /// # Panics
    /// Panics on a 3-channel buffer; convert with [`to_rgba`](Self::to_rgba) first.
    pub fn apply_color_key(&mut self, key: Unorm4) -> usize {
        assert_eq!(self.channels, Channels::Rgba, "color keying needs an alpha channel");
        let key = key.to_array();
        let mut keyed = 0;
        for px in self.data.chunks_exact_mut(4) {
            if *px == key {
                px[3] = 0;
                keyed += 1;
            }
        }
        keyed
    }
}
