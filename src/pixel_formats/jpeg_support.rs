use image::{DynamicImage, ImageFormat};
use crate::bindings::software::pixel_buffer::PixelBuffer;
use crate::pixel_formats::DecodeError;

/**
Decodes a baseline or progressive JPEG.

Color JPEGs become 3-channel buffers.  Grayscale and CMYK sources report their
channel count and are rejected.
*/
pub(crate) fn decode_jpeg(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?;
    match decoded {
        DynamicImage::ImageRgb8(rgb) => {
            let (width, height) = rgb.dimensions();
            PixelBuffer::from_raw(width, height, 3, rgb.into_raw())
        }
        other => Err(DecodeError::UnsupportedChannels(other.color().channel_count())),
    }
}
