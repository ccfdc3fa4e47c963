use std::io::Cursor;
use crate::bindings::software::pixel_buffer::PixelBuffer;
use crate::pixel_formats::DecodeError;

/**
Decodes a PNG into 8-bit RGB or RGBA.

Palettes and low bit depths are expanded, 16-bit channels are stripped to 8 bits.
Grayscale images remain 1 or 2 channels and are rejected by [`PixelBuffer::from_raw`].
*/
pub(crate) fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let (color_type, _bit_depth) = reader.output_color_type();
    let samples = color_type.samples();
    let (width, height) = (reader.info().width, reader.info().height);
    //reject before allocating a frame we'd throw away
    if samples != 3 && samples != 4 {
        return Err(DecodeError::UnsupportedChannels(samples as u8));
    }
    let mut buf = vec![0u8; width as usize * height as usize * samples];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());
    PixelBuffer::from_raw(info.width, info.height, samples as u8, buf)
}
