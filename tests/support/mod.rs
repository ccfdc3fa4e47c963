#![allow(dead_code)]
//! Fixture helpers shared by the integration tests.

use std::path::PathBuf;

use sprites_and_glyphs::{PixelBuffer, Texel, Unorm4};

/// A fresh path in the temp directory, unique per process and `name`.
pub fn fixture_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sprites_and_glyphs_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

/// Encodes `pixels` as an 8-bit PNG at `name` and returns its path.
pub fn write_png(name: &str, pixels: &PixelBuffer) -> PathBuf {
    let path = fixture_path(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), pixels.width(), pixels.height());
    encoder.set_color(match pixels.channels() {
        sprites_and_glyphs::Channels::Rgb => png::ColorType::Rgb,
        sprites_and_glyphs::Channels::Rgba => png::ColorType::Rgba,
    });
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(pixels.as_bytes()).unwrap();
    writer.finish().unwrap();
    path
}

/// A 16x16 grid font image with `cell`-pixel cells and white rectangles lit in
/// the given cells, coordinates cell-local and inclusive.
pub fn font_image(cell: u32, lit: &[(u8, u32, u32, u32, u32)]) -> PixelBuffer {
    let mut p = PixelBuffer::filled(cell * 16, cell * 16, Unorm4::BLACK);
    for &(ch, l, t, r, b) in lit {
        let cx = (ch as u32 % 16) * cell;
        let cy = (ch as u32 / 16) * cell;
        for y in t..=b {
            for x in l..=r {
                p.set_pixel(Texel { x: cx + x, y: cy + y }, Unorm4::WHITE);
            }
        }
    }
    p
}
