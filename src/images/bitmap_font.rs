// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Bitmap fonts built from a 16x16 character grid image.

Loading scans the grid for glyph bounds (see [`glyph_scan`](crate::images::glyph_scan)),
uploads a tintable copy of the image (white color, alpha taken from the
brightness of the source), and bakes all 256 glyphs into a [`SpriteAtlas`] with a
top-left anchor.

Layout is one glyph after another: each glyph advances the cursor by its own
width, `' '` by half a cell, and `'\n'` returns to the starting column and moves
down by the height of `'A'` above the shared glyph top.  There is no wrapping or
kerning.
*/

use std::path::Path;
use std::sync::Arc;

use crate::bindings::coordinates::Rect;
use crate::bindings::sampler::WrapMode;
use crate::bindings::software::pixel_buffer::PixelBuffer;
use crate::bindings::texture::{Texture, read_image};
use crate::bindings::texture_builder::TextureBuilder;
use crate::error::Error;
use crate::images::glyph_scan::scan_glyphs;
use crate::images::sprite_atlas::SpriteAtlas;
use crate::images::transform::Transform;
use crate::images::vertex_algorithms::Origin;
use crate::imp::Backend;
use crate::pixel_formats::{Channels, Unorm4};

#[derive(Debug)]
pub struct BitmapFont<B: Backend> {
    atlas: SpriteAtlas<B>,
    space: f32,
    line_height: i32,
    new_line: i32,
}

/// White pixels whose alpha is the brightness of `source`.
fn alpha_mask(source: &PixelBuffer) -> PixelBuffer {
    PixelBuffer::new_with(source.width(), source.height(), Channels::Rgba, |t| {
        Unorm4 { a: source.pixel(t).luma(), ..Unorm4::WHITE }
    })
}

impl<B: Backend> BitmapFont<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_texture(TextureBuilder::new(&backend).debug_name("font").build())
    }

    /// Uses `texture`'s settings (filter, debug name, padding) for the glyph atlas.
    ///
    /// Any image already in `texture` is replaced when a font loads.
    pub fn with_texture(texture: Texture<B>) -> Self {
        BitmapFont { atlas: SpriteAtlas::from_texture(texture), space: 0.0, line_height: 0, new_line: 0 }
    }

    /// Loads a font from an image file.  On failure the font is left empty.
    pub fn load_bitmap(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.free_font();
        let pixels = read_image(path.as_ref())?;
        self.load_bitmap_from_pixels(&pixels)
    }

    /// Loads a font from decoded pixels.  On failure the font is left empty.
    pub fn load_bitmap_from_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), Error> {
        self.free_font();
        let result = self.build(pixels);
        if result.is_err() {
            self.free_font();
        }
        result
    }

    fn build(&mut self, pixels: &PixelBuffer) -> Result<(), Error> {
        let Some(scan) = scan_glyphs(pixels) else {
            logwise::error_sync!(
                "Font image {w}x{h} is too small for a 16x16 grid",
                w = pixels.width(),
                h = pixels.height()
            );
            return Err(Error::FontGridTooSmall { width: pixels.width(), height: pixels.height() });
        };
        for clip in &scan.clips {
            self.atlas.register_clip(*clip);
        }
        self.atlas.texture_mut().load_from_pixel_buffer(&alpha_mask(pixels))?;
        self.atlas.build_buffers(Origin::TopLeft)?;
        self.atlas.texture_mut().set_wrap(WrapMode::ClampToBorder)?;

        self.space = scan.space();
        self.new_line = scan.new_line();
        self.line_height = scan.line_height();
        logwise::info_sync!(
            "Loaded bitmap font: cell {cw}x{ch}, line height {lh}, new line {nl}",
            cw = scan.cell_width,
            ch = scan.cell_height,
            lh = self.line_height,
            nl = self.new_line
        );
        Ok(())
    }

    /**
    Draws `text` with its first glyph's top-left corner at `(x, y)`.

    Characters beyond U+00FF have no glyph; they are skipped without advancing.
    */
    pub fn render_text(&self, transform: Transform, x: f32, y: f32, text: &str) -> Result<(), Error> {
        if !self.atlas.buffers_built() {
            logwise::warn_sync!("Can't render text: no font loaded");
            return Err(Error::NotLoaded);
        }
        let mut dx = x;
        let mut dy = y;
        for ch in text.chars() {
            match ch {
                ' ' => dx += self.space,
                '\n' => {
                    dx = x;
                    dy += self.new_line as f32;
                }
                _ => {
                    let code = ch as usize;
                    let Some(clip) = self.atlas.clip(code) else {
                        logwise::warn_sync!("No glyph for character {code}", code = code);
                        continue;
                    };
                    self.atlas.render_sprite(transform.translate(dx, dy), code)?;
                    dx += clip.w as f32;
                }
            }
        }
        Ok(())
    }

    /// Releases the font's texture and buffers and zeroes its metrics.
    pub fn free_font(&mut self) {
        self.atlas.free();
        self.space = 0.0;
        self.line_height = 0;
        self.new_line = 0;
    }

    /// The clip of `ch`, if the font is loaded and `ch` fits in a byte.
    pub fn glyph(&self, ch: char) -> Option<Rect> {
        self.atlas.clip(ch as usize)
    }

    pub fn is_loaded(&self) -> bool {
        self.atlas.buffers_built()
    }

    pub fn space(&self) -> f32 {
        self.space
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    pub fn new_line(&self) -> i32 {
        self.new_line
    }

    pub fn atlas(&self) -> &SpriteAtlas<B> {
        &self.atlas
    }

    pub fn texture(&self) -> &Texture<B> {
        self.atlas.texture()
    }
}
