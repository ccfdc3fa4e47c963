/*!
Glyph discovery in a 16x16 character grid.

The font image is cut into 256 equal cells, row-major, so the cell at
`(row, col)` holds character `row * 16 + col`.  Inside each cell, any pixel with
a non-zero color channel belongs to the glyph; alpha is ignored.

```text
 cell_x        cell_x + cell_width
   ┌──────────────┐ cell_y
   │    ┌───┐     │ ◀── top (smallest over all cells)
   │    │ A │     │
   │    └───┘     │ ◀── bottom of 'A'
   │              │
   └──────────────┘
        left..right
```

Each glyph's clip spans its tight horizontal extent and the full cell height;
afterwards every clip moves down by the global `top` and shrinks by the same
amount, so all glyphs share one vertical origin.
*/

use crate::bindings::coordinates::Rect;
use crate::bindings::software::pixel_buffer::{PixelBuffer, Texel};

/// Cells per row and per column.
pub const GRID: u32 = 16;
/// Number of glyphs in a font, one per byte value.
pub const GLYPH_COUNT: usize = (GRID * GRID) as usize;

/// Result of scanning a font image.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphScan {
    /// One clip per character code, already normalized by `top`.
    pub clips: Vec<Rect>,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Smallest glyph top over all cells, relative to the cell.
    pub top: i32,
    /// Largest glyph bottom (inclusive row) over all cells, relative to the cell.
    pub bottom: i32,
    /// Bottom row of `'A'`; 0 if that cell is empty.
    pub a_bottom: i32,
}

impl GlyphScan {
    /// Horizontal advance of `' '`: half a cell.
    pub fn space(&self) -> f32 {
        self.cell_width as f32 / 2.0
    }

    /// Vertical advance of `'\n'`.
    pub fn new_line(&self) -> i32 {
        self.a_bottom - self.top
    }

    pub fn line_height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Tight bounds `(left, top, right, bottom)` of the lit pixels in a cell, all inclusive.
fn cell_bounds(pixels: &PixelBuffer, cell_x: u32, cell_y: u32, cell_w: u32, cell_h: u32) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..cell_h {
        for x in 0..cell_w {
            if !pixels.pixel(Texel { x: cell_x + x, y: cell_y + y }).is_lit() {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x), b.max(y)),
            });
        }
    }
    bounds
}

/**
Scans `pixels` for 256 glyphs.

Returns `None` if the image is smaller than 16 pixels in either direction.

An empty cell (every pixel black) yields a zero-width clip at the cell's left
edge spanning the full cell height; it counts as top = cell height and
bottom = 0, so it never moves the global metrics.
*/
pub fn scan_glyphs(pixels: &PixelBuffer) -> Option<GlyphScan> {
    let cell_width = pixels.width() / GRID;
    let cell_height = pixels.height() / GRID;
    if cell_width == 0 || cell_height == 0 {
        return None;
    }
    let ch = cell_height as i32;
    let mut top = ch;
    let mut bottom = 0;
    let mut a_bottom = 0;
    let mut clips = Vec::with_capacity(GLYPH_COUNT);

    for row in 0..GRID {
        for col in 0..GRID {
            let cell_x = col * cell_width;
            let cell_y = row * cell_height;
            let (clip, glyph_top, glyph_bottom) = match cell_bounds(pixels, cell_x, cell_y, cell_width, cell_height) {
                Some((l, t, r, b)) => (
                    Rect::new((cell_x + l) as i32, cell_y as i32, (r - l + 1) as i32, ch),
                    t as i32,
                    b as i32,
                ),
                None => (Rect::new(cell_x as i32, cell_y as i32, 0, ch), ch, 0),
            };
            top = top.min(glyph_top);
            bottom = bottom.max(glyph_bottom);
            if clips.len() == b'A' as usize {
                a_bottom = glyph_bottom;
            }
            clips.push(clip);
        }
    }

    for clip in &mut clips {
        clip.y += top;
        clip.h -= top;
    }

    Some(GlyphScan { clips, cell_width, cell_height, top, bottom, a_bottom })
}
