mod support;

use std::sync::Arc;

use sprites_and_glyphs::imp::{Operation, SoftwareBackend};
use sprites_and_glyphs::{BitmapFont, Error, PixelBuffer, Rect, Texel, Transform, Unorm4, WrapMode};
use support::{fixture_path, font_image, write_png};

const CELL: u32 = 32;

fn cell_origin(ch: u8) -> (i32, i32) {
    (((ch as u32 % 16) * CELL) as i32, ((ch as u32 / 16) * CELL) as i32)
}

/// 'A' lit in rows 10-20, 'B' in rows 12-20, 'b' reaching up to row 5 and down to row 25.
fn sample_font() -> PixelBuffer {
    font_image(CELL, &[(b'A', 4, 10, 23, 20), (b'B', 6, 12, 19, 20), (b'b', 8, 5, 17, 25)])
}

fn loaded(backend: &Arc<SoftwareBackend>) -> BitmapFont<SoftwareBackend> {
    let mut font = BitmapFont::new(backend.clone());
    font.load_bitmap_from_pixels(&sample_font()).unwrap();
    font
}

#[test]
fn metrics_from_glyph_bounds() {
    logwise::info_sync!("Starting metrics_from_glyph_bounds");
    let b = Arc::new(SoftwareBackend::new());
    let font = loaded(&b);
    assert_eq!(font.new_line(), 20 - 5);
    assert_eq!(font.line_height(), 25 - 5);
    assert_eq!(font.space(), 16.0);

    let (ax, ay) = cell_origin(b'A');
    let a = font.glyph('A').unwrap();
    //shifted down by the global top, shortened by the same amount
    assert_eq!(a, Rect::new(ax + 4, ay + 5, 20, 32 - 5));
}

#[test]
fn all_glyphs_share_the_global_top() {
    let b = Arc::new(SoftwareBackend::new());
    let font = loaded(&b);
    assert_eq!(font.atlas().clip_count(), 256);
    for code in 0..=255u8 {
        let clip = font.glyph(code as char).unwrap();
        let (_, cy) = cell_origin(code);
        assert!(clip.y >= 0);
        assert_eq!(clip.y - cy, 5);
        assert_eq!(clip.h, 27);
    }
}

#[test]
fn empty_cells_are_zero_width_glyphs() {
    let b = Arc::new(SoftwareBackend::new());
    let font = loaded(&b);
    let (zx, zy) = cell_origin(b'Z');
    assert_eq!(font.glyph('Z'), Some(Rect::new(zx, zy + 5, 0, 27)));

    b.take_draws();
    font.render_text(Transform::IDENTITY, 0.0, 0.0, "ZA").unwrap();
    let draws = b.take_draws();
    assert_eq!(draws.len(), 2);
    //an empty glyph still draws, but does not advance the cursor
    assert_eq!(draws[1].transform.apply(0.0, 0.0), (0.0, 0.0));
}

#[test]
fn render_text_a_space_b() {
    let b = Arc::new(SoftwareBackend::new());
    let font = loaded(&b);
    let a = font.glyph('A').unwrap();
    let glyph_b = font.glyph('B').unwrap();

    font.render_text(Transform::IDENTITY, 0.0, 0.0, "A B").unwrap();
    let draws = b.take_draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].first_index, Some(4 * b'A' as u32));
    assert_eq!(draws[0].transform.apply(0.0, 0.0), (0.0, 0.0));
    assert_eq!(draws[1].first_index, Some(4 * b'B' as u32));
    assert_eq!(draws[1].transform.apply(0.0, 0.0), (a.w as f32 + font.space(), 0.0));

    //glyphs are anchored at their top-left corner
    let v = &draws[1].vertices;
    assert_eq!((v[0].position.x, v[0].position.y), (0.0, 0.0));
    assert_eq!((v[2].position.x, v[2].position.y), (glyph_b.w as f32, glyph_b.h as f32));
}

#[test]
fn newline_returns_to_start_column() {
    let b = Arc::new(SoftwareBackend::new());
    let font = loaded(&b);
    font.render_text(Transform::translation(100.0, 0.0), 10.0, 20.0, "AB\nB").unwrap();
    let draws = b.take_draws();
    assert_eq!(draws.len(), 3);
    assert_eq!(draws[2].transform.apply(0.0, 0.0), (110.0, 20.0 + font.new_line() as f32));
}

#[test]
fn texture_is_a_clamped_alpha_mask() {
    let b = Arc::new(SoftwareBackend::new());
    let font = loaded(&b);
    let id = font.texture().texture_id().unwrap();
    assert_eq!(b.sampler(id).unwrap().wrap_s, WrapMode::ClampToBorder);
    assert_eq!(b.sampler(id).unwrap().wrap_t, WrapMode::ClampToBorder);

    let (w, h) = b.texture_size(id).unwrap();
    assert_eq!((w, h), (512, 512));
    let stored = PixelBuffer::from_raw(w, h, 4, b.texture_pixels(id).unwrap()).unwrap();
    let (ax, ay) = cell_origin(b'A');
    assert_eq!(stored.pixel(Texel { x: ax as u32 + 4, y: ay as u32 + 10 }), Unorm4::new(255, 255, 255, 255));
    assert_eq!(stored.pixel(Texel { x: ax as u32, y: ay as u32 }), Unorm4::new(255, 255, 255, 0));
}

#[test]
fn load_from_png_and_reload() {
    let b = Arc::new(SoftwareBackend::new());
    let path = write_png("font.png", &sample_font());
    let mut font = BitmapFont::new(b.clone());
    font.load_bitmap(&path).unwrap();
    assert_eq!(font.new_line(), 15);
    font.load_bitmap(&path).unwrap();
    assert_eq!((b.live_textures(), b.live_buffers()), (1, 2));
    assert_eq!(font.atlas().clip_count(), 256);
}

#[test]
fn failed_load_leaves_no_font() {
    let b = Arc::new(SoftwareBackend::new());
    let mut font = loaded(&b);
    assert!(matches!(font.load_bitmap(fixture_path("missing_font.png")), Err(Error::Io { .. })));
    assert!(!font.is_loaded());
    assert_eq!((font.space(), font.new_line(), font.line_height()), (0.0, 0, 0));
    assert_eq!(font.glyph('A'), None);
    assert_eq!((b.live_textures(), b.live_buffers()), (0, 0));

    b.fail_next(Operation::Draw);
    font.load_bitmap_from_pixels(&sample_font()).unwrap();
    assert!(matches!(font.render_text(Transform::IDENTITY, 0.0, 0.0, "A"), Err(Error::Backend(_))));
}

#[test]
fn upload_failure_rolls_back() {
    let b = Arc::new(SoftwareBackend::new());
    let mut font = BitmapFont::new(b.clone());
    b.fail_next(Operation::CreateTexture);
    assert!(matches!(font.load_bitmap_from_pixels(&sample_font()), Err(Error::Backend(_))));
    assert_eq!(font.atlas().clip_count(), 0);
    assert!(!font.texture().is_loaded());
}
