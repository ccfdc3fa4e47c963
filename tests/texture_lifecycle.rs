mod support;

use std::sync::Arc;

use sprites_and_glyphs::imp::Operation;
use sprites_and_glyphs::{
    AssetRoot, DecodeError, Error, PixelBuffer, Rect, SoftwareBackend, Texel, Texture, TextureBuilder, Transform,
    Unorm4, WrapMode, power_of_two,
};
use support::{fixture_path, write_png};

fn backend() -> Arc<SoftwareBackend> {
    Arc::new(SoftwareBackend::new())
}

fn stored(backend: &SoftwareBackend, texture: &Texture<SoftwareBackend>) -> PixelBuffer {
    let id = texture.texture_id().unwrap();
    PixelBuffer::from_raw(texture.width(), texture.height(), 4, backend.texture_pixels(id).unwrap()).unwrap()
}

#[test]
fn storage_is_next_power_of_two() {
    logwise::info_sync!("Starting storage_is_next_power_of_two");
    let b = backend();
    for (w, h) in [(1, 1), (3, 100), (128, 129), (300, 7), (64, 64)] {
        let mut t = Texture::new(b.clone());
        t.load_from_pixel_buffer(&PixelBuffer::filled(w, h, Unorm4::WHITE)).unwrap();
        assert_eq!((t.image_width(), t.image_height()), (w, h));
        assert_eq!((t.width(), t.height()), (power_of_two(w), power_of_two(h)));
        assert!(t.width() >= w && t.height() >= h);
        assert!(t.width().is_power_of_two() && t.height().is_power_of_two());
    }
}

#[test]
fn load_png_from_asset_root() {
    let b = backend();
    let mut image = PixelBuffer::filled(5, 3, Unorm4::new(10, 20, 30, 128));
    image.set_pixel(Texel { x: 4, y: 2 }, Unorm4::new(1, 2, 3, 4));
    let path = write_png("asset_root.png", &image);
    let root = AssetRoot::new(path.parent().unwrap());

    let mut t = Texture::new(b.clone());
    t.load_from_file(root.resolve("asset_root.png"), true).unwrap();
    assert_eq!((t.width(), t.height()), (8, 4));
    let s = stored(&b, &t);
    assert_eq!(s.pixel(Texel { x: 0, y: 0 }), Unorm4::new(10, 20, 30, 128));
    assert_eq!(s.pixel(Texel { x: 4, y: 2 }), Unorm4::new(1, 2, 3, 4));
    assert_eq!(s.pixel(Texel { x: 5, y: 0 }), Unorm4::TRANSPARENT_BLACK);
    assert_eq!(s.pixel(Texel { x: 0, y: 3 }), Unorm4::TRANSPARENT_BLACK);
}

#[test]
fn dropping_alpha_uploads_opaque() {
    let b = backend();
    let path = write_png("drop_alpha.png", &PixelBuffer::filled(2, 2, Unorm4::new(9, 9, 9, 3)));
    let mut t = Texture::new(b.clone());
    t.load_from_file(&path, false).unwrap();
    assert_eq!(stored(&b, &t).pixel(Texel::ZERO), Unorm4::new(9, 9, 9, 255));
}

#[test]
fn color_key_on_rgb_source() {
    let b = backend();
    //cyan background with one red pixel, no alpha channel in the file
    let mut data = Vec::new();
    for i in 0..6 {
        data.extend_from_slice(if i == 4 { &[255, 0, 0] } else { &[0, 255, 255] });
    }
    let path = write_png("color_key.png", &PixelBuffer::from_raw(3, 2, 3, data).unwrap());

    let mut t = Texture::new(b.clone());
    t.load_from_file_with_color_key(&path, Unorm4::new(0, 255, 255, 255)).unwrap();
    let s = stored(&b, &t);
    assert_eq!(s.pixel(Texel { x: 0, y: 0 }), Unorm4::new(0, 255, 255, 0));
    assert_eq!(s.pixel(Texel { x: 1, y: 1 }), Unorm4::new(255, 0, 0, 255));
    //padding keeps the pad color
    assert_eq!(s.pixel(Texel { x: 3, y: 0 }), Unorm4::TRANSPARENT_BLACK);
}

#[test]
fn load_jpeg() {
    let b = backend();
    let (w, h) = (20u32, 10u32);
    let data = vec![200u8; (w * h * 3) as usize];
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, 95)
        .encode(&data, w, h, image::ExtendedColorType::Rgb8)
        .unwrap();
    let path = fixture_path("gray.jpg");
    std::fs::write(&path, &bytes).unwrap();

    let mut t = Texture::new(b.clone());
    t.load_from_file(&path, true).unwrap();
    assert_eq!((t.image_width(), t.image_height()), (20, 10));
    assert_eq!((t.width(), t.height()), (32, 16));
    assert_eq!(stored(&b, &t).pixel(Texel::ZERO).a, 255);
}

#[test]
fn load_failures_leave_texture_empty() {
    let b = backend();
    let mut t = Texture::new(b.clone());

    let missing = fixture_path("does_not_exist.png");
    assert!(matches!(t.load_from_file(&missing, true), Err(Error::Io { .. })));

    let garbage = fixture_path("garbage.png");
    std::fs::write(&garbage, b"definitely not an image").unwrap();
    assert!(matches!(t.load_from_file(&garbage, true), Err(Error::Decode(DecodeError::UnknownFormat))));

    let gray_path = fixture_path("gray.png");
    {
        let file = std::fs::File::create(&gray_path).unwrap();
        let mut encoder = png::Encoder::new(file, 2, 2);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.write_header().unwrap().write_image_data(&[0, 64, 128, 255]).unwrap();
    }
    assert!(matches!(
        t.load_from_file(&gray_path, true),
        Err(Error::Decode(DecodeError::UnsupportedChannels(1)))
    ));

    assert!(!t.is_loaded());
    assert_eq!((t.width(), t.height(), t.image_width(), t.image_height()), (0, 0, 0, 0));
    assert_eq!(b.live_textures(), 0);
}

#[test]
fn lock_unlock_without_edits_is_byte_identical() {
    let b = backend();
    let mut image = PixelBuffer::filled(3, 3, Unorm4::new(1, 2, 3, 4));
    image.set_pixel(Texel { x: 1, y: 1 }, Unorm4::new(250, 128, 7, 99));
    let mut t = Texture::new(b.clone());
    t.load_from_pixel_buffer(&image).unwrap();
    let id = t.texture_id().unwrap();
    let before = b.texture_pixels(id).unwrap();

    t.lock().unwrap();
    assert!(t.is_locked());
    assert_eq!(t.pixels().unwrap().as_bytes(), before.as_slice());
    t.unlock().unwrap();
    assert!(!t.is_locked());
    assert_eq!(b.texture_pixels(id).unwrap(), before);
}

#[test]
fn edits_reach_the_gpu_on_unlock() {
    let b = backend();
    let mut t = Texture::new(b.clone());
    t.load_from_pixel_buffer(&PixelBuffer::filled(2, 2, Unorm4::BLACK)).unwrap();
    t.lock().unwrap();
    t.set_pixel(1, 0, Unorm4::WHITE).unwrap();
    //storage is 2 pixels wide, so (0, 1) starts at byte 8
    t.pixels_mut().unwrap()[8..12].copy_from_slice(&[5, 5, 5, 5]);
    assert_eq!(t.pixel(1, 0), Some(Unorm4::WHITE));
    assert_eq!(t.pixel(2, 0), None);
    //not written until unlock
    assert_eq!(stored(&b, &t).pixel(Texel { x: 1, y: 0 }), Unorm4::BLACK);
    t.unlock().unwrap();
    let s = stored(&b, &t);
    assert_eq!(s.pixel(Texel { x: 1, y: 0 }), Unorm4::WHITE);
    assert_eq!(s.pixel(Texel { x: 0, y: 1 }), Unorm4::new(5, 5, 5, 5));
    assert_eq!(b.texture_writes(), 1);
}

#[test]
fn set_pixel_outside_storage_is_an_error() {
    let b = backend();
    let mut t = Texture::new(b.clone());
    t.load_from_pixel_buffer(&PixelBuffer::filled(2, 2, Unorm4::WHITE)).unwrap();
    t.lock().unwrap();
    assert!(matches!(t.set_pixel(5, 5, Unorm4::BLACK), Err(Error::PixelOutOfRange { x: 5, y: 5 })));
    assert!(matches!(t.set_pixel(2, 0, Unorm4::BLACK), Err(Error::PixelOutOfRange { x: 2, y: 0 })));
    assert!(t.is_locked());
    t.unlock().unwrap();
    assert_eq!(stored(&b, &t).pixel(Texel { x: 1, y: 1 }), Unorm4::WHITE);
}

#[test]
fn double_lock_keeps_first_mirror() {
    let b = backend();
    let mut t = Texture::new(b.clone());
    t.load_from_pixel_buffer(&PixelBuffer::filled(2, 2, Unorm4::BLACK)).unwrap();
    t.lock().unwrap();
    t.set_pixel(0, 0, Unorm4::WHITE).unwrap();
    assert!(matches!(t.lock(), Err(Error::AlreadyLocked)));
    assert_eq!(t.pixel(0, 0), Some(Unorm4::WHITE));
    assert!(t.is_locked());
}

#[test]
fn lock_preconditions() {
    let b = backend();
    let mut t = Texture::new(b.clone());
    assert!(matches!(t.lock(), Err(Error::NotLoaded)));
    assert!(matches!(t.unlock(), Err(Error::NotLocked)));
    assert!(matches!(t.set_pixel(0, 0, Unorm4::WHITE), Err(Error::NotLocked)));
    assert_eq!(t.pixel(0, 0), None);

    t.load_from_pixel_buffer(&PixelBuffer::filled(1, 1, Unorm4::BLACK)).unwrap();
    assert!(matches!(t.unlock(), Err(Error::NotLocked)));
    b.fail_next(Operation::ReadTexture);
    assert!(matches!(t.lock(), Err(Error::Backend(_))));
    assert!(!t.is_locked());
    assert!(t.is_loaded());
}

#[test]
fn free_is_idempotent_and_discards_mirror() {
    let b = backend();
    let mut t = TextureBuilder::new(&b).debug_name("scratch").wrap(WrapMode::ClampToEdge).build();
    t.load_from_pixel_buffer(&PixelBuffer::filled(3, 3, Unorm4::WHITE)).unwrap();
    t.lock().unwrap();
    t.free();
    t.free();
    assert!(!t.is_loaded());
    assert!(!t.is_locked());
    assert_eq!((t.width(), t.height(), t.image_width(), t.image_height()), (0, 0, 0, 0));
    assert_eq!(b.live_textures(), 0);
    //settings outlive the GPU handle
    assert_eq!(t.wrap(), (WrapMode::ClampToEdge, WrapMode::ClampToEdge));

    t.load_from_pixel_buffer(&PixelBuffer::filled(1, 1, Unorm4::WHITE)).unwrap();
    assert_eq!(b.sampler(t.texture_id().unwrap()).unwrap().wrap_s, WrapMode::ClampToEdge);
}

#[test]
fn clip_texcoords_use_storage_size() {
    let b = backend();
    let mut t = Texture::new(b.clone());
    t.load_from_pixel_buffer(&PixelBuffer::filled(100, 60, Unorm4::WHITE)).unwrap();
    let clip = Rect::new(10, 20, 30, 40);
    t.render(Transform::IDENTITY.scale(2.0, 2.0), 5.0, 6.0, Some(clip)).unwrap();
    let draw = b.take_draws().remove(0);
    let tl = draw.vertices[0];
    let br = draw.vertices[2];
    assert_eq!((tl.tex_coord.s, tl.tex_coord.t), (10.0 / 128.0, 20.0 / 64.0));
    assert_eq!((br.tex_coord.s, br.tex_coord.t), (40.0 / 128.0, 60.0 / 64.0));
    assert_eq!((br.position.x, br.position.y), (30.0, 40.0));
    //the caller's scale applies to the offset too
    assert_eq!(draw.transform.apply(0.0, 0.0), (10.0, 12.0));
}
