#![cfg(feature = "backend_wgpu")]

use std::sync::Arc;

use sprites_and_glyphs::imp::Error as BackendError;
use sprites_and_glyphs::{
    Origin, PixelBuffer, Rect, SpriteAtlas, Texel, Texture, Transform, Unorm4, WgpuBackend, WrapMode,
};

fn backend() -> Option<Arc<WgpuBackend>> {
    match WgpuBackend::headless(wgpu::TextureFormat::Rgba8Unorm) {
        Ok(b) => Some(Arc::new(b)),
        Err(BackendError::NoSuchAdapter) => {
            println!("No adapter; skipping");
            None
        }
        Err(e) => panic!("{e}"),
    }
}

#[test]
fn lock_round_trip_through_gpu() {
    logwise::info_sync!("Starting lock_round_trip_through_gpu");
    let Some(b) = backend() else { return };
    //100 * 4 bytes is not a multiple of the row alignment
    let mut image = PixelBuffer::filled(100, 3, Unorm4::new(1, 2, 3, 4));
    image.set_pixel(Texel { x: 99, y: 2 }, Unorm4::new(200, 100, 50, 25));
    let mut t = Texture::new(b.clone());
    t.load_from_pixel_buffer(&image).unwrap();
    assert_eq!((t.width(), t.height()), (128, 4));

    t.lock().unwrap();
    assert_eq!(t.pixel(99, 2), Some(Unorm4::new(200, 100, 50, 25)));
    assert_eq!(t.pixel(127, 3), Some(Unorm4::TRANSPARENT_BLACK));
    t.set_pixel(0, 0, Unorm4::WHITE).unwrap();
    t.unlock().unwrap();

    t.lock().unwrap();
    assert_eq!(t.pixel(0, 0), Some(Unorm4::WHITE));
    t.unlock().unwrap();
}

#[test]
fn atlas_draws_into_a_pass() {
    let Some(b) = backend() else { return };
    let mut atlas = SpriteAtlas::new(b.clone());
    atlas.texture_mut().load_from_pixel_buffer(&PixelBuffer::filled(64, 64, Unorm4::WHITE)).unwrap();
    atlas.texture_mut().set_wrap(WrapMode::ClampToBorder).unwrap();
    atlas.register_clip(Rect::new(0, 0, 32, 32));
    atlas.register_clip(Rect::new(32, 32, 32, 32));
    atlas.build_buffers(Origin::TopLeft).unwrap();
    atlas.render_sprite(Transform::translation(8.0, 8.0), 1).unwrap();
    atlas.texture().render(Transform::IDENTITY, 0.0, 0.0, None).unwrap();

    let target = b.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("target"),
        size: wgpu::Extent3d { width: 64, height: 64, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    b.set_viewport(64, 64);
    b.device().push_error_scope(wgpu::ErrorFilter::Validation);
    let mut encoder = b.device().create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("test") });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("test"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(wgpu::Color::BLACK), store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        b.encode(&mut pass);
    }
    b.queue().submit(std::iter::once(encoder.finish()));
    let error = test_executors::spin_on(b.device().pop_error_scope());
    assert!(error.is_none(), "{error:?}");
}
