/*! sprites_and_glyphs turns images into GPU textures, textures into sprite atlases,
and grid images into bitmap fonts.

The crate is layered, each layer owning the one below it:

| Type           | Owns                                 | Draws                         |
|----------------|--------------------------------------|-------------------------------|
| [`Texture`]    | one GPU texture, padded to powers of two | the whole image, or a clip |
| [`SpriteAtlas`]| a texture, a clip list, a vertex and an index buffer | one clip per draw |
| [`BitmapFont`] | an atlas of 256 glyphs found automatically | strings                 |

# Textures

Images decode from PNG or JPEG into a [`PixelBuffer`] with 3 or 4 channels.  On
upload, storage grows on the right and bottom to the next power of two in each
direction; the original size is kept as the *image* size, and texture
coordinates are always normalized against the storage size so padding is never
drawn.  A texture can be locked to edit its pixels on the CPU and unlocked to
write them back.

# Atlases

Clips are registered in image pixels and keep their registration index for life.
Building the atlas bakes every clip into a single vertex buffer and a single
index buffer, so drawing a sprite costs one indexed draw and no uploads.

# Fonts

A font image is a 16x16 grid of equal cells, one per byte value.  Loading finds
the tight horizontal extent of each glyph, aligns all glyphs to a shared top,
and derives line metrics from the glyphs themselves.

# Backends

GPU work goes through the [`Backend`] trait.  [`SoftwareBackend`] keeps everything
in memory and records draws, which is what the tests use.  With the
`backend_wgpu` feature, `WgpuBackend` renders through [wgpu](https://wgpu.rs).

Draws never rely on ambient state: every `render` call takes a [`Transform`].

```
use std::sync::Arc;
use sprites_and_glyphs::{Origin, PixelBuffer, Rect, SoftwareBackend, SpriteAtlas, Transform, Unorm4};

let backend = Arc::new(SoftwareBackend::new());
let mut atlas = SpriteAtlas::new(backend.clone());
atlas.texture_mut().load_from_pixel_buffer(&PixelBuffer::filled(256, 256, Unorm4::WHITE)).unwrap();
for (x, y) in [(0, 0), (128, 0), (0, 128), (128, 128)] {
    atlas.register_clip(Rect::new(x, y, 128, 128));
}
atlas.build_buffers(Origin::Center).unwrap();
atlas.render_sprite(Transform::IDENTITY.translate(320.0, 240.0).rotate_degrees(45.0), 3).unwrap();
assert_eq!(backend.buffer_uploads(), 2);
```
*/

pub mod images;
pub mod bindings;
pub mod pixel_formats;
pub mod imp;
mod bittricks;
mod error;
mod asset_root;

pub use bittricks::power_of_two;
pub use error::Error;
pub use asset_root::AssetRoot;

pub use bindings::coordinates::Rect;
pub use bindings::sampler::{FilterMode, SamplerConfig, WrapMode};
pub use bindings::software::pixel_buffer::{PixelBuffer, Texel};
pub use bindings::texture::Texture;
pub use bindings::texture_builder::TextureBuilder;
pub use images::bitmap_font::BitmapFont;
pub use images::sprite_atlas::SpriteAtlas;
pub use images::transform::Transform;
pub use images::vertex_algorithms::Origin;
pub use images::vertex_layout::VertexRecord;
pub use imp::{Backend, SoftwareBackend};
pub use pixel_formats::{Channels, DecodeError, Unorm4};

#[cfg(feature = "backend_wgpu")]
pub use imp::WgpuBackend;
