// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
GPU-resident textures.

A [`Texture`] owns at most one backend texture.  Its storage is padded on the
right and bottom edges to power-of-two dimensions; the unpadded size is kept as
the *image* size and is what [`Texture::render`] draws by default.

# Lifecycle

```text
 empty ──load──▶ loaded ──lock──▶ locked
   ▲               │  ▲             │
   └─────free──────┘  └───unlock────┘
```

Every load either completes or leaves the texture empty.  `free` works from any
state and is idempotent; dropping a texture frees it.

# Example

```
use std::sync::Arc;
use sprites_and_glyphs::{PixelBuffer, SoftwareBackend, Texture, Unorm4};

let backend = Arc::new(SoftwareBackend::new());
let mut texture = Texture::new(backend.clone());
texture.load_from_pixel_buffer(&PixelBuffer::filled(100, 50, Unorm4::WHITE)).unwrap();
assert_eq!((texture.width(), texture.height()), (128, 64));
assert_eq!((texture.image_width(), texture.image_height()), (100, 50));

texture.free();
assert!(!texture.is_loaded());
assert_eq!(backend.live_textures(), 0);
```
*/

use std::path::Path;
use std::sync::Arc;

use crate::bindings::coordinates::Rect;
use crate::bindings::sampler::{FilterMode, SamplerConfig, WrapMode};
use crate::bindings::software::pixel_buffer::{PixelBuffer, Texel};
use crate::bittricks::power_of_two;
use crate::error::Error;
use crate::images::transform::Transform;
use crate::images::vertex_algorithms::{Origin, quad_vertices};
use crate::imp::{Backend, DrawCommand, Geometry, TextureDescriptor, TextureId};
use crate::pixel_formats::{self, Unorm4};

#[derive(Debug)]
pub struct Texture<B: Backend> {
    backend: Arc<B>,
    id: Option<TextureId>,
    width: u32,
    height: u32,
    image_width: u32,
    image_height: u32,
    sampler: SamplerConfig,
    pad_color: Unorm4,
    debug_name: String,
    mirror: Option<PixelBuffer>,
}

pub(crate) fn read_image(path: &Path) -> Result<PixelBuffer, Error> {
    let bytes = std::fs::read(path).map_err(|source| {
        logwise::error_sync!(
            "Can't read image {path}: {source}",
            path = logwise::privacy::LogIt(path),
            source = logwise::privacy::LogIt(&source)
        );
        Error::Io { path: path.to_path_buf(), source }
    })?;
    pixel_formats::decode(&bytes).map_err(|e| {
        logwise::error_sync!(
            "Can't decode image {path}: {err}",
            path = logwise::privacy::LogIt(path),
            err = logwise::privacy::LogIt(&e)
        );
        Error::Decode(e)
    })
}

impl<B: Backend> Texture<B> {
    /// An empty texture with linear filtering, repeat wrapping, and transparent padding.
    ///
    /// Use [`TextureBuilder`](crate::TextureBuilder) to configure it differently.
    pub fn new(backend: Arc<B>) -> Self {
        Self::from_parts(backend, String::from("texture"), SamplerConfig::default(), Unorm4::TRANSPARENT_BLACK)
    }

    pub(crate) fn from_parts(backend: Arc<B>, debug_name: String, sampler: SamplerConfig, pad_color: Unorm4) -> Self {
        Texture {
            backend,
            id: None,
            width: 0,
            height: 0,
            image_width: 0,
            image_height: 0,
            sampler,
            pad_color,
            debug_name,
            mirror: None,
        }
    }

    /**
    Decodes the image at `path` and uploads it.

    With `keep_alpha` false, 4-channel images lose their alpha channel and upload as opaque.
    */
    pub fn load_from_file(&mut self, path: impl AsRef<Path>, keep_alpha: bool) -> Result<(), Error> {
        self.ensure_empty()?;
        let mut pixels = read_image(path.as_ref())?;
        if !keep_alpha {
            pixels = pixels.without_alpha();
        }
        self.upload(&pixels)
    }

    /**
    Decodes the image at `path`, makes every pixel equal to `key` transparent, and uploads it.

    The key is compared as RGBA.  3-channel images get an opaque alpha channel
    first, so an RGB key should carry alpha 255.  Keying happens before padding;
    padding pixels are never keyed.
    */
    pub fn load_from_file_with_color_key(&mut self, path: impl AsRef<Path>, key: Unorm4) -> Result<(), Error> {
        self.ensure_empty()?;
        let mut pixels = read_image(path.as_ref())?.to_rgba();
        let keyed = pixels.apply_color_key(key);
        logwise::trace_sync!("color key removed {keyed} pixels", keyed = keyed);
        self.upload(&pixels)
    }

    /// Uploads already-decoded pixels.
    pub fn load_from_pixel_buffer(&mut self, pixels: &PixelBuffer) -> Result<(), Error> {
        self.ensure_empty()?;
        self.upload(pixels)
    }

    fn ensure_empty(&self) -> Result<(), Error> {
        if self.id.is_some() {
            logwise::warn_sync!(
                "Texture {name} is already loaded; free it before loading again",
                name = self.debug_name.as_str()
            );
            return Err(Error::AlreadyLoaded);
        }
        Ok(())
    }

    fn upload(&mut self, pixels: &PixelBuffer) -> Result<(), Error> {
        let width = power_of_two(pixels.width());
        let height = power_of_two(pixels.height());
        let storage = pixels.padded(width, height, self.pad_color).to_rgba();
        let created = self.backend.create_texture(&TextureDescriptor {
            width,
            height,
            pixels: storage.as_bytes(),
            sampler: self.sampler,
            debug_name: &self.debug_name,
        });
        match created {
            Ok(id) => {
                self.id = Some(id);
                self.width = width;
                self.height = height;
                self.image_width = pixels.width();
                self.image_height = pixels.height();
                logwise::info_sync!(
                    "Loaded texture {name}: image {iw}x{ih}, storage {w}x{h}",
                    name = self.debug_name.as_str(),
                    iw = pixels.width(),
                    ih = pixels.height(),
                    w = width,
                    h = height
                );
                Ok(())
            }
            Err(e) => {
                logwise::error_sync!(
                    "Can't upload texture {name}: {err}",
                    name = self.debug_name.as_str(),
                    err = logwise::privacy::LogIt(&e)
                );
                self.free();
                Err(e.into())
            }
        }
    }

    /**
    Copies the GPU pixels into a CPU mirror for editing.

    The mirror is RGBA at the full storage size, padding included.
    */
    pub fn lock(&mut self) -> Result<(), Error> {
        let Some(id) = self.id else {
            logwise::warn_sync!("Can't lock texture {name}: not loaded", name = self.debug_name.as_str());
            return Err(Error::NotLoaded);
        };
        if self.mirror.is_some() {
            logwise::warn_sync!("Texture {name} is already locked", name = self.debug_name.as_str());
            return Err(Error::AlreadyLocked);
        }
        let bytes = self.backend.read_texture(id).map_err(|e| {
            logwise::error_sync!(
                "Can't read back texture {name}: {err}",
                name = self.debug_name.as_str(),
                err = logwise::privacy::LogIt(&e)
            );
            Error::Backend(e)
        })?;
        let mirror = PixelBuffer::from_raw(self.width, self.height, 4, bytes).map_err(|e| {
            logwise::error_sync!(
                "Texture {name} read back the wrong size: {err}",
                name = self.debug_name.as_str(),
                err = logwise::privacy::LogIt(&e)
            );
            Error::Decode(e)
        })?;
        self.mirror = Some(mirror);
        Ok(())
    }

    /**
    Writes the CPU mirror back to the GPU and discards it.

    If the write fails the mirror is kept, so the texture stays locked and the
    edits are not lost.
    */
    pub fn unlock(&mut self) -> Result<(), Error> {
        let (Some(id), Some(mirror)) = (self.id, self.mirror.take()) else {
            logwise::warn_sync!("Texture {name} is not locked", name = self.debug_name.as_str());
            return Err(Error::NotLocked);
        };
        if let Err(e) = self.backend.write_texture(id, mirror.as_bytes()) {
            logwise::error_sync!(
                "Can't write back texture {name}: {err}",
                name = self.debug_name.as_str(),
                err = logwise::privacy::LogIt(&e)
            );
            self.mirror = Some(mirror);
            return Err(e.into());
        }
        Ok(())
    }

    /// Reads a pixel of the locked mirror.  `None` when unlocked or out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Unorm4> {
        let mirror = self.mirror.as_ref()?;
        (x < mirror.width() && y < mirror.height()).then(|| mirror.pixel(Texel { x, y }))
    }

    /// Writes a pixel of the locked mirror, anywhere within the storage size.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Unorm4) -> Result<(), Error> {
        let mirror = self.mirror.as_mut().ok_or(Error::NotLocked)?;
        if x >= mirror.width() || y >= mirror.height() {
            logwise::warn_sync!(
                "Pixel ({x}, {y}) is outside texture {name}",
                x = x,
                y = y,
                name = self.debug_name.as_str()
            );
            return Err(Error::PixelOutOfRange { x, y });
        }
        mirror.set_pixel(Texel { x, y }, color);
        Ok(())
    }

    /// The locked mirror.
    pub fn pixels(&self) -> Option<&PixelBuffer> {
        self.mirror.as_ref()
    }

    /// The locked mirror's RGBA8 bytes, row-major at storage width.
    pub fn pixels_mut(&mut self) -> Option<&mut [u8]> {
        self.mirror.as_mut().map(PixelBuffer::as_bytes_mut)
    }

    pub fn set_filter(&mut self, filter: FilterMode) -> Result<(), Error> {
        let sampler = SamplerConfig { filter, ..self.sampler };
        self.apply_sampler(sampler)
    }

    /// Same wrap mode on both axes.
    pub fn set_wrap(&mut self, wrap: WrapMode) -> Result<(), Error> {
        self.set_wrap_axes(wrap, wrap)
    }

    pub fn set_wrap_axes(&mut self, wrap_s: WrapMode, wrap_t: WrapMode) -> Result<(), Error> {
        let sampler = SamplerConfig { wrap_s, wrap_t, ..self.sampler };
        self.apply_sampler(sampler)
    }

    fn apply_sampler(&mut self, sampler: SamplerConfig) -> Result<(), Error> {
        if let Some(id) = self.id {
            self.backend.configure_sampler(id, sampler).map_err(|e| {
                logwise::error_sync!(
                    "Can't configure sampler for {name}: {err}",
                    name = self.debug_name.as_str(),
                    err = logwise::privacy::LogIt(&e)
                );
                Error::Backend(e)
            })?;
        }
        self.sampler = sampler;
        Ok(())
    }

    /// Releases the GPU texture and the mirror.  Sampler settings survive.
    pub fn free(&mut self) {
        if let Some(id) = self.id.take() {
            self.backend.delete_texture(id);
            logwise::trace_sync!("Freed texture {name}", name = self.debug_name.as_str());
        }
        self.mirror = None;
        self.width = 0;
        self.height = 0;
        self.image_width = 0;
        self.image_height = 0;
    }

    /**
    Draws `clip` (or the whole image) with its top-left corner at `(x, y)`.

    `transform` is applied after the translation to `(x, y)`, the way a caller's
    modelview matrix would be.
    */
    pub fn render(&self, transform: Transform, x: f32, y: f32, clip: Option<Rect>) -> Result<(), Error> {
        let Some(id) = self.id else {
            logwise::warn_sync!("Can't render texture {name}: not loaded", name = self.debug_name.as_str());
            return Err(Error::NotLoaded);
        };
        let clip = clip.unwrap_or(Rect::new(0, 0, self.image_width as i32, self.image_height as i32));
        let quad = quad_vertices(clip, Origin::TopLeft, self.width, self.height);
        self.backend
            .draw(&DrawCommand {
                texture: id,
                transform: transform.translate(x, y),
                geometry: Geometry::Quad(&quad),
            })
            .map_err(|e| {
                logwise::error_sync!(
                    "Can't draw texture {name}: {err}",
                    name = self.debug_name.as_str(),
                    err = logwise::privacy::LogIt(&e)
                );
                Error::Backend(e)
            })
    }

    pub fn texture_id(&self) -> Option<TextureId> {
        self.id
    }
    pub fn is_loaded(&self) -> bool {
        self.id.is_some()
    }
    pub fn is_locked(&self) -> bool {
        self.mirror.is_some()
    }
    /// Storage width (a power of two, or 0 when empty).
    pub fn width(&self) -> u32 {
        self.width
    }
    /// Storage height (a power of two, or 0 when empty).
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn image_width(&self) -> u32 {
        self.image_width
    }
    pub fn image_height(&self) -> u32 {
        self.image_height
    }
    pub fn filter(&self) -> FilterMode {
        self.sampler.filter
    }
    pub fn wrap(&self) -> (WrapMode, WrapMode) {
        (self.sampler.wrap_s, self.sampler.wrap_t)
    }
    pub fn debug_name(&self) -> &str {
        &self.debug_name
    }
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}

impl<B: Backend> Drop for Texture<B> {
    fn drop(&mut self) {
        self.free();
    }
}
