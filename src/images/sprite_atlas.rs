// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Sprite atlases: one texture, many independently drawable clips.

Clips are registered in source-image pixels and keep their registration index
for life.  [`SpriteAtlas::build_buffers`] bakes every clip into one shared vertex
buffer and one index buffer; drawing clip `i` is then a single indexed draw of
the 4 indices starting at `4 * i`, with no geometry re-uploaded.

```
use std::sync::Arc;
use sprites_and_glyphs::{Origin, PixelBuffer, Rect, SoftwareBackend, SpriteAtlas, Transform, Unorm4};

let backend = Arc::new(SoftwareBackend::new());
let mut atlas = SpriteAtlas::new(backend.clone());
atlas.texture_mut().load_from_pixel_buffer(&PixelBuffer::filled(64, 64, Unorm4::WHITE)).unwrap();
let left = atlas.register_clip(Rect::new(0, 0, 32, 64));
let right = atlas.register_clip(Rect::new(32, 0, 32, 64));
assert_eq!((left, right), (0, 1));

atlas.build_buffers(Origin::Center).unwrap();
atlas.render_sprite(Transform::translation(100.0, 100.0), right).unwrap();
assert_eq!(backend.draws().len(), 1);
```
*/

use std::sync::Arc;

use crate::bindings::coordinates::Rect;
use crate::bindings::texture::Texture;
use crate::error::Error;
use crate::images::index_algorithms::{INDICES_PER_QUAD, QuadIndexGenerator, indices_to_bytes};
use crate::images::transform::Transform;
use crate::images::vertex_algorithms::{Origin, atlas_vertices};
use crate::images::vertex_layout::records_to_bytes;
use crate::imp::{Backend, BufferId, BufferKind, DrawCommand, Geometry, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AtlasBuffers {
    vertices: BufferId,
    indices: BufferId,
    origin: Origin,
    /// Texture and storage size the texcoords were normalized against.
    texture: TextureId,
    storage: (u32, u32),
    /// Clips baked into the buffers; clips registered later are not drawable until rebuilt.
    quad_count: usize,
}

#[derive(Debug)]
pub struct SpriteAtlas<B: Backend> {
    texture: Texture<B>,
    clips: Vec<Rect>,
    buffers: Option<AtlasBuffers>,
}

impl<B: Backend> SpriteAtlas<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self::from_texture(Texture::new(backend))
    }

    /// Wraps a texture, loaded or not.
    pub fn from_texture(texture: Texture<B>) -> Self {
        SpriteAtlas { texture, clips: Vec::new(), buffers: None }
    }

    pub fn texture(&self) -> &Texture<B> {
        &self.texture
    }

    /// Reloading the texture through this invalidates the buffers until the next [`build_buffers`](Self::build_buffers).
    pub fn texture_mut(&mut self) -> &mut Texture<B> {
        &mut self.texture
    }

    /**
    Appends `clip` and returns its index.

    Indices count up from 0 in call order.  The clip is not checked against the
    texture bounds.
    */
    pub fn register_clip(&mut self, clip: Rect) -> usize {
        self.clips.push(clip);
        self.clips.len() - 1
    }

    pub fn clip(&self, index: usize) -> Option<Rect> {
        self.clips.get(index).copied()
    }

    pub fn clips(&self) -> &[Rect] {
        &self.clips
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn buffers_built(&self) -> bool {
        self.buffers.is_some()
    }

    /// The vertex and index buffers, once built.
    pub fn buffers(&self) -> Option<(BufferId, BufferId)> {
        self.buffers.map(|b| (b.vertices, b.indices))
    }

    /// The anchor the current buffers were built with.
    pub fn origin(&self) -> Option<Origin> {
        self.buffers.map(|b| b.origin)
    }

    /**
    Bakes every registered clip into GPU buffers.

    Requires a loaded texture and at least one clip.  Existing buffers are
    released first, so a failed rebuild leaves the atlas without buffers rather
    than with stale ones.  Both buffers are uploaded once, after all the
    geometry is computed.
    */
    pub fn build_buffers(&mut self, origin: Origin) -> Result<(), Error> {
        let Some(texture) = self.texture.texture_id() else {
            logwise::warn_sync!(
                "Can't build buffers for {name}: texture not loaded",
                name = self.texture.debug_name()
            );
            return Err(Error::NotLoaded);
        };
        if self.clips.is_empty() {
            logwise::warn_sync!(
                "Can't build buffers for {name}: no clips registered",
                name = self.texture.debug_name()
            );
            return Err(Error::NoClips);
        }
        self.free_buffers();

        let vertices = atlas_vertices(&self.clips, origin, self.texture.width(), self.texture.height());
        let indices = QuadIndexGenerator::new(self.clips.len()).indices();
        let backend = self.texture.backend().clone();

        let vertex_name = format!("{} vertices", self.texture.debug_name());
        let vertex_buffer = backend
            .create_buffer(BufferKind::Vertex, &records_to_bytes(&vertices), &vertex_name)
            .map_err(|e| {
                logwise::error_sync!(
                    "Can't create vertex buffer for {name}: {err}",
                    name = self.texture.debug_name(),
                    err = logwise::privacy::LogIt(&e)
                );
                Error::Backend(e)
            })?;
        let index_name = format!("{} indices", self.texture.debug_name());
        let index_buffer = match backend.create_buffer(BufferKind::Index, &indices_to_bytes(&indices), &index_name) {
            Ok(buffer) => buffer,
            Err(e) => {
                logwise::error_sync!(
                    "Can't create index buffer for {name}: {err}",
                    name = self.texture.debug_name(),
                    err = logwise::privacy::LogIt(&e)
                );
                backend.delete_buffer(vertex_buffer);
                return Err(e.into());
            }
        };
        self.buffers = Some(AtlasBuffers {
            vertices: vertex_buffer,
            indices: index_buffer,
            origin,
            texture,
            storage: (self.texture.width(), self.texture.height()),
            quad_count: self.clips.len(),
        });
        logwise::trace_sync!(
            "Built buffers for {name}: {clips} clips",
            name = self.texture.debug_name(),
            clips = self.clips.len()
        );
        Ok(())
    }

    /// Draws clip `index` through `transform`, anchored the way the buffers were built.
    pub fn render_sprite(&self, transform: Transform, index: usize) -> Result<(), Error> {
        let Some(buffers) = self.buffers else {
            logwise::warn_sync!(
                "Can't render sprite {index} of {name}: buffers not built",
                index = index,
                name = self.texture.debug_name()
            );
            return Err(Error::BuffersNotBuilt);
        };
        let Some(texture) = self.texture.texture_id() else {
            logwise::warn_sync!(
                "Can't render sprite {index} of {name}: texture not loaded",
                index = index,
                name = self.texture.debug_name()
            );
            return Err(Error::NotLoaded);
        };
        if texture != buffers.texture || (self.texture.width(), self.texture.height()) != buffers.storage {
            logwise::warn_sync!(
                "Can't render sprite {index} of {name}: texture reloaded since buffers were built",
                index = index,
                name = self.texture.debug_name()
            );
            return Err(Error::BuffersNotBuilt);
        }
        if index >= buffers.quad_count {
            logwise::warn_sync!(
                "Sprite {index} of {name} is out of range",
                index = index,
                name = self.texture.debug_name()
            );
            return Err(Error::ClipOutOfRange(index));
        }
        let first_index = QuadIndexGenerator::new(buffers.quad_count).first_index(index);
        self.texture
            .backend()
            .draw(&DrawCommand {
                texture,
                transform,
                geometry: Geometry::Indexed {
                    vertices: buffers.vertices,
                    indices: buffers.indices,
                    first_index: first_index as u32,
                    index_count: INDICES_PER_QUAD as u32,
                },
            })
            .map_err(|e| {
                logwise::error_sync!(
                    "Can't draw sprite {index} of {name}: {err}",
                    index = index,
                    name = self.texture.debug_name(),
                    err = logwise::privacy::LogIt(&e)
                );
                Error::Backend(e)
            })
    }

    fn free_buffers(&mut self) {
        if let Some(buffers) = self.buffers.take() {
            let backend = self.texture.backend();
            backend.delete_buffer(buffers.vertices);
            backend.delete_buffer(buffers.indices);
        }
    }

    /// Releases the buffers, forgets every clip, and frees the texture.
    pub fn free(&mut self) {
        self.free_buffers();
        self.clips.clear();
        self.texture.free();
    }
}

impl<B: Backend> Drop for SpriteAtlas<B> {
    fn drop(&mut self) {
        self.free_buffers();
    }
}
