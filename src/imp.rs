// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The backend layer.

Everything above this module talks to the GPU through [`Backend`].  The
[`SoftwareBackend`] is always compiled and keeps every resource in memory; the
`wgpu` backend is compiled with the `backend_wgpu` feature.

Backends take `&self` throughout.  A texture, its atlas, and its font each hold
an `Arc` of the same backend, so backends use interior mutability for their
resource tables.
*/

use std::fmt::Debug;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::bindings::sampler::SamplerConfig;
use crate::images::transform::Transform;
use crate::images::vertex_layout::VertexRecord;

mod error;
mod software;

pub use error::Error;
pub use software::{Operation, RecordedDraw, SoftwareBackend};

#[cfg(feature = "backend_wgpu")]
mod wgpu;

#[cfg(feature = "backend_wgpu")]
pub use wgpu::WgpuBackend;

/// Identifies a texture owned by a backend.  Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) NonZeroU32);

impl TextureId {
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Identifies a buffer owned by a backend.  Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub(crate) NonZeroU32);

impl BufferId {
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Hands out non-zero ids in sequence, never the same one twice.
#[derive(Debug)]
pub(crate) struct IdAllocator(AtomicU32);

impl IdAllocator {
    pub(crate) const fn new() -> Self {
        IdAllocator(AtomicU32::new(1))
    }

    #[cfg(test)]
    pub(crate) const fn starting_at(first: u32) -> Self {
        IdAllocator(AtomicU32::new(first))
    }

    /// Fails once every id has been handed out; 0 marks exhaustion.
    pub(crate) fn next(&self) -> Result<NonZeroU32, Error> {
        let raw = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| if n == 0 { None } else { Some(n.wrapping_add(1)) })
            .map_err(|_| Error::IdsExhausted)?;
        NonZeroU32::new(raw).ok_or(Error::IdsExhausted)
    }
}

/// Everything needed to allocate and fill a texture.
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, `width * height * 4` bytes.
    pub pixels: &'a [u8],
    pub sampler: SamplerConfig,
    pub debug_name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// [`VertexRecord`]s, serialized with [`records_to_bytes`](crate::images::vertex_layout::records_to_bytes).
    Vertex,
    /// Little-endian `u32` quad indices.
    Index,
}

/// The geometry of a single draw.
#[derive(Debug, Clone, Copy)]
pub enum Geometry<'a> {
    /// One quad given inline, in top-left, top-right, bottom-right, bottom-left order.
    Quad(&'a [VertexRecord; 4]),
    /// `index_count` quad indices starting at `first_index` in `indices`, addressing `vertices`.
    Indexed {
        vertices: BufferId,
        indices: BufferId,
        first_index: u32,
        index_count: u32,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct DrawCommand<'a> {
    pub texture: TextureId,
    pub transform: Transform,
    pub geometry: Geometry<'a>,
}

/**
GPU primitives.

Implementations report failures as [`Error`] and never leave a half-created
resource behind: if `create_texture` fails, nothing was allocated.
*/
pub trait Backend: Debug {
    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, Error>;
    fn delete_texture(&self, texture: TextureId);
    /// Replaces the full storage extent of `texture`.
    fn write_texture(&self, texture: TextureId, pixels: &[u8]) -> Result<(), Error>;
    /// Reads the full storage extent of `texture` as tightly packed RGBA8.
    fn read_texture(&self, texture: TextureId) -> Result<Vec<u8>, Error>;
    fn configure_sampler(&self, texture: TextureId, sampler: SamplerConfig) -> Result<(), Error>;

    fn create_buffer(&self, kind: BufferKind, contents: &[u8], debug_name: &str) -> Result<BufferId, Error>;
    fn delete_buffer(&self, buffer: BufferId);

    fn draw(&self, command: &DrawCommand<'_>) -> Result<(), Error>;
}

#[cfg(test)] mod tests {
    use super::{Error, IdAllocator};

    #[test] fn ids_do_not_wrap() {
        let ids = IdAllocator::starting_at(u32::MAX - 1);
        assert_eq!(ids.next().unwrap().get(), u32::MAX - 1);
        assert_eq!(ids.next().unwrap().get(), u32::MAX);
        assert!(matches!(ids.next(), Err(Error::IdsExhausted)));
        //stays exhausted rather than restarting at 1
        assert!(matches!(ids.next(), Err(Error::IdsExhausted)));
    }
}
