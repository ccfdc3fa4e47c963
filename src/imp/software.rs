// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
An in-memory backend.

Textures and buffers live in hash maps, draws are appended to a log with indexed
geometry already resolved back into vertex records.  Tests use it to observe what
would have reached the GPU, and [`SoftwareBackend::fail_next`] lets them make the
next call of a given kind fail.
*/

use std::collections::HashMap;
use std::sync::Mutex;

use crate::bindings::sampler::SamplerConfig;
use crate::images::index_algorithms::indices_from_bytes;
use crate::images::transform::Transform;
use crate::images::vertex_layout::{VertexRecord, records_from_bytes};
use crate::imp::{
    Backend, BufferId, BufferKind, DrawCommand, Error, Geometry, IdAllocator, TextureDescriptor, TextureId,
};

#[derive(Debug)]
struct SoftTexture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    sampler: SamplerConfig,
    #[allow(dead_code)] //shows up in Debug output
    debug_name: String,
}

#[derive(Debug)]
struct SoftBuffer {
    kind: BufferKind,
    contents: Vec<u8>,
    #[allow(dead_code)] //shows up in Debug output
    debug_name: String,
}

/// Backend calls that [`SoftwareBackend::fail_next`] can sabotage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateTexture,
    WriteTexture,
    ReadTexture,
    ConfigureSampler,
    CreateBuffer(BufferKind),
    Draw,
}

/// One entry in the draw log.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub texture: TextureId,
    pub transform: Transform,
    /// Vertices in draw order; 4 per quad.
    pub vertices: Vec<VertexRecord>,
    /// `Some(first_index)` when the draw came from buffers.
    pub first_index: Option<u32>,
}

#[derive(Debug, Default)]
struct State {
    textures: HashMap<TextureId, SoftTexture>,
    buffers: HashMap<BufferId, SoftBuffer>,
    draws: Vec<RecordedDraw>,
    pending_failures: Vec<Operation>,
    buffer_uploads: usize,
    texture_writes: usize,
}

impl State {
    fn take_failure(&mut self, op: Operation) -> bool {
        if let Some(pos) = self.pending_failures.iter().position(|o| *o == op) {
            self.pending_failures.remove(pos);
            true
        } else {
            false
        }
    }
}

#[derive(Debug)]
pub struct SoftwareBackend {
    ids: IdAllocator,
    state: Mutex<State>,
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareBackend {
    pub fn new() -> Self {
        SoftwareBackend {
            ids: IdAllocator::new(),
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        //a panicking test thread must not hide the log from the next assertion
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes the next call matching `op` fail with a backend error.
    pub fn fail_next(&self, op: Operation) {
        self.state().pending_failures.push(op);
    }

    pub fn live_textures(&self) -> usize {
        self.state().textures.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state().buffers.len()
    }

    /// Number of successful `create_buffer` calls so far.
    pub fn buffer_uploads(&self) -> usize {
        self.state().buffer_uploads
    }

    /// Number of successful `write_texture` calls so far.
    pub fn texture_writes(&self) -> usize {
        self.state().texture_writes
    }

    pub fn texture_pixels(&self, texture: TextureId) -> Option<Vec<u8>> {
        self.state().textures.get(&texture).map(|t| t.pixels.clone())
    }

    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.state().textures.get(&texture).map(|t| (t.width, t.height))
    }

    pub fn sampler(&self, texture: TextureId) -> Option<SamplerConfig> {
        self.state().textures.get(&texture).map(|t| t.sampler)
    }

    pub fn buffer_contents(&self, buffer: BufferId) -> Option<Vec<u8>> {
        self.state().buffers.get(&buffer).map(|b| b.contents.clone())
    }

    pub fn draws(&self) -> Vec<RecordedDraw> {
        self.state().draws.clone()
    }

    pub fn take_draws(&self) -> Vec<RecordedDraw> {
        std::mem::take(&mut self.state().draws)
    }
}

fn expected_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

impl Backend for SoftwareBackend {
    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, Error> {
        let mut state = self.state();
        if state.take_failure(Operation::CreateTexture) {
            return Err(Error::TextureAllocation {
                width: descriptor.width,
                height: descriptor.height,
                reason: "injected failure".to_owned(),
            });
        }
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(Error::TextureAllocation {
                width: descriptor.width,
                height: descriptor.height,
                reason: "zero-sized texture".to_owned(),
            });
        }
        let expected = expected_len(descriptor.width, descriptor.height);
        if descriptor.pixels.len() != expected {
            return Err(Error::SizeMismatch { expected, actual: descriptor.pixels.len() });
        }
        let id = TextureId(self.ids.next()?);
        state.textures.insert(
            id,
            SoftTexture {
                width: descriptor.width,
                height: descriptor.height,
                pixels: descriptor.pixels.to_vec(),
                sampler: descriptor.sampler,
                debug_name: descriptor.debug_name.to_owned(),
            },
        );
        Ok(id)
    }

    fn delete_texture(&self, texture: TextureId) {
        self.state().textures.remove(&texture);
    }

    fn write_texture(&self, texture: TextureId, pixels: &[u8]) -> Result<(), Error> {
        let mut state = self.state();
        if state.take_failure(Operation::WriteTexture) {
            return Err(Error::Transfer("injected failure".to_owned()));
        }
        let t = state.textures.get_mut(&texture).ok_or(Error::NoSuchTexture(texture))?;
        let expected = expected_len(t.width, t.height);
        if pixels.len() != expected {
            return Err(Error::SizeMismatch { expected, actual: pixels.len() });
        }
        t.pixels.copy_from_slice(pixels);
        state.texture_writes += 1;
        Ok(())
    }

    fn read_texture(&self, texture: TextureId) -> Result<Vec<u8>, Error> {
        let mut state = self.state();
        if state.take_failure(Operation::ReadTexture) {
            return Err(Error::Readback("injected failure".to_owned()));
        }
        state
            .textures
            .get(&texture)
            .map(|t| t.pixels.clone())
            .ok_or(Error::NoSuchTexture(texture))
    }

    fn configure_sampler(&self, texture: TextureId, sampler: SamplerConfig) -> Result<(), Error> {
        let mut state = self.state();
        if state.take_failure(Operation::ConfigureSampler) {
            return Err(Error::Transfer("injected sampler failure".to_owned()));
        }
        let t = state.textures.get_mut(&texture).ok_or(Error::NoSuchTexture(texture))?;
        t.sampler = sampler;
        Ok(())
    }

    fn create_buffer(&self, kind: BufferKind, contents: &[u8], debug_name: &str) -> Result<BufferId, Error> {
        let mut state = self.state();
        if state.take_failure(Operation::CreateBuffer(kind)) {
            return Err(Error::BufferAllocation(format!("injected failure for {debug_name}")));
        }
        let id = BufferId(self.ids.next()?);
        state.buffers.insert(
            id,
            SoftBuffer { kind, contents: contents.to_vec(), debug_name: debug_name.to_owned() },
        );
        state.buffer_uploads += 1;
        Ok(id)
    }

    fn delete_buffer(&self, buffer: BufferId) {
        self.state().buffers.remove(&buffer);
    }

    fn draw(&self, command: &DrawCommand<'_>) -> Result<(), Error> {
        let mut state = self.state();
        if state.take_failure(Operation::Draw) {
            return Err(Error::Draw("injected failure".to_owned()));
        }
        if !state.textures.contains_key(&command.texture) {
            return Err(Error::NoSuchTexture(command.texture));
        }
        let (vertices, first_index) = match command.geometry {
            Geometry::Quad(quad) => (quad.to_vec(), None),
            Geometry::Indexed { vertices, indices, first_index, index_count } => {
                let vertex_buffer = state.buffers.get(&vertices).ok_or(Error::NoSuchBuffer(vertices))?;
                let index_buffer = state.buffers.get(&indices).ok_or(Error::NoSuchBuffer(indices))?;
                if vertex_buffer.kind != BufferKind::Vertex || index_buffer.kind != BufferKind::Index {
                    return Err(Error::Draw("buffer bound with the wrong kind".to_owned()));
                }
                let records = records_from_bytes(&vertex_buffer.contents);
                let all_indices = indices_from_bytes(&index_buffer.contents);
                let start = first_index as usize;
                let end = start + index_count as usize;
                let slice = all_indices
                    .get(start..end)
                    .ok_or_else(|| Error::Draw(format!("index range {start}..{end} exceeds {}", all_indices.len())))?;
                let mut resolved = Vec::with_capacity(slice.len());
                for i in slice {
                    let record = records
                        .get(*i as usize)
                        .ok_or_else(|| Error::Draw(format!("vertex {i} exceeds {}", records.len())))?;
                    resolved.push(*record);
                }
                (resolved, Some(first_index))
            }
        };
        state.draws.push(RecordedDraw {
            texture: command.texture,
            transform: command.transform,
            vertices,
            first_index,
        });
        Ok(())
    }
}
