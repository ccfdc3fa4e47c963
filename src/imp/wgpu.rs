// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The wgpu backend.

Textures are `Rgba8Unorm` with one sampler each.  Quad index buffers are
expanded to triangle lists on upload.  Draws are queued and replayed by
[`WgpuBackend::encode`] into a render pass the caller owns, each draw carrying its
transform as per-instance data.
*/

mod pipeline;
mod sampler;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use wgpu::util::DeviceExt;
use wgpu::{Extent3d, TexelCopyBufferLayout, TexelCopyTextureInfo};

use crate::bindings::sampler::SamplerConfig;
use crate::images::index_algorithms::{indices_from_bytes, indices_to_bytes, quads_to_triangles, triangle_range};
use crate::images::transform::Transform;
use crate::images::vertex_layout::records_to_bytes;
use crate::imp::{Backend, BufferId, BufferKind, DrawCommand, Error, Geometry, IdAllocator, TextureDescriptor, TextureId};
use pipeline::{INSTANCE_STRIDE, QuadPipeline, ortho_bytes};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const BYTES_PER_PIXEL: u32 = 4;

#[derive(Debug)]
struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
    label: String,
}

#[derive(Debug)]
struct GpuBuffer {
    buffer: wgpu::Buffer,
    kind: BufferKind,
}

#[derive(Debug)]
enum QueuedGeometry {
    /// A transient 4-vertex buffer drawn with the shared quad indices.
    Quad(wgpu::Buffer),
    Indexed { vertices: BufferId, indices: BufferId, first_index: u32, index_count: u32 },
}

#[derive(Debug)]
struct QueuedDraw {
    texture: TextureId,
    transform: Transform,
    geometry: QueuedGeometry,
}

#[derive(Debug, Default)]
struct State {
    textures: HashMap<TextureId, GpuTexture>,
    buffers: HashMap<BufferId, GpuBuffer>,
    queue: Vec<QueuedDraw>,
}

#[derive(Debug)]
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    clamp_to_border: bool,
    pipeline: QuadPipeline,
    projection: wgpu::Buffer,
    projection_group: wgpu::BindGroup,
    quad_indices: wgpu::Buffer,
    ids: IdAllocator,
    state: Mutex<State>,
}

fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    unpadded.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}

fn extent(width: u32, height: u32) -> Extent3d {
    Extent3d { width, height, depth_or_array_layers: 1 }
}

impl WgpuBackend {
    /**
    Wraps an existing device.

    `target_format` is the format of the render targets [`encode`](Self::encode)
    will draw into.  Clamp-to-border wrapping is used if the device was created
    with `Features::ADDRESS_MODE_CLAMP_TO_BORDER`.
    */
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, target_format: wgpu::TextureFormat) -> Self {
        let clamp_to_border = device.features().contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER);
        let pipeline = QuadPipeline::new(&device, target_format);
        let projection = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection"),
            contents: &ortho_bytes(1.0, 1.0),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let projection_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection"),
            layout: &pipeline.projection_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: projection.as_entire_binding() }],
        });
        let quad_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("immediate quad indices"),
            contents: &indices_to_bytes(&quads_to_triangles(&[0, 1, 2, 3])),
            usage: wgpu::BufferUsages::INDEX,
        });
        WgpuBackend {
            device,
            queue,
            clamp_to_border,
            pipeline,
            projection,
            projection_group,
            quad_indices,
            ids: IdAllocator::new(),
            state: Mutex::new(State::default()),
        }
    }

    /// Creates a device without a surface, asking for clamp-to-border when the adapter has it.
    pub fn headless(target_format: wgpu::TextureFormat) -> Result<Self, Error> {
        let instance = wgpu::Instance::default();
        let adapter = test_executors::spin_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: None,
        }))
        .map_err(|_| Error::NoSuchAdapter)?;
        let required_features = adapter.features() & wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER;
        let descriptor = wgpu::DeviceDescriptor {
            label: Some("sprites_and_glyphs"),
            required_features,
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        };
        let (device, queue) = test_executors::spin_on(adapter.request_device(&descriptor))?;
        Ok(Self::new(device, queue, target_format))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Sets the pixel size of the render target; `(0, 0)` is its top-left corner.
    pub fn set_viewport(&self, width: u32, height: u32) {
        self.queue.write_buffer(&self.projection, 0, &ortho_bytes(width.max(1) as f32, height.max(1) as f32));
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs `f` inside a validation error scope.
    fn scoped<R>(&self, f: impl FnOnce() -> R) -> (R, Option<wgpu::Error>) {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let r = f();
        let error = test_executors::spin_on(self.device.pop_error_scope());
        (r, error)
    }

    fn texture_bind_group(&self, view: &wgpu::TextureView, sampler: &wgpu::Sampler, label: &str) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.pipeline.texture_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        })
    }

    fn write_full(&self, texture: &wgpu::Texture, width: u32, height: u32, pixels: &[u8]) {
        self.queue.write_texture(
            TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * BYTES_PER_PIXEL),
                rows_per_image: Some(height),
            },
            extent(width, height),
        );
    }

    /**
    Replays every queued draw into `pass`, oldest first, and empties the queue.

    Resources deleted after a draw was queued are skipped with a warning.
    */
    pub fn encode(&self, pass: &mut wgpu::RenderPass<'_>) {
        let mut state = self.state();
        let queued = std::mem::take(&mut state.queue);
        if queued.is_empty() {
            return;
        }
        let mut instances = Vec::with_capacity(queued.len() * INSTANCE_STRIDE as usize);
        for draw in &queued {
            for f in draw.transform.rows().iter().flatten() {
                instances.extend_from_slice(&f.to_le_bytes());
            }
        }
        let instance_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("draw transforms"),
            contents: &instances,
            usage: wgpu::BufferUsages::VERTEX,
        });

        pass.set_pipeline(&self.pipeline.pipeline);
        pass.set_bind_group(0, &self.projection_group, &[]);
        pass.set_vertex_buffer(1, instance_buffer.slice(..));
        for (instance, draw) in queued.iter().enumerate() {
            let instance = instance as u32;
            let Some(texture) = state.textures.get(&draw.texture) else {
                logwise::warn_sync!("Skipping draw of deleted texture {id}", id = draw.texture.get());
                continue;
            };
            pass.set_bind_group(1, &texture.bind_group, &[]);
            match &draw.geometry {
                QueuedGeometry::Quad(vertices) => {
                    pass.set_vertex_buffer(0, vertices.slice(..));
                    pass.set_index_buffer(self.quad_indices.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..6, 0, instance..instance + 1);
                }
                QueuedGeometry::Indexed { vertices, indices, first_index, index_count } => {
                    let (Some(v), Some(i)) = (state.buffers.get(vertices), state.buffers.get(indices)) else {
                        logwise::warn_sync!("Skipping draw from deleted buffers");
                        continue;
                    };
                    let (first, count) = triangle_range(*first_index, *index_count);
                    pass.set_vertex_buffer(0, v.buffer.slice(..));
                    pass.set_index_buffer(i.buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(first..first + count, 0, instance..instance + 1);
                }
            }
        }
    }
}

impl Backend for WgpuBackend {
    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, Error> {
        let expected = descriptor.width as usize * descriptor.height as usize * BYTES_PER_PIXEL as usize;
        if descriptor.pixels.len() != expected {
            return Err(Error::SizeMismatch { expected, actual: descriptor.pixels.len() });
        }
        let ((texture, view, bind_group), error) = self.scoped(|| {
            let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(descriptor.debug_name),
                size: extent(descriptor.width, descriptor.height),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            });
            self.write_full(&texture, descriptor.width, descriptor.height, descriptor.pixels);
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let sampler = sampler::create_sampler(&self.device, descriptor.sampler, self.clamp_to_border, descriptor.debug_name);
            let bind_group = self.texture_bind_group(&view, &sampler, descriptor.debug_name);
            (texture, view, bind_group)
        });
        if let Some(e) = error {
            texture.destroy();
            return Err(Error::TextureAllocation {
                width: descriptor.width,
                height: descriptor.height,
                reason: e.to_string(),
            });
        }
        let id = match self.ids.next() {
            Ok(raw) => TextureId(raw),
            Err(e) => {
                texture.destroy();
                return Err(e);
            }
        };
        self.state().textures.insert(
            id,
            GpuTexture {
                texture,
                view,
                bind_group,
                width: descriptor.width,
                height: descriptor.height,
                label: descriptor.debug_name.to_owned(),
            },
        );
        Ok(id)
    }

    fn delete_texture(&self, texture: TextureId) {
        if let Some(t) = self.state().textures.remove(&texture) {
            t.texture.destroy();
        }
    }

    fn write_texture(&self, texture: TextureId, pixels: &[u8]) -> Result<(), Error> {
        let state = self.state();
        let t = state.textures.get(&texture).ok_or(Error::NoSuchTexture(texture))?;
        let expected = t.width as usize * t.height as usize * BYTES_PER_PIXEL as usize;
        if pixels.len() != expected {
            return Err(Error::SizeMismatch { expected, actual: pixels.len() });
        }
        let ((), error) = self.scoped(|| self.write_full(&t.texture, t.width, t.height, pixels));
        match error {
            Some(e) => Err(Error::Transfer(e.to_string())),
            None => Ok(()),
        }
    }

    fn read_texture(&self, texture: TextureId) -> Result<Vec<u8>, Error> {
        let state = self.state();
        let t = state.textures.get(&texture).ok_or(Error::NoSuchTexture(texture))?;
        let bytes_per_row = padded_bytes_per_row(t.width);
        let (staging, error) = self.scoped(|| {
            let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("texture read-back"),
                size: (bytes_per_row * t.height) as u64,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                mapped_at_creation: false,
            });
            let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("texture read-back"),
            });
            encoder.copy_texture_to_buffer(
                TexelCopyTextureInfo {
                    texture: &t.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &staging,
                    layout: TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(bytes_per_row),
                        rows_per_image: None,
                    },
                },
                extent(t.width, t.height),
            );
            self.queue.submit(std::iter::once(encoder.finish()));
            staging
        });
        if let Some(e) = error {
            return Err(Error::Readback(e.to_string()));
        }

        let mapped: Arc<Mutex<Option<Result<(), wgpu::BufferAsyncError>>>> = Arc::new(Mutex::new(None));
        let move_mapped = mapped.clone();
        staging.slice(..).map_async(wgpu::MapMode::Read, move |result| {
            *move_mapped.lock().unwrap_or_else(|e| e.into_inner()) = Some(result);
        });
        self.device.poll(wgpu::PollType::Wait)?;
        let result = mapped
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or_else(|| Error::Readback(format!("mapping {} never completed", t.label)))?;
        result?;

        let row = (t.width * BYTES_PER_PIXEL) as usize;
        let mut out = Vec::with_capacity(row * t.height as usize);
        {
            let view = staging.slice(..).get_mapped_range();
            for chunk in view.chunks_exact(bytes_per_row as usize) {
                out.extend_from_slice(&chunk[..row]);
            }
        }
        staging.unmap();
        Ok(out)
    }

    fn configure_sampler(&self, texture: TextureId, config: SamplerConfig) -> Result<(), Error> {
        let mut state = self.state();
        let t = state.textures.get_mut(&texture).ok_or(Error::NoSuchTexture(texture))?;
        let (bind_group, error) = self.scoped(|| {
            let sampler = sampler::create_sampler(&self.device, config, self.clamp_to_border, &t.label);
            self.texture_bind_group(&t.view, &sampler, &t.label)
        });
        if let Some(e) = error {
            return Err(Error::Transfer(e.to_string()));
        }
        t.bind_group = bind_group;
        Ok(())
    }

    fn create_buffer(&self, kind: BufferKind, contents: &[u8], debug_name: &str) -> Result<BufferId, Error> {
        let (buffer, error) = self.scoped(|| match kind {
            BufferKind::Vertex => self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(debug_name),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            }),
            BufferKind::Index => {
                let triangles = quads_to_triangles(&indices_from_bytes(contents));
                self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(debug_name),
                    contents: &indices_to_bytes(&triangles),
                    usage: wgpu::BufferUsages::INDEX,
                })
            }
        });
        if let Some(e) = error {
            buffer.destroy();
            return Err(Error::BufferAllocation(e.to_string()));
        }
        let id = match self.ids.next() {
            Ok(raw) => BufferId(raw),
            Err(e) => {
                buffer.destroy();
                return Err(e);
            }
        };
        self.state().buffers.insert(id, GpuBuffer { buffer, kind });
        Ok(id)
    }

    fn delete_buffer(&self, buffer: BufferId) {
        if let Some(b) = self.state().buffers.remove(&buffer) {
            b.buffer.destroy();
        }
    }

    fn draw(&self, command: &DrawCommand<'_>) -> Result<(), Error> {
        let mut state = self.state();
        if !state.textures.contains_key(&command.texture) {
            return Err(Error::NoSuchTexture(command.texture));
        }
        let geometry = match command.geometry {
            Geometry::Quad(quad) => QueuedGeometry::Quad(self.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("immediate quad"),
                    contents: &records_to_bytes(quad),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            )),
            Geometry::Indexed { vertices, indices, first_index, index_count } => {
                match (state.buffers.get(&vertices), state.buffers.get(&indices)) {
                    (Some(v), Some(i)) if v.kind == BufferKind::Vertex && i.kind == BufferKind::Index => {}
                    (None, _) => return Err(Error::NoSuchBuffer(vertices)),
                    (_, None) => return Err(Error::NoSuchBuffer(indices)),
                    _ => return Err(Error::Draw("buffer bound with the wrong kind".to_owned())),
                }
                QueuedGeometry::Indexed { vertices, indices, first_index, index_count }
            }
        };
        state.queue.push(QueuedDraw { texture: command.texture, transform: command.transform, geometry });
        Ok(())
    }
}
