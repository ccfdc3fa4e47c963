// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::num::NonZero;

use wgpu::{
    BindGroupLayoutEntry, BindingType, BlendState, BufferBindingType, ColorTargetState, MultisampleState,
    PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology, RenderPipeline,
    RenderPipelineDescriptor, SamplerBindingType, TextureFormat, TextureSampleType, TextureViewDimension,
    VertexAttribute, VertexBufferLayout, VertexState, VertexStepMode,
};

use kurbo::Affine;

use crate::images::transform::Transform;
use crate::images::vertex_layout::{VertexFieldType, VertexLayout};

const SHADER: &str = r#"
struct Projection {
    matrix: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> projection: Projection;
@group(1) @binding(0) var quad_texture: texture_2d<f32>;
@group(1) @binding(1) var quad_sampler: sampler;

struct VertexIn {
    @location(0) x: f32,
    @location(1) y: f32,
    @location(2) s: f32,
    @location(3) t: f32,
    @location(4) row0: vec4<f32>,
    @location(5) row1: vec4<f32>,
};

struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(v: VertexIn) -> VertexOut {
    let p = vec3<f32>(v.x, v.y, 1.0);
    let placed = vec2<f32>(dot(v.row0.xyz, p), dot(v.row1.xyz, p));
    var out: VertexOut;
    out.position = projection.matrix * vec4<f32>(placed, 0.0, 1.0);
    out.uv = vec2<f32>(v.s, v.t);
    return out;
}

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    return textureSample(quad_texture, quad_sampler, in.uv);
}
"#;

/// Bytes per instance: two rows of a transform, each padded to a vec4.
pub(super) const INSTANCE_STRIDE: u64 = 32;
/// A column-major 4x4 matrix.
pub(super) const PROJECTION_SIZE: u64 = 64;

/// The alpha-blended textured-quad pipeline and the layouts its bind groups need.
#[derive(Debug)]
pub(super) struct QuadPipeline {
    pub(super) pipeline: RenderPipeline,
    pub(super) projection_layout: wgpu::BindGroupLayout,
    pub(super) texture_layout: wgpu::BindGroupLayout,
}

impl QuadPipeline {
    pub(super) fn new(device: &wgpu::Device, target_format: TextureFormat) -> Self {
        let projection_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("projection"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZero::new(PROJECTION_SIZE),
                },
                count: None, //not array
            }],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad texture"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("quad"),
            bind_group_layouts: &[&projection_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SHADER)),
        });

        //one attribute per VertexRecord field, then the two transform rows per instance
        let layout = VertexLayout::vertex_record();
        let mut vertex_attributes = Vec::new();
        let mut offset = 0;
        for (f, field) in layout.fields.iter().enumerate() {
            vertex_attributes.push(VertexAttribute {
                format: match field.r#type {
                    VertexFieldType::F32 => wgpu::VertexFormat::Float32,
                },
                offset,
                shader_location: f as u32,
            });
            offset += field.r#type.stride() as u64;
        }
        let instance_location = vertex_attributes.len() as u32;
        let instance_attributes = [
            VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 0, shader_location: instance_location },
            VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 16, shader_location: instance_location + 1 },
        ];
        let vertex_buffers = [
            VertexBufferLayout {
                array_stride: layout.element_stride() as u64,
                step_mode: VertexStepMode::Vertex,
                attributes: &vertex_attributes,
            },
            VertexBufferLayout {
                array_stride: INSTANCE_STRIDE,
                step_mode: VertexStepMode::Instance,
                attributes: &instance_attributes,
            },
        ];

        let primitive_state = PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            //y points down and transforms may mirror, so either winding is visible
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: PolygonMode::Fill,
            conservative: false,
        };
        let render_descriptor = RenderPipelineDescriptor {
            label: Some("quad"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &vertex_buffers,
            },
            primitive: primitive_state,
            depth_stencil: None,
            multisample: MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(ColorTargetState {
                    format: target_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: Default::default(),
                })],
            }),
            multiview: None,
            cache: None,
        };
        let pipeline = device.create_render_pipeline(&render_descriptor);
        logwise::trace_sync!("Created quad pipeline");
        QuadPipeline { pipeline, projection_layout, texture_layout }
    }
}

/// Orthographic projection mapping `(0, 0)..(width, height)` pixels, y down, onto clip space.
pub(super) fn ortho_bytes(width: f32, height: f32) -> Vec<u8> {
    let pixels_to_clip = Affine::new([2.0 / width as f64, 0.0, 0.0, -2.0 / height as f64, -1.0, 1.0]);
    Transform::from(pixels_to_clip).to_mat4().iter().flat_map(|f| f.to_le_bytes()).collect()
}
