//! Full-screen pass emission
//!
//! Draws the corner-tagged quad over the destination with the bound
//! evaluator, or copies source to destination when there is none.

use crate::config::EffectConfig;
use crate::error::{RenderError, Result};
use crate::quad::{FULL_SCREEN_QUAD, QUAD_INDICES, QuadVertex};
use crate::shader::{self, FRAGMENT_ENTRY, VERTEX_ENTRY};
use bytemuck::Zeroable;
use marcher_scene::{FrameUniforms, FrameUniformsGpu, ShapeArraysGpu};
use std::sync::Arc;
use wgpu::util::DeviceExt;

/// GPU resources for the full-screen pass
pub struct FullScreenPass {
    device: Arc<wgpu::Device>,
    target_format: wgpu::TextureFormat,
    frame_buffer: wgpu::Buffer,
    shape_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    source_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pipeline_layout: wgpu::PipelineLayout,
    program: Option<wgpu::RenderPipeline>,
    clear_color: wgpu::Color,
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl FullScreenPass {
    /// Create the pass without an evaluator; it copies until one is set
    pub fn new(
        device: Arc<wgpu::Device>,
        target_format: wgpu::TextureFormat,
        config: &EffectConfig,
    ) -> Self {
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&FrameUniformsGpu::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shape_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shape Array Buffer"),
            contents: bytemuck::bytes_of(&ShapeArraysGpu::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Full Screen Quad Vertices"),
            contents: bytemuck::cast_slice(&FULL_SCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Full Screen Quad Indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Uniform Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shape_buffer.as_entire_binding(),
                },
            ],
        });

        let source_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Source Image Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Source Image Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Full Screen Pass Layout"),
            bind_group_layouts: &[&uniform_layout, &source_layout],
            push_constant_ranges: &[],
        });

        Self {
            device,
            target_format,
            frame_buffer,
            shape_buffer,
            vertex_buffer,
            index_buffer,
            uniform_bind_group,
            source_layout,
            sampler,
            pipeline_layout,
            program: None,
            clear_color: config.clear_color(),
        }
    }

    /// Compile an evaluator fragment stage against the prelude
    ///
    /// On failure the previous program is dropped and the pass copies.
    pub fn set_program(&mut self, fragment_source: &str) -> Result<()> {
        self.program = None;
        let source = shader::build_program(fragment_source);

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Evaluator Shader"),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Evaluator Pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(VERTEX_ENTRY),
                    buffers: &[QuadVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.target_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            });

        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::EvaluatorRejected(error.to_string()));
        }

        self.program = Some(pipeline);
        Ok(())
    }

    /// Remove the evaluator so the pass copies
    pub fn clear_program(&mut self) {
        self.program = None;
    }

    pub fn has_program(&self) -> bool {
        self.program.is_some()
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Record a frame's uniforms into `encoder`; shape arrays are skipped when empty
    ///
    /// The writes are staged and copied in encoder order, so several frames
    /// recorded into one encoder each draw with their own uniforms.
    pub fn upload(&self, encoder: &mut wgpu::CommandEncoder, frame: &FrameUniforms) {
        self.stage(
            encoder,
            &self.frame_buffer,
            bytemuck::bytes_of(&frame.gpu_frame()),
            "Frame Uniform Staging",
        );

        if let Some(shapes) = frame.gpu_shapes() {
            self.stage(
                encoder,
                &self.shape_buffer,
                bytemuck::bytes_of(&shapes),
                "Shape Array Staging",
            );
        }
    }

    fn stage(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::Buffer,
        contents: &[u8],
        label: &str,
    ) {
        let staging = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::COPY_SRC,
            });
        encoder.copy_buffer_to_buffer(&staging, 0, target, 0, contents.len() as u64);
    }

    /// Record the evaluator draw into `encoder`
    ///
    /// Falls back to [`copy`](Self::copy) when no program is set.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::Texture,
        destination: &wgpu::Texture,
    ) -> Result<()> {
        let Some(program) = &self.program else {
            return Self::copy(encoder, source, destination);
        };

        check_sizes(source, destination)?;
        check_format(self.target_format, destination.format())?;

        let source_view = source.create_view(&wgpu::TextureViewDescriptor::default());
        let destination_view = destination.create_view(&wgpu::TextureViewDescriptor::default());

        let source_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Source Image Bind Group"),
            layout: &self.source_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Raymarching Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &destination_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(program);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &source_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);

        Ok(())
    }

    /// Identity fallback: copy source to destination unchanged
    pub fn copy(
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::Texture,
        destination: &wgpu::Texture,
    ) -> Result<()> {
        check_sizes(source, destination)?;
        check_format(source.format(), destination.format())?;

        encoder.copy_texture_to_texture(
            source.as_image_copy(),
            destination.as_image_copy(),
            source.size(),
        );
        Ok(())
    }
}

fn check_sizes(source: &wgpu::Texture, destination: &wgpu::Texture) -> Result<()> {
    let source_size = (source.width(), source.height());
    let destination_size = (destination.width(), destination.height());
    if source_size != destination_size {
        return Err(RenderError::TargetSizeMismatch {
            source_size,
            destination_size,
        });
    }
    Ok(())
}

fn check_format(expected: wgpu::TextureFormat, actual: wgpu::TextureFormat) -> Result<()> {
    if expected != actual {
        return Err(RenderError::TargetFormatMismatch { expected, actual });
    }
    Ok(())
}
