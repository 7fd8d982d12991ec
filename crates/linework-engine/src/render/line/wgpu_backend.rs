use std::num::NonZeroU64;

use winit::dpi::PhysicalSize;

use crate::coords::Viewport;
use crate::device::{Drawable, Gpu};

use super::backend::{BackendError, DrawCall, LineBackend, PassDesc, PipelineDesc};

/// `LineBackend` on top of one window's wgpu device and queue.
///
/// wgpu owns command memory: "resetting the allocator" is creating a fresh
/// encoder, and the drawable's acquire/present synchronization is inserted by
/// the surface.
#[derive(Clone)]
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
}

/// A line pipeline and the layout its binding table must match.
pub struct WgpuPipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
}

impl WgpuBackend {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            format,
        }
    }

    /// Backend targeting the window surface owned by `gpu`.
    pub fn for_gpu(gpu: &Gpu<'_>) -> Self {
        Self::new(gpu.device(), gpu.queue(), gpu.surface_format())
    }

    /// Runs `f` inside validation and out-of-memory error scopes.
    ///
    /// Errors raised by object creation are returned here instead of reaching
    /// the device's uncaptured-error handler, which panics by default.
    fn scoped<T>(&self, what: &str, f: impl FnOnce(&wgpu::Device) -> T) -> Result<T, BackendError> {
        let out_of_memory = self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let validation = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let value = f(&self.device);

        // Scopes pop innermost first.
        let validation = pollster::block_on(validation.pop());
        let out_of_memory = pollster::block_on(out_of_memory.pop());

        match validation.or(out_of_memory) {
            None => Ok(value),
            Some(err) => Err(BackendError::new(format!("{what}: {err}"))),
        }
    }
}

impl LineBackend for WgpuBackend {
    type Buffer = wgpu::Buffer;
    type Pipeline = WgpuPipeline;
    type Encoder = wgpu::CommandEncoder;
    type Pass = wgpu::RenderPass<'static>;
    type Drawable = Drawable;

    fn create_buffer(&mut self, label: &str, size: u64) -> Result<wgpu::Buffer, BackendError> {
        let limits = self.device.limits();
        let max = limits
            .max_buffer_size
            .min(u64::from(limits.max_uniform_buffer_binding_size));
        if size == 0 || size > max {
            return Err(BackendError::new(format!(
                "{label}: size {size} outside 1..={max}"
            )));
        }

        self.scoped(label, |device| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        })
    }

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<WgpuPipeline, BackendError> {
        let format = self.format;

        self.scoped(desc.label, |device| {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.shaders.module.label),
                source: wgpu::ShaderSource::Wgsl(desc.shaders.module.wgsl.into()),
            });

            let entries: Vec<wgpu::BindGroupLayoutEntry> = desc
                .slots
                .iter()
                .map(|role| wgpu::BindGroupLayoutEntry {
                    binding: role.slot(),
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(role.size()),
                    },
                    count: None,
                })
                .collect();

            let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(desc.label),
                entries: &entries,
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(desc.label),
                bind_group_layouts: &[&layout],
                immediate_size: 0,
            });

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&pipeline_layout),

                // No vertex buffers: the shader indexes the payload uniform.
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(desc.shaders.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: &[],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(desc.shaders.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: desc.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

            WgpuPipeline { pipeline, layout }
        })
    }

    fn drawable_size(&self, drawable: &Drawable) -> PhysicalSize<u32> {
        drawable.pixel_size()
    }

    fn write_buffer(&mut self, buffer: &wgpu::Buffer, bytes: &[u8]) {
        self.queue.write_buffer(buffer, 0, bytes);
    }

    fn begin_commands(&mut self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("linework frame encoder"),
            })
    }

    fn begin_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        drawable: &Drawable,
        pass: &PassDesc,
    ) -> Result<wgpu::RenderPass<'static>, BackendError> {
        if drawable.surface_texture.texture.format().remove_srgb_suffix()
            != self.format.remove_srgb_suffix()
        {
            return Err(BackendError::new(format!(
                "drawable format {:?} does not match pipeline format {:?}",
                drawable.surface_texture.texture.format(),
                self.format
            )));
        }

        let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("linework line pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &drawable.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(pass.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        // The encoder stays locked until the pass is ended in `end_pass`.
        Ok(rpass.forget_lifetime())
    }

    fn set_viewport(&mut self, pass: &mut wgpu::RenderPass<'static>, viewport: Viewport) {
        pass.set_viewport(
            viewport.x,
            viewport.y,
            viewport.width,
            viewport.height,
            viewport.min_depth,
            viewport.max_depth,
        );
    }

    fn bind(
        &mut self,
        pass: &mut wgpu::RenderPass<'static>,
        pipeline: &WgpuPipeline,
        buffers: &[(u32, &wgpu::Buffer)],
    ) {
        let entries: Vec<wgpu::BindGroupEntry> = buffers
            .iter()
            .map(|(slot, buffer)| wgpu::BindGroupEntry {
                binding: *slot,
                resource: buffer.as_entire_binding(),
            })
            .collect();

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("linework binding table"),
            layout: &pipeline.layout,
            entries: &entries,
        });

        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
    }

    fn draw(&mut self, pass: &mut wgpu::RenderPass<'static>, call: &DrawCall) {
        debug_assert_eq!(call.topology, wgpu::PrimitiveTopology::LineStrip);
        pass.draw(call.vertices.clone(), 0..1);
    }

    fn end_pass(&mut self, pass: wgpu::RenderPass<'static>) {
        drop(pass);
    }

    fn submit_and_present(&mut self, encoder: wgpu::CommandEncoder, drawable: Drawable) {
        self.queue.submit(std::iter::once(encoder.finish()));
        drawable.present();
    }
}
