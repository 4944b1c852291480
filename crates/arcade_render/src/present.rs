//! Uploads the CPU frame to the GPU and draws it letterboxed into the window.

use arcade_core::Rect;
use glam::Vec2;
use wgpu::util::DeviceExt;

use crate::frame::FrameBuffer;
use crate::vertex::PresentVertex;
use crate::GpuContext;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Largest rectangle with the frame's aspect ratio that fits the window,
/// centered. Window pixels.
pub fn letterbox(frame: (u32, u32), window: (u32, u32)) -> Rect {
    let (fw, fh) = (frame.0.max(1) as f32, frame.1.max(1) as f32);
    let (ww, wh) = (window.0 as f32, window.1 as f32);
    let scale = (ww / fw).min(wh / fh);
    let (w, h) = (fw * scale, fh * scale);
    Rect::new((ww - w) * 0.5, (wh - h) * 0.5, w, h)
}

/// Map a window-space cursor position to frame pixels. `None` when the cursor
/// is on the bars.
pub fn window_to_frame(point: Vec2, frame: (u32, u32), window: (u32, u32)) -> Option<Vec2> {
    let area = letterbox(frame, window);
    if area.is_empty() || !area.contains_point(point) {
        return None;
    }
    let scale = area.w / frame.0.max(1) as f32;
    Some((point - Vec2::new(area.x, area.y)) / scale)
}

fn clip_quad(area: Rect, window: (u32, u32)) -> [PresentVertex; 6] {
    let (ww, wh) = (window.0.max(1) as f32, window.1.max(1) as f32);
    let left = area.x / ww * 2.0 - 1.0;
    let right = area.right() / ww * 2.0 - 1.0;
    let top = 1.0 - area.y / wh * 2.0;
    let bottom = 1.0 - area.bottom() / wh * 2.0;
    PresentVertex::quad(left, top, right, bottom)
}

struct FrameTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

pub struct Presenter {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    vertex_buffer: wgpu::Buffer,
    frame: Option<FrameTexture>,
}

impl Presenter {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Present Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("present.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Present Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Present Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[PresentVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Pixel art: no filtering when scaling up.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Present Quad"),
            contents: bytemuck::cast_slice(&PresentVertex::quad(-1.0, 1.0, 1.0, -1.0)),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            vertex_buffer,
            frame: None,
        }
    }

    /// Copy the frame's pixels into the GPU texture, recreating the texture
    /// when the frame size changed.
    pub fn upload(&mut self, gpu: &GpuContext, frame: &FrameBuffer) {
        let size = frame.pixels().dimensions();
        if self.frame.as_ref().map(|f| f.size) != Some(size) {
            self.frame = Some(self.create_frame_texture(&gpu.device, size));
            log::info!("Frame texture created: {}x{}", size.0, size.1);
        }
        let Some(target) = &self.frame else {
            return;
        };

        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.pixels().as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.0),
                rows_per_image: Some(size.1),
            },
            wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Clear `view` to black and draw the last uploaded frame letterboxed.
    pub fn draw(&self, gpu: &GpuContext, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Present Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(target) = &self.frame else {
            return;
        };

        let area = letterbox(target.size, gpu.size);
        gpu.queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(&clip_quad(area, gpu.size)),
        );

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &target.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..6, 0..1);
    }

    fn create_frame_texture(&self, device: &wgpu::Device, size: (u32, u32)) -> FrameTexture {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        FrameTexture {
            texture,
            bind_group,
            size,
        }
    }
}
