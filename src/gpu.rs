//! GPU presentation of the CPU drawing surface.
//!
//! The effects draw into an RGBA [`Surface`] on the CPU. Each frame the
//! [`Presenter`] uploads that surface into a texture and draws it with a
//! fullscreen triangle, restricted to the host region through the viewport.
//! A host region running past the window edge is cropped, not scaled: only
//! the visible part of the texture is sampled.

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::input::HostRegion;
use crate::surface::Surface;

/// Fullscreen-triangle shader sampling the uploaded trail texture.
pub const PRESENT_SHADER: &str = r#"
struct PresentUniforms {
    tint: vec4<f32>,
    // xy: offset, zw: scale of the sampled texture window
    uv_rect: vec4<f32>,
};

@group(0) @binding(0) var trail_texture: texture_2d<f32>;
@group(0) @binding(1) var trail_sampler: sampler;
@group(0) @binding(2) var<uniform> uniforms: PresentUniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    out.uv = uvs[vertex_index];
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = uniforms.uv_rect.xy + in.uv * uniforms.uv_rect.zw;
    return textureSample(trail_texture, trail_sampler, uv) * uniforms.tint;
}
"#;

const TRAIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct PresentUniforms {
    tint: [f32; 4],
    uv_rect: [f32; 4],
}

impl PresentUniforms {
    fn new(opacity: f32, uv_rect: [f32; 4]) -> Self {
        Self {
            tint: [1.0, 1.0, 1.0, opacity],
            uv_rect,
        }
    }
}

/// Where the trail texture lands in the render target.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PresentRect {
    /// Viewport `[x, y, w, h]` in target pixels.
    viewport: [f32; 4],
    /// Sampled texture window `[u, v, du, dv]` in normalized coordinates.
    uv_rect: [f32; 4],
}

/// Window surface plus the texture the trail is uploaded into.
pub struct Presenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,
    texture: wgpu::Texture,
    texture_size: (u32, u32),
    viewport: Option<HostRegion>,
    background: wgpu::Color,
    opacity: f32,
}

impl Presenter {
    pub async fn new(
        window: Arc<Window>,
        viewport: Option<HostRegion>,
        background: [f32; 4],
        opacity: f32,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let opacity = opacity.clamp(0.0, 1.0);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        log::info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Trail Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Trail Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Present Uniform Buffer"),
            contents: bytemuck::bytes_of(&PresentUniforms::new(opacity, FULL_UV)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Present Shader"),
            source: wgpu::ShaderSource::Wgsl(PRESENT_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Present Bind Group Layout"),
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
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
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
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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

        let (width, height) = match viewport {
            Some(v) => (v.width, v.height),
            None => (config.width, config.height),
        };
        let texture = create_trail_texture(&device, width, height);
        let bind_group =
            create_bind_group(&device, &bind_group_layout, &texture, &sampler, &uniform_buffer);

        let [r, g, b, a] = background;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group_layout,
            bind_group,
            sampler,
            uniform_buffer,
            texture,
            texture_size: (width, height),
            viewport,
            background: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
            opacity,
        })
    }

    /// Reconfigure the window surface after a resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size, after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload `frame` and present it.
    pub fn present(&mut self, frame: &Surface) -> Result<(), wgpu::SurfaceError> {
        let (width, height) = (frame.width(), frame.height());
        if self.texture_size != (width, height) {
            self.texture = create_trail_texture(&self.device, width, height);
            self.bind_group = create_bind_group(
                &self.device,
                &self.bind_group_layout,
                &self.texture,
                &self.sampler,
                &self.uniform_buffer,
            );
            self.texture_size = (width, height);
        }

        let rect = present_rect(self.viewport, self.config.width, self.config.height);
        if let Some(rect) = rect {
            let uniforms = PresentUniforms::new(self.opacity, rect.uv_rect);
            self.queue
                .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(PresentRect {
                viewport: [x, y, w, h],
                ..
            }) = rect
            {
                render_pass.set_viewport(x, y, w, h, 0.0, 1.0);
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_trail_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Trail Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TRAIL_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &wgpu::Texture,
    sampler: &wgpu::Sampler,
    uniform_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Present Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
    })
}

const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Viewport for the host region clipped to the render target, plus the part
/// of the host-sized texture that stays visible. `None` when nothing of the
/// region is visible.
fn present_rect(host: Option<HostRegion>, target_w: u32, target_h: u32) -> Option<PresentRect> {
    let Some(h) = host else {
        if target_w == 0 || target_h == 0 {
            return None;
        }
        return Some(PresentRect {
            viewport: [0.0, 0.0, target_w as f32, target_h as f32],
            uv_rect: FULL_UV,
        });
    };

    let x0 = h.x.min(target_w);
    let y0 = h.y.min(target_h);
    let x1 = h.x.saturating_add(h.width).min(target_w);
    let y1 = h.y.saturating_add(h.height).min(target_h);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let (hw, hh) = (h.width as f32, h.height as f32);
    Some(PresentRect {
        viewport: [x0 as f32, y0 as f32, (x1 - x0) as f32, (y1 - y0) as f32],
        uv_rect: [
            (x0 - h.x) as f32 / hw,
            (y0 - h.y) as f32 / hh,
            (x1 - x0) as f32 / hw,
            (y1 - y0) as f32 / hh,
        ],
    })
}
