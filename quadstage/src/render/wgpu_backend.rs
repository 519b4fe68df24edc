use std::collections::HashMap;

use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use wgpu::{
    vertex_attr_array, AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry,
    BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource,
    BindingType, Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoder, CommandEncoderDescriptor, CompositeAlphaMode, DeviceDescriptor, Extent3d,
    FilterMode, FragmentState, Instance, LoadOp, MultisampleState, Operations, Origin3d,
    PipelineLayoutDescriptor, PresentMode, PrimitiveState, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor, RequestAdapterOptions,
    SamplerBindingType, SamplerDescriptor, ShaderModuleDescriptor, ShaderSource,
    SurfaceConfiguration, TexelCopyBufferLayout, TexelCopyTextureInfo, Texture, TextureAspect,
    TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType, TextureUsages,
    TextureView, TextureViewDescriptor, TextureViewDimension, VertexState,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    error::EngineResult,
    math::{quad_rotation, Camera, Mat4, Vec3},
    render::query::{DrawQuery, UvRect},
};

/// Background colour behind every frame.
pub const CLEAR_COLOR: [f64; 4] = [0.15, 0.15, 0.15, 1.0];

const MAX_QUADS_PER_FRAME: u64 = 2048;

/// Queued quad draw, resolved to a bind group when the frame is flushed.
struct QuadDrawCommand {
    uniform_offset: u64,
    texture: String,
}

/// Window renderer drawing textured quads described by [`DrawQuery`]s.
pub struct Renderer<'window> {
    backend: WgpuBackend<'window>,
}

impl<'window> Renderer<'window> {
    pub fn new(window: &'window Window, vsync: bool) -> EngineResult<Self> {
        let backend = WgpuBackend::new(window, vsync)?;
        Ok(Self { backend })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.backend.resize(new_size);
    }

    /// Acquires the next surface texture. `Ok(None)` means the surface
    /// could not produce one this tick and the frame should be skipped.
    pub fn begin_frame(&mut self) -> Result<Option<Frame>> {
        self.backend.begin_frame()
    }

    /// Camera used by every draw queued after this call.
    pub fn set_camera(&mut self, camera: &Camera) {
        self.backend.camera = *camera;
    }

    pub fn camera(&self) -> &Camera {
        &self.backend.camera
    }

    /// Queues one quad. Unknown UV keys and overfull frames are logged and
    /// the draw is skipped.
    pub fn draw(&mut self, frame: &mut Frame, query: &DrawQuery) {
        self.backend.draw(frame, query);
    }

    pub fn end_frame(&mut self, frame: Frame) -> Result<()> {
        self.backend.end_frame(frame)
    }

    /// Uploads RGBA8 pixels as the texture `name`, replacing any previous
    /// texture of that name.
    pub fn register_texture(&mut self, name: &str, data: &[u8], width: u32, height: u32) {
        self.backend.register_texture(name, data, width, height);
    }

    /// Maps each UV key to a rectangle of the texture `texture`.
    pub fn set_uvs(&mut self, texture: &str, uvs: &[(String, UvRect)]) {
        for (key, rect) in uvs {
            self.backend
                .uvs
                .insert(key.clone(), (texture.to_string(), *rect));
        }
    }

    pub fn has_uv(&self, key: &str) -> bool {
        self.backend.uvs.contains_key(key)
    }

    pub fn texture_size(&self, name: &str) -> Option<(u32, u32)> {
        self.backend.textures.get(name).map(|t| t.size)
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (
            self.backend.surface_config.width,
            self.backend.surface_config.height,
        )
    }
}

pub struct Frame {
    surface_texture: Option<wgpu::SurfaceTexture>,
    view: TextureView,
    encoder: Option<CommandEncoder>,
    quad_draws: Vec<QuadDrawCommand>,
}

impl Frame {
    pub fn queued_draws(&self) -> usize {
        self.quad_draws.len()
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        // An abandoned frame still has to hand its texture back.
        if let Some(surface_texture) = self.surface_texture.take() {
            surface_texture.present();
        }
    }
}

struct TextureEntry {
    #[allow(dead_code)]
    texture: Texture,
    bind_group: BindGroup,
    size: (u32, u32),
}

struct QuadPipeline {
    pipeline: RenderPipeline,
    vertex_buffer: Buffer,
    uniform_buffer: Buffer,
    bind_group_layout: BindGroupLayout,
    uniform_stride: u64,
}

struct WgpuBackend<'window> {
    surface: wgpu::Surface<'window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: SurfaceConfiguration,
    present_mode: PresentMode,
    quad_pipeline: QuadPipeline,
    textures: HashMap<String, TextureEntry>,
    uvs: HashMap<String, (String, UvRect)>,
    camera: Camera,
    uniform_write_offset: u64,
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
struct QuadUniforms {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    uv: [f32; 4],
    color: [f32; 4],
}

impl QuadUniforms {
    fn new(query: &DrawQuery, uv: UvRect, camera: &Camera) -> Self {
        Self {
            model: model_matrix(query).to_cols_array_2d(),
            view: camera.view.to_cols_array_2d(),
            projection: camera.projection.to_cols_array_2d(),
            uv: uv.to_array(),
            color: query.color.to_array(),
        }
    }
}

/// Unit quad centred on the origin; v grows downwards in the texture.
const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex {
        position: [-0.5, -0.5],
        uv: [0.0, 1.0],
    },
    QuadVertex {
        position: [0.5, -0.5],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [0.5, 0.5],
        uv: [1.0, 0.0],
    },
    QuadVertex {
        position: [-0.5, -0.5],
        uv: [0.0, 1.0],
    },
    QuadVertex {
        position: [0.5, 0.5],
        uv: [1.0, 0.0],
    },
    QuadVertex {
        position: [-0.5, 0.5],
        uv: [0.0, 0.0],
    },
];

/// Scale, then rotate, then translate.
fn model_matrix(query: &DrawQuery) -> Mat4 {
    Mat4::from_translation(query.translation)
        * quad_rotation(query.rotation)
        * Mat4::from_scale(Vec3::new(query.scale.x, query.scale.y, 1.0))
}

/// Next step after `get_current_texture` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceRecovery {
    Reconfigure,
    Skip,
}

/// Lost and outdated surfaces get one reconfigure per frame; after that, and
/// on timeouts, the frame is skipped. Only memory and driver failures stop
/// the game.
fn surface_recovery(err: &wgpu::SurfaceError, reconfigured: bool) -> Result<SurfaceRecovery> {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if reconfigured {
                Ok(SurfaceRecovery::Skip)
            } else {
                Ok(SurfaceRecovery::Reconfigure)
            }
        }
        wgpu::SurfaceError::Timeout => Ok(SurfaceRecovery::Skip),
        wgpu::SurfaceError::OutOfMemory => Err(anyhow!("surface ran out of memory")),
        wgpu::SurfaceError::Other => Err(anyhow!("surface error: other")),
    }
}

/// Looks up the texture and UV rectangle for `key`, or logs why the draw has
/// to be dropped: an unregistered key, or no uniform slot left this frame.
fn resolve_draw<'a>(
    uvs: &'a HashMap<String, (String, UvRect)>,
    key: &str,
    offset: u64,
    stride: u64,
    capacity: u64,
) -> Option<&'a (String, UvRect)> {
    let Some(entry) = uvs.get(key) else {
        log::warn!("no texture registered for uv key `{key}`");
        return None;
    };

    if offset + stride > capacity {
        log::warn!("too many quads drawn in one frame (max: {MAX_QUADS_PER_FRAME}), skipping `{key}`");
        return None;
    }

    Some(entry)
}

fn align_up(value: u64, alignment: u64) -> u64 {
    (value + alignment - 1) & !(alignment - 1)
}

impl<'window> WgpuBackend<'window> {
    fn new(window: &'window Window, vsync: bool) -> EngineResult<Self> {
        let instance = Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("quadstage-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: Default::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        }))?;

        let size = window.inner_size();
        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .unwrap_or(TextureFormat::Bgra8UnormSrgb);

        let present_mode = choose_present_mode(&capabilities.present_modes, vsync);
        let alpha_mode = choose_alpha_mode(&capabilities.alpha_modes);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let quad_pipeline = create_quad_pipeline(&device, format);
        log::info!(
            "renderer ready: {} ({:?}, {:?})",
            adapter.get_info().name,
            format,
            present_mode
        );

        let camera = Camera::perspective_default(
            surface_config.width as f32,
            surface_config.height as f32,
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            present_mode,
            quad_pipeline,
            textures: HashMap::new(),
            uvs: HashMap::new(),
            camera,
            uniform_write_offset: 0,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface_config.present_mode = self.present_mode;
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn begin_frame(&mut self) -> Result<Option<Frame>> {
        self.uniform_write_offset = 0;

        let mut reconfigured = false;
        loop {
            match self.surface.get_current_texture() {
                Ok(surface_texture) => {
                    let view = surface_texture
                        .texture
                        .create_view(&TextureViewDescriptor::default());
                    let encoder = self
                        .device
                        .create_command_encoder(&CommandEncoderDescriptor {
                            label: Some("frame-encoder"),
                        });

                    return Ok(Some(Frame {
                        surface_texture: Some(surface_texture),
                        view,
                        encoder: Some(encoder),
                        quad_draws: Vec::new(),
                    }));
                }
                Err(err) => match surface_recovery(&err, reconfigured)? {
                    SurfaceRecovery::Reconfigure => {
                        log::debug!("surface {err}, reconfiguring");
                        self.surface.configure(&self.device, &self.surface_config);
                        reconfigured = true;
                    }
                    SurfaceRecovery::Skip => {
                        log::debug!("no surface texture this tick ({err}), skipping frame");
                        return Ok(None);
                    }
                },
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, query: &DrawQuery) {
        let Some((texture, uv)) = resolve_draw(
            &self.uvs,
            &query.texture_key,
            self.uniform_write_offset,
            self.quad_pipeline.uniform_stride,
            self.quad_pipeline.uniform_buffer.size(),
        ) else {
            return;
        };

        let uniforms = QuadUniforms::new(query, *uv, &self.camera);
        let offset = self.uniform_write_offset;
        self.queue.write_buffer(
            &self.quad_pipeline.uniform_buffer,
            offset,
            bytemuck::bytes_of(&uniforms),
        );

        frame.quad_draws.push(QuadDrawCommand {
            uniform_offset: offset,
            texture: texture.clone(),
        });
        self.uniform_write_offset = offset + self.quad_pipeline.uniform_stride;
    }

    fn flush_quads(&mut self, frame: &mut Frame) -> Result<()> {
        let encoder = frame
            .encoder
            .as_mut()
            .ok_or_else(|| anyhow!("Frame already ended"))?;

        let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("quad-pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(wgpu::Color {
                        r: CLEAR_COLOR[0],
                        g: CLEAR_COLOR[1],
                        b: CLEAR_COLOR[2],
                        a: CLEAR_COLOR[3],
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            multiview_mask: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        pass.set_pipeline(&self.quad_pipeline.pipeline);
        pass.set_vertex_buffer(0, self.quad_pipeline.vertex_buffer.slice(..));

        for draw_cmd in &frame.quad_draws {
            // Textures can be replaced mid-frame; a vanished one is skipped.
            let Some(entry) = self.textures.get(&draw_cmd.texture) else {
                continue;
            };
            pass.set_bind_group(0, &entry.bind_group, &[draw_cmd.uniform_offset as u32]);
            pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
        }

        Ok(())
    }

    fn end_frame(&mut self, mut frame: Frame) -> Result<()> {
        self.flush_quads(&mut frame)?;

        let encoder = frame
            .encoder
            .take()
            .ok_or_else(|| anyhow!("Frame already ended"))?;
        self.queue.submit(Some(encoder.finish()));

        let surface_texture = frame
            .surface_texture
            .take()
            .ok_or_else(|| anyhow!("Frame already ended"))?;
        surface_texture.present();
        Ok(())
    }

    fn register_texture(&mut self, name: &str, data: &[u8], width: u32, height: u32) {
        let size = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&TextureDescriptor {
            label: Some(name),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            data,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&SamplerDescriptor {
            label: Some("quad-sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let uniform_size = std::mem::size_of::<QuadUniforms>() as u64;
        let bind_group = self.device.create_bind_group(&BindGroupDescriptor {
            label: Some("quad-bind-group"),
            layout: &self.quad_pipeline.bind_group_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &self.quad_pipeline.uniform_buffer,
                        offset: 0,
                        size: std::num::NonZeroU64::new(uniform_size),
                    }),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::TextureView(&view),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::debug!("registered texture `{name}` ({width}x{height})");
        self.textures.insert(
            name.to_string(),
            TextureEntry {
                texture,
                bind_group,
                size: (width, height),
            },
        );
    }
}

fn create_quad_pipeline(device: &wgpu::Device, surface_format: TextureFormat) -> QuadPipeline {
    let shader = device.create_shader_module(ShaderModuleDescriptor {
        label: Some("quad-shader"),
        source: ShaderSource::Wgsl(include_str!("quad.wgsl").into()),
    });

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("quad-bind-group-layout"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<QuadUniforms>() as u64,
                    ),
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("quad-pipeline-layout"),
        bind_group_layouts: &[&bind_group_layout],
        immediate_size: 0,
    });

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("quad-vertices"),
        contents: bytemuck::cast_slice(&QUAD_VERTICES),
        usage: BufferUsages::VERTEX,
    });

    let uniform_alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
    let uniform_stride = align_up(std::mem::size_of::<QuadUniforms>() as u64, uniform_alignment);

    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("quad-uniform-buffer"),
        size: MAX_QUADS_PER_FRAME * uniform_stride,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("quad-pipeline"),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &vertex_attr_array![0 => Float32x2, 1 => Float32x2],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: PrimitiveState::default(),
        depth_stencil: None,
        multisample: MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    QuadPipeline {
        pipeline,
        vertex_buffer,
        uniform_buffer,
        bind_group_layout,
        uniform_stride,
    }
}

fn choose_present_mode(modes: &[PresentMode], vsync: bool) -> PresentMode {
    if vsync {
        modes
            .iter()
            .copied()
            .find(|mode| matches!(mode, PresentMode::Fifo | PresentMode::FifoRelaxed))
            .unwrap_or(PresentMode::Fifo)
    } else {
        modes
            .iter()
            .copied()
            .find(|mode| matches!(mode, PresentMode::Immediate | PresentMode::Mailbox))
            .unwrap_or(PresentMode::Fifo)
    }
}

fn choose_alpha_mode(modes: &[CompositeAlphaMode]) -> CompositeAlphaMode {
    modes
        .iter()
        .copied()
        .find(|mode| matches!(mode, CompositeAlphaMode::Auto))
        .unwrap_or_else(|| modes.first().copied().unwrap_or(CompositeAlphaMode::Opaque))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec2, Vec4};

    #[test]
    fn model_scales_before_translating() {
        let mut query = DrawQuery::new("title");
        query.scale = Vec2::new(512.0, 64.0);
        query.translation = Vec3::new(-354.0, -72.0, 0.0);
        let corner = model_matrix(&query) * Vec4::new(0.5, 0.5, 0.0, 1.0);
        assert!((corner.x - (-354.0 + 256.0)).abs() < 1e-3);
        assert!((corner.y - (-72.0 + 32.0)).abs() < 1e-3);
    }

    #[test]
    fn uniforms_fit_in_one_aligned_slot() {
        let size = std::mem::size_of::<QuadUniforms>() as u64;
        assert_eq!(size, 224);
        assert_eq!(align_up(size, 256), 256);
        assert_eq!(align_up(size, 32), 224);
    }

    #[test]
    fn uniforms_carry_query_camera_and_uv() {
        let mut query = DrawQuery::new("load");
        query.color = Vec4::new(1.0, 1.0, 1.0, 0.5);
        let camera = Camera::screen(1280.0, 960.0);
        let uv = UvRect::new(0.0, 0.0, 0.625, 0.9375);
        let uniforms = QuadUniforms::new(&query, uv, &camera);
        assert_eq!(uniforms.uv, [0.0, 0.0, 0.625, 0.9375]);
        assert_eq!(uniforms.color, [1.0, 1.0, 1.0, 0.5]);
        assert_eq!(uniforms.projection, camera.projection.to_cols_array_2d());
        assert_eq!(uniforms.model, Mat4::IDENTITY.to_cols_array_2d());
    }

    fn title_uvs() -> HashMap<String, (String, UvRect)> {
        HashMap::from([(
            "start".to_string(),
            ("title".to_string(), UvRect::new(0.0, 0.5, 0.5, 0.25)),
        )])
    }

    #[test]
    fn resolve_draw_finds_registered_keys() {
        let uvs = title_uvs();
        let (texture, uv) = resolve_draw(&uvs, "start", 0, 256, 256 * MAX_QUADS_PER_FRAME).unwrap();
        assert_eq!(texture, "title");
        assert_eq!(*uv, UvRect::new(0.0, 0.5, 0.5, 0.25));
    }

    #[test]
    fn unknown_uv_key_is_skipped_without_using_a_slot() {
        let uvs = title_uvs();
        let capacity = 256 * MAX_QUADS_PER_FRAME;
        let mut offset = 0;
        let mut queued = Vec::new();
        for key in ["start", "missing", "start"] {
            if let Some((texture, _)) = resolve_draw(&uvs, key, offset, 256, capacity) {
                queued.push((offset, texture.clone()));
                offset += 256;
            }
        }
        assert_eq!(queued, vec![(0, "title".to_string()), (256, "title".to_string())]);
    }

    #[test]
    fn draws_past_frame_capacity_are_skipped() {
        let uvs = title_uvs();
        let capacity = 256 * MAX_QUADS_PER_FRAME;
        assert!(resolve_draw(&uvs, "start", capacity - 256, 256, capacity).is_some());
        assert!(resolve_draw(&uvs, "start", capacity, 256, capacity).is_none());
    }

    #[test]
    fn outdated_surface_reconfigures_once_then_skips() {
        let outdated = wgpu::SurfaceError::Outdated;
        assert_eq!(
            surface_recovery(&outdated, false).unwrap(),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(surface_recovery(&outdated, true).unwrap(), SurfaceRecovery::Skip);
        assert_eq!(
            surface_recovery(&wgpu::SurfaceError::Lost, true).unwrap(),
            SurfaceRecovery::Skip
        );
    }

    #[test]
    fn timeout_skips_and_memory_errors_stop() {
        assert_eq!(
            surface_recovery(&wgpu::SurfaceError::Timeout, false).unwrap(),
            SurfaceRecovery::Skip
        );
        assert!(surface_recovery(&wgpu::SurfaceError::OutOfMemory, false).is_err());
        assert!(surface_recovery(&wgpu::SurfaceError::Other, true).is_err());
    }

    #[test]
    fn present_mode_prefers_vsync_modes() {
        let modes = [PresentMode::Immediate, PresentMode::Fifo];
        assert_eq!(choose_present_mode(&modes, true), PresentMode::Fifo);
        assert_eq!(choose_present_mode(&modes, false), PresentMode::Immediate);
    }

    #[test]
    fn alpha_mode_falls_back_to_first_supported() {
        assert_eq!(
            choose_alpha_mode(&[CompositeAlphaMode::PreMultiplied]),
            CompositeAlphaMode::PreMultiplied
        );
        assert_eq!(choose_alpha_mode(&[]), CompositeAlphaMode::Opaque);
    }
}
