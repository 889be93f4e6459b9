use std::sync::Arc;

use gyre_core::{FrameData, ModelConstants};
use winit::event::WindowEvent;
use winit::window::Window;

use super::cube::{CubeMesh, CubeVertex};
use super::depth::{DepthResources, DEPTH_FORMAT};
use super::hud::{Hud, HudStats};
use super::uniform::{FrameUniform, ModelUniform};

#[derive(Debug, thiserror::Error)]
pub enum RendererError
{
  #[error("failed to create window surface: {0}")]
  Surface(#[from] wgpu::CreateSurfaceError),

  #[error("no suitable GPU adapter: {0}")]
  Adapter(#[from] wgpu::RequestAdapterError),

  #[error("failed to create GPU device: {0}")]
  Device(#[from] wgpu::RequestDeviceError),

  #[error("surface reports no supported formats")]
  NoSurfaceFormat,

  #[error("failed to acquire frame: {0}")]
  Frame(#[from] wgpu::SurfaceError),
}

pub struct Renderer
{
  surface: wgpu::Surface<'static>,
  device: wgpu::Device,
  queue: wgpu::Queue,
  config: wgpu::SurfaceConfiguration,

  depth: DepthResources,
  frame_buffer: wgpu::Buffer,
  bind_group: wgpu::BindGroup,

  pipeline: wgpu::RenderPipeline,
  cube: CubeMesh,
  clear_color: wgpu::Color,

  hud: Option<Hud>,
}

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

impl Renderer
{
  pub async fn new(window: Arc<Window>, clear_color: [f64; 4], show_hud: bool) -> Result<Self, RendererError>
  {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor { backends: wgpu::Backends::all(), ..Default::default() });
    let surface = instance.create_surface(window.clone())?;

    let adapter = request_adapter(&instance, &surface).await?;
    log::info!("using GPU adapter {:?}", adapter.get_info().name);

    let (device, queue) = request_device(&adapter).await?;

    let config = configure_surface(&window, &surface, &adapter, &device)?;
    let depth = DepthResources::create(&device, config.width, config.height);

    let (frame_buffer, model_buffer, bind_group, bind_group_layout) = create_uniform_resources(&device);

    // The cube sits at the origin for the whole session
    let model = ModelUniform::from_constants(&ModelConstants::default());
    queue.write_buffer(&model_buffer, 0, bytemuck::bytes_of(&model));

    let pipeline = create_pipeline(&device, &config, &bind_group_layout);
    let cube = CubeMesh::create(&device);

    let hud = show_hud.then(|| Hud::new(&device, config.format, &window));

    let [r, g, b, a] = clear_color;

    Ok(Self {
      surface,
      device,
      queue,
      config,
      depth,
      frame_buffer,
      bind_group,
      pipeline,
      cube,
      clear_color: wgpu::Color { r, g, b, a },
      hud,
    })
  }

  pub fn resize(&mut self, width: u32, height: u32)
  {
    if width == 0 || height == 0
    {
      return;
    }

    self.config.width = width;
    self.config.height = height;
    self.surface.configure(&self.device, &self.config);
    self.depth = DepthResources::create(&self.device, width, height);

    log::debug!("surface resized to {width}x{height}");
  }

  /// Current drawable size in pixels.
  pub fn size(&self) -> (u32, u32)
  {
    (self.config.width, self.config.height)
  }

  pub fn upload_frame(&self, frame: &FrameData)
  {
    let uniform = FrameUniform::from_frame(frame);
    self.queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniform));
  }

  /// Returns true when the HUD consumed the event.
  pub fn hud_event(&mut self, window: &Window, event: &WindowEvent) -> bool
  {
    match &mut self.hud
    {
      Some(hud) => hud.on_window_event(window, event),
      None => false,
    }
  }

  pub fn render(&mut self, window: &Window, stats: &HudStats) -> Result<(), RendererError>
  {
    let frame = match self.surface.get_current_texture()
    {
      Ok(frame) => frame,
      Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) =>
      {
        log::warn!("surface {e}, reconfiguring");
        self.surface.configure(&self.device, &self.config);
        self.surface.get_current_texture()?
      }
      Err(wgpu::SurfaceError::Timeout) =>
      {
        log::debug!("frame acquire timed out, skipping");
        return Ok(());
      }
      Err(e) => return Err(e.into()),
    };

    let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder =
      self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });

    record_render_pass(
      &mut encoder,
      &view,
      &self.depth.view,
      &self.pipeline,
      &self.bind_group,
      &self.cube,
      self.clear_color,
    );

    if let Some(hud) = &mut self.hud
    {
      hud.render(&self.device, &self.queue, &mut encoder, window, &view, stats);
    }

    self.queue.submit(Some(encoder.finish()));
    frame.present();

    Ok(())
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Initialization Helpers
// ──────────────────────────────────────────────────────────────
//

async fn request_adapter(
  instance: &wgpu::Instance,
  surface: &wgpu::Surface<'_>,
) -> Result<wgpu::Adapter, wgpu::RequestAdapterError>
{
  instance
    .request_adapter(&wgpu::RequestAdapterOptions {
      power_preference: wgpu::PowerPreference::HighPerformance,
      compatible_surface: Some(surface),
      force_fallback_adapter: false,
    })
    .await
}

async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue), wgpu::RequestDeviceError>
{
  adapter
    .request_device(&wgpu::DeviceDescriptor {
      label: Some("Gyre Device"),
      required_features: wgpu::Features::empty(),
      required_limits: wgpu::Limits::default(),
      memory_hints: wgpu::MemoryHints::Performance,
      experimental_features: Default::default(),
      trace: wgpu::Trace::Off,
    })
    .await
}

fn configure_surface(
  window: &Window,
  surface: &wgpu::Surface<'_>,
  adapter: &wgpu::Adapter,
  device: &wgpu::Device,
) -> Result<wgpu::SurfaceConfiguration, RendererError>
{
  let size = window.inner_size();
  let caps = surface.get_capabilities(adapter);

  let format = caps
    .formats
    .iter()
    .find(|f| f.is_srgb())
    .or_else(|| caps.formats.first())
    .copied()
    .ok_or(RendererError::NoSurfaceFormat)?;

  let alpha_mode = caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto);

  let config = wgpu::SurfaceConfiguration {
    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
    format,
    width: size.width.max(1),
    height: size.height.max(1),
    present_mode: wgpu::PresentMode::AutoVsync,
    alpha_mode,
    view_formats: vec![],
    desired_maximum_frame_latency: 2,
  };

  surface.configure(device, &config);
  log::info!("surface configured: {}x{}, format {:?}", config.width, config.height, format);

  Ok(config)
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry
{
  wgpu::BindGroupLayoutEntry {
    binding,
    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
    ty: wgpu::BindingType::Buffer {
      ty: wgpu::BufferBindingType::Uniform,
      has_dynamic_offset: false,
      min_binding_size: None,
    },
    count: None,
  }
}

fn create_uniform_resources(
  device: &wgpu::Device,
) -> (wgpu::Buffer, wgpu::Buffer, wgpu::BindGroup, wgpu::BindGroupLayout)
{
  let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
    label: Some("Frame Buffer"),
    size: std::mem::size_of::<FrameUniform>() as u64,
    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    mapped_at_creation: false,
  });

  let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
    label: Some("Model Buffer"),
    size: std::mem::size_of::<ModelUniform>() as u64,
    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    mapped_at_creation: false,
  });

  let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
    label: Some("Frame BGL"),
    entries: &[uniform_entry(0), uniform_entry(1)],
  });

  let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
    label: Some("Frame BG"),
    layout: &layout,
    entries: &[
      wgpu::BindGroupEntry { binding: 0, resource: frame_buffer.as_entire_binding() },
      wgpu::BindGroupEntry { binding: 1, resource: model_buffer.as_entire_binding() },
    ],
  });

  (frame_buffer, model_buffer, bind_group, layout)
}

fn create_pipeline(
  device: &wgpu::Device,
  config: &wgpu::SurfaceConfiguration,
  bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline
{
  let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
    label: Some("Cube Shader"),
    source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/cube.wgsl").into()),
  });

  let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
    label: Some("Cube Pipeline Layout"),
    bind_group_layouts: &[bind_group_layout],
    push_constant_ranges: &[],
  });

  device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
    label: Some("Cube Pipeline"),
    layout: Some(&layout),
    vertex: wgpu::VertexState {
      module: &shader,
      entry_point: Some("vs_main"),
      buffers: &[CubeVertex::layout()],
      compilation_options: wgpu::PipelineCompilationOptions::default(),
    },
    fragment: Some(wgpu::FragmentState {
      module: &shader,
      entry_point: Some("fs_main"),
      targets: &[Some(wgpu::ColorTargetState {
        format: config.format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
      })],
      compilation_options: wgpu::PipelineCompilationOptions::default(),
    }),
    primitive: wgpu::PrimitiveState {
      topology: wgpu::PrimitiveTopology::TriangleList,
      front_face: wgpu::FrontFace::Ccw,
      cull_mode: Some(wgpu::Face::Back),
      ..Default::default()
    },
    depth_stencil: Some(wgpu::DepthStencilState {
      format: DEPTH_FORMAT,
      depth_write_enabled: true,
      depth_compare: wgpu::CompareFunction::Less,
      stencil: wgpu::StencilState::default(),
      bias: wgpu::DepthBiasState::default(),
    }),
    multisample: wgpu::MultisampleState::default(),
    multiview: None,
    cache: None,
  })
}

//
// ──────────────────────────────────────────────────────────────
//   Render Pass
// ──────────────────────────────────────────────────────────────
//

fn record_render_pass(
  encoder: &mut wgpu::CommandEncoder,
  color_view: &wgpu::TextureView,
  depth_view: &wgpu::TextureView,
  pipeline: &wgpu::RenderPipeline,
  bind_group: &wgpu::BindGroup,
  cube: &CubeMesh,
  clear_color: wgpu::Color,
)
{
  let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
    label: Some("Cube Render Pass"),
    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
      view: color_view,
      resolve_target: None,
      ops: wgpu::Operations { load: wgpu::LoadOp::Clear(clear_color), store: wgpu::StoreOp::Store },
      depth_slice: None,
    })],
    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
      view: depth_view,
      depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
      stencil_ops: None,
    }),
    occlusion_query_set: None,
    timestamp_writes: None,
  });

  pass.set_pipeline(pipeline);
  pass.set_bind_group(0, bind_group, &[]);
  pass.set_vertex_buffer(0, cube.vertex_buffer.slice(..));
  pass.set_index_buffer(cube.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
  pass.draw_indexed(0..cube.index_count, 0, 0..1);
}
