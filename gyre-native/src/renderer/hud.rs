use egui_wgpu::{Renderer, RendererOptions, ScreenDescriptor};
use egui_winit::State;
use winit::event::WindowEvent;
use winit::window::Window;

/// What the overlay shows each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HudStats
{
  pub fps: f64,
  pub keyboard_connected: bool,
  pub mouse_connected: bool,
  pub controller_connected: bool,
  pub rotation_speed: f64,
  pub pitch_speed: f64,
  pub distance: f64,
  pub paused: bool,
}

pub struct Hud
{
  context: egui::Context,
  state: State,
  renderer: Renderer,
}

impl Hud
{
  pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, window: &Window) -> Self
  {
    let context = egui::Context::default();
    let state = State::new(
      context.clone(),
      egui::viewport::ViewportId::ROOT,
      window,
      Some(window.scale_factor() as f32),
      None,
      None,
    );

    let renderer = Renderer::new(
      device,
      output_format,
      RendererOptions {
        depth_stencil_format: None,
        msaa_samples: 1,
        predictable_texture_filtering: false,
        dithering: true,
      },
    );

    Self { context, state, renderer }
  }

  /// Feed a window event to egui. Returns true when the overlay consumed it.
  pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool
  {
    self.state.on_window_event(window, event).consumed
  }

  pub fn render(
    &mut self,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    encoder: &mut wgpu::CommandEncoder,
    window: &Window,
    view: &wgpu::TextureView,
    stats: &HudStats,
  )
  {
    let raw_input = self.state.take_egui_input(window);
    let mut full_output = self.context.run(raw_input, |ctx| draw_stats(ctx, stats));
    let platform_output = std::mem::take(&mut full_output.platform_output);
    self.state.handle_platform_output(window, platform_output);

    let size = window.inner_size();
    let ppp = window.scale_factor() as f32;
    let screen_descriptor =
      ScreenDescriptor { size_in_pixels: [size.width, size.height], pixels_per_point: ppp };

    for (id, delta) in full_output.textures_delta.set
    {
      self.renderer.update_texture(device, queue, id, &delta);
    }

    let tris = self.context.tessellate(full_output.shapes, ppp);
    self.renderer.update_buffers(device, queue, encoder, &tris, &screen_descriptor);

    {
      let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Hud Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
          view,
          resolve_target: None,
          ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
          depth_slice: None,
        })],
        ..Default::default()
      });

      // The pass is dropped before `encoder` is touched again
      let mut pass = pass.forget_lifetime();

      self.renderer.render(&mut pass, &tris, &screen_descriptor);
    }

    for id in full_output.textures_delta.free
    {
      self.renderer.free_texture(&id);
    }
  }
}

fn draw_stats(ctx: &egui::Context, stats: &HudStats)
{
  egui::Window::new("Gyre").resizable(false).default_pos([12.0, 12.0]).show(ctx, |ui| {
    ui.label(format!("{:.0} fps", stats.fps));
    ui.separator();

    ui.label(format!("keyboard   {}", connected(stats.keyboard_connected)));
    ui.label(format!("mouse      {}", connected(stats.mouse_connected)));
    ui.label(format!("controller {}", connected(stats.controller_connected)));
    ui.separator();

    ui.label(format!("yaw speed   {:+.3} rad/s", stats.rotation_speed));
    ui.label(format!("pitch speed {:+.3} rad/s", stats.pitch_speed));
    ui.label(format!("distance    {:.2}", stats.distance));

    if stats.paused
    {
      ui.colored_label(egui::Color32::YELLOW, "paused (P)");
    }
  });
}

fn connected(flag: bool) -> &'static str
{
  if flag { "connected" } else { "-" }
}
