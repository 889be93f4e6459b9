use std::sync::Arc;

use anyhow::Context;
use gyre_core::frame::projection_for;
use gyre_core::input::{InputEvent, KeyCode};
use gyre_core::{CameraIntegrator, FrameClock, FrameData, GyreConfig, InputNormalizer, InputSender};
use winit::{
  application::ApplicationHandler,
  dpi::LogicalSize,
  event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  keyboard::PhysicalKey,
  window::{Window, WindowId},
};

use crate::platform::keyboard::{hid_code, mouse_button_index};
use crate::platform::GamepadBackend;
use crate::renderer::{HudStats, Renderer};

/// Pixel scroll deltas are converted to wheel lines at this rate.
const PIXELS_PER_LINE: f32 = 40.0;

pub fn run(config: GyreConfig) -> anyhow::Result<()>
{
  let event_loop = EventLoop::new().context("creating event loop")?;
  let mut app = GyreApp::new(config);

  event_loop.run_app(&mut app).context("running event loop")?;

  match app.error.take()
  {
    Some(e) => Err(e),
    None => Ok(()),
  }
}

struct GyreApp
{
  config: GyreConfig,
  window: Option<Arc<Window>>,
  renderer: Option<Renderer>,

  input: InputNormalizer,
  sender: InputSender,
  gamepads: GamepadBackend,
  camera: CameraIntegrator,
  clock: FrameClock,

  /// Toggled with P; focus changes don't clear it
  user_paused: bool,
  focused: bool,

  error: Option<anyhow::Error>,
}

impl GyreApp
{
  fn new(config: GyreConfig) -> Self
  {
    let (input, sender) = InputNormalizer::new(&config.input);
    let camera = CameraIntegrator::new(&config.camera);

    Self {
      config,
      window: None,
      renderer: None,
      input,
      sender,
      gamepads: GamepadBackend::new(),
      camera,
      clock: FrameClock::new(),
      user_paused: false,
      focused: true,
      error: None,
    }
  }

  fn init_window_and_renderer(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()>
  {
    if self.window.is_some()
    {
      return Ok(());
    }

    let attrs = Window::default_attributes()
      .with_title(self.config.window.title.as_str())
      .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height));
    let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);

    let render = &self.config.render;
    let renderer = pollster::block_on(Renderer::new(window.clone(), render.clear_color, render.show_hud))
      .context("initialising renderer")?;

    self.window = Some(window);
    self.renderer = Some(renderer);

    // winit has no hot-plug notifications for these
    self.sender.send(InputEvent::KeyboardConnected);
    self.sender.send(InputEvent::MouseConnected);
    self.gamepads.announce(&self.sender);

    Ok(())
  }

  fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error)
  {
    log::error!("{error:#}");
    self.error = Some(error);
    event_loop.exit();
  }

  fn sync_pause(&mut self)
  {
    let paused = self.user_paused || !self.focused;
    if paused && !self.clock.is_paused()
    {
      self.clock.pause();
      log::debug!("clock paused");
    }
    else if !paused && self.clock.is_paused()
    {
      self.clock.resume();
      log::debug!("clock resumed");
    }
  }

  fn handle_window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    let window = match &self.window
    {
      Some(w) if w.id() == window_id => w.clone(),
      _ => return,
    };

    let consumed = match &mut self.renderer
    {
      Some(renderer) => renderer.hud_event(&window, &event),
      None => false,
    };

    match event
    {
      WindowEvent::CloseRequested =>
      {
        event_loop.exit();
      }

      WindowEvent::Resized(size) =>
      {
        if let Some(renderer) = &mut self.renderer
        {
          renderer.resize(size.width, size.height);
        }
        window.request_redraw();
      }

      WindowEvent::Focused(focused) =>
      {
        self.focused = focused;
        self.sync_pause();
      }

      WindowEvent::KeyboardInput { event, .. } =>
      {
        if event.repeat
        {
          return;
        }

        let PhysicalKey::Code(key) = event.physical_key
        else
        {
          return;
        };
        let Some(code) = hid_code(key)
        else
        {
          return;
        };

        let pressed = event.state == ElementState::Pressed;

        if pressed && code == KeyCode::ESCAPE
        {
          event_loop.exit();
          return;
        }
        if pressed && code == KeyCode::P
        {
          self.user_paused = !self.user_paused;
          self.sync_pause();
        }

        self.sender.key(code, pressed);
      }

      WindowEvent::MouseInput { state, button, .. } =>
      {
        let pressed = state == ElementState::Pressed;

        // Clicks on the overlay stay there; releases always go through
        if consumed && pressed
        {
          return;
        }

        self.sender.mouse_button(mouse_button_index(button), pressed);
      }

      WindowEvent::MouseWheel { delta, .. } =>
      {
        if consumed
        {
          return;
        }

        let lines = match delta
        {
          MouseScrollDelta::LineDelta(_, y) => y,
          MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
        };
        self.sender.send(InputEvent::Scrolled { lines });
      }

      _ =>
      {}
    }
  }

  fn frame(&mut self)
  {
    let dt = self.clock.tick();

    self.gamepads.pump(&self.sender);
    self.input.poll(&self.gamepads.source());

    // Unread mouse motion is replaced by the next poll, so nothing piles up
    if !self.clock.is_paused()
    {
      self.camera.update(dt, self.input.state());
    }

    let (Some(window), Some(renderer)) = (&self.window, &mut self.renderer)
    else
    {
      return;
    };

    let (width, height) = renderer.size();
    let projection = projection_for(width, height, self.camera.config());
    let frame = FrameData::new(projection, self.camera.view_matrix(), self.config.render.light_direction);
    renderer.upload_frame(&frame);

    let state = self.input.state();
    let stats = HudStats {
      fps: self.clock.fps(),
      keyboard_connected: state.keyboard_connected(),
      mouse_connected: state.mouse_connected(),
      controller_connected: state.controller_connected(),
      rotation_speed: self.camera.rotation_speed(),
      pitch_speed: self.camera.pitch_speed(),
      distance: self.camera.distance(),
      paused: self.clock.is_paused(),
    };

    if let Err(e) = renderer.render(window, &stats)
    {
      log::warn!("frame dropped: {e}");
    }

    window.request_redraw();
  }
}

impl ApplicationHandler for GyreApp
{
  fn resumed(&mut self, event_loop: &ActiveEventLoop)
  {
    event_loop.set_control_flow(ControlFlow::Wait);

    if let Err(e) = self.init_window_and_renderer(event_loop)
    {
      self.fail(event_loop, e);
    }
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    self.handle_window_event(event_loop, window_id, event);
  }

  fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent)
  {
    if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event
    {
      self.sender.mouse_moved(dx as f32, dy as f32);
    }
  }

  fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop)
  {
    self.frame();
  }
}
