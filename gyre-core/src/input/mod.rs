//! Device input normalisation: keyboard, mouse and gamepads folded into one
//! polled snapshot per frame.

mod deadzone;
mod event;
mod gamepad;
mod keys;
pub mod smoothing;

pub use deadzone::ignore_inner_radius;
pub use event::{DeviceHandle, InputEvent, InputSender};
pub use gamepad::{Button, DeviceProfile, ElementSet, GamepadSource, GamepadState, NoGamepads, Stick};
pub use keys::{KeyCode, KEY_COUNT};

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::mpsc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::clamp;

//
// ──────────────────────────────────────────────────────────────
//   Configuration
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig
{
  /// Dead zone radius for drifting thumbsticks (0.0-1.0)
  #[serde(default = "default_stick_inner_radius")]
  pub stick_inner_radius: f32,

  /// Press threshold for controllers that only report digital buttons
  #[serde(default = "default_button_threshold")]
  pub button_threshold: f32,
}

fn default_stick_inner_radius() -> f32
{
  0.15
}

fn default_button_threshold() -> f32
{
  0.5
}

impl Default for InputConfig
{
  fn default() -> Self
  {
    Self { stick_inner_radius: default_stick_inner_radius(), button_threshold: default_button_threshold() }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   InputState (read side)
// ──────────────────────────────────────────────────────────────
//

pub const MOUSE_BUTTON_COUNT: usize = 8;
pub const MOUSE_LEFT: usize = 0;
pub const MOUSE_RIGHT: usize = 1;
pub const MOUSE_MIDDLE: usize = 2;

/// Snapshot of every input source after the latest poll.
///
/// Only [`InputNormalizer`] writes it. Readers get a shared borrow; the
/// mouse delta and scroll are edge-triggered and zero themselves on read,
/// so they sit in `Cell`s.
pub struct InputState
{
  keys: [f32; KEY_COUNT],
  mouse_buttons: [f32; MOUSE_BUTTON_COUNT],
  mouse_delta: Cell<Vec2>,
  scroll: Cell<f32>,

  keyboard_connected: bool,
  mouse_connected: bool,

  gamepads: Vec<GamepadState>,
  current: Option<usize>,
}

impl InputState
{
  fn new() -> Self
  {
    Self {
      keys: [0.0; KEY_COUNT],
      mouse_buttons: [0.0; MOUSE_BUTTON_COUNT],
      mouse_delta: Cell::new(Vec2::ZERO),
      scroll: Cell::new(0.0),

      keyboard_connected: false,
      mouse_connected: false,

      gamepads: Vec::new(),
      current: None,
    }
  }

  /// Key intensity in [0, 1].
  pub fn key_pressed(&self, code: KeyCode) -> f32
  {
    self.keys[code.index()]
  }

  /// Mouse button intensity in [0, 1]; unknown buttons read 0.
  pub fn mouse_button_pressed(&self, index: usize) -> f32
  {
    self.mouse_buttons.get(index).copied().unwrap_or(0.0)
  }

  /// Mouse motion since the previous poll. Reading zeroes it.
  pub fn take_mouse_delta(&self) -> Vec2
  {
    self.mouse_delta.take()
  }

  /// Scroll lines since the previous poll. Reading zeroes it.
  pub fn take_scroll(&self) -> f32
  {
    self.scroll.take()
  }

  /// The most recently connected gamepad, if it is still connected.
  pub fn current_gamepad(&self) -> Option<&GamepadState>
  {
    self.current.and_then(|i| self.gamepads.get(i))
  }

  pub fn gamepads(&self) -> &[GamepadState]
  {
    &self.gamepads
  }

  pub fn keyboard_connected(&self) -> bool
  {
    self.keyboard_connected
  }

  pub fn mouse_connected(&self) -> bool
  {
    self.mouse_connected
  }

  pub fn keyboard_and_mouse_connected(&self) -> bool
  {
    self.keyboard_connected && self.mouse_connected
  }

  /// True while any gamepad is plugged in, whether or not it drives input.
  pub fn controller_connected(&self) -> bool
  {
    self.gamepads.iter().any(GamepadState::is_connected)
  }
}

//
// ──────────────────────────────────────────────────────────────
//   InputNormalizer (write side)
// ──────────────────────────────────────────────────────────────
//

pub struct InputNormalizer
{
  state: InputState,
  config: InputConfig,

  tx: mpsc::Sender<InputEvent>,
  rx: mpsc::Receiver<InputEvent>,

  // Handles are remembered after disconnect so a returning device gets its old slot
  slots: HashMap<DeviceHandle, usize>,
}

impl InputNormalizer
{
  pub fn new(config: &InputConfig) -> (Self, InputSender)
  {
    let (tx, rx) = mpsc::channel();
    let sender = InputSender::new(tx.clone());

    let normalizer =
      Self { state: InputState::new(), config: config.clone(), tx, rx, slots: HashMap::new() };

    (normalizer, sender)
  }

  /// Another handle for pushing events, e.g. to a device thread.
  pub fn sender(&self) -> InputSender
  {
    InputSender::new(self.tx.clone())
  }

  pub fn state(&self) -> &InputState
  {
    &self.state
  }

  /// One poll cycle: apply queued events, publish this cycle's mouse motion,
  /// then snapshot the current gamepad.
  ///
  /// Never blocks. With nothing connected the state simply stays as it was.
  pub fn poll(&mut self, source: &dyn GamepadSource)
  {
    let mut delta = Vec2::ZERO;
    let mut scroll = 0.0;

    while let Ok(event) = self.rx.try_recv()
    {
      match event
      {
        InputEvent::MouseMoved { delta: d } if d.is_finite() => delta += d,
        InputEvent::Scrolled { lines } if lines.is_finite() => scroll += lines,
        other => self.apply(other),
      }
    }

    // Replace, never accumulate: an unread delta is lost at the next poll
    self.state.mouse_delta.set(delta);
    self.state.scroll.set(scroll);

    if let Some(i) = self.state.current
    {
      self.state.gamepads[i].poll(source, &self.config);
    }
  }

  fn apply(&mut self, event: InputEvent)
  {
    match event
    {
      InputEvent::KeyboardConnected =>
      {
        log::info!("keyboard connected");
        self.state.keyboard_connected = true;
      }

      InputEvent::KeyboardDisconnected =>
      {
        log::info!("keyboard disconnected");
        self.state.keyboard_connected = false;
        self.state.keys = [0.0; KEY_COUNT];
      }

      InputEvent::MouseConnected =>
      {
        log::info!("mouse connected");
        self.state.mouse_connected = true;
      }

      InputEvent::MouseDisconnected =>
      {
        log::info!("mouse disconnected");
        self.state.mouse_connected = false;
        self.state.mouse_buttons = [0.0; MOUSE_BUTTON_COUNT];
      }

      InputEvent::GamepadConnected { handle, elements, profile } =>
      {
        self.connect_gamepad(handle, elements, profile);
      }

      InputEvent::GamepadDisconnected { handle } =>
      {
        self.disconnect_gamepad(handle);
      }

      InputEvent::Key { code, value } =>
      {
        if value.is_finite()
        {
          self.state.keys[code.index()] = clamp(value, 0.0, 1.0);
        }
      }

      InputEvent::MouseButton { index, value } =>
      {
        if let Some(slot) = self.state.mouse_buttons.get_mut(index)
        {
          if value.is_finite()
          {
            *slot = clamp(value, 0.0, 1.0);
          }
        }
      }

      // Non-finite motion is dropped
      InputEvent::MouseMoved { .. } | InputEvent::Scrolled { .. } =>
      {}
    }
  }

  /// Negotiates capabilities for a newly connected gamepad and makes it
  /// current. A handle seen before reuses its slot.
  pub fn connect_gamepad(&mut self, handle: DeviceHandle, elements: ElementSet, profile: DeviceProfile)
  {
    let index = match self.slots.get(&handle)
    {
      Some(&index) => index,
      None =>
      {
        let index = self.state.gamepads.len();
        self.state.gamepads.push(GamepadState::new(index));
        self.slots.insert(handle, index);
        index
      }
    };

    self.state.gamepads[index].connect(handle, elements, profile);
    self.state.current = Some(index);

    log::info!("gamepad {:?} connected in slot {}", handle, index);
  }

  /// Clears the matching slot. If it was current, no other controller takes
  /// over until the next connect.
  pub fn disconnect_gamepad(&mut self, handle: DeviceHandle)
  {
    let Some(&index) = self.slots.get(&handle)
    else
    {
      log::debug!("disconnect for unknown gamepad {:?}", handle);
      return;
    };

    self.state.gamepads[index].disconnect();

    if self.state.current == Some(index)
    {
      self.state.current = None;
    }

    log::info!("gamepad {:?} disconnected from slot {}", handle, index);
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Tests
// ──────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests
{
  use super::*;

  fn normalizer() -> (InputNormalizer, InputSender)
  {
    InputNormalizer::new(&InputConfig::default())
  }

  #[test]
  fn polling_with_nothing_connected_is_a_no_op()
  {
    let (mut input, _tx) = normalizer();
    input.poll(&NoGamepads);
    input.poll(&NoGamepads);

    let state = input.state();
    assert!(!state.keyboard_connected());
    assert!(!state.controller_connected());
    assert_eq!(state.key_pressed(KeyCode::W), 0.0);
    assert_eq!(state.take_mouse_delta(), Vec2::ZERO);
  }

  #[test]
  fn events_apply_only_at_poll()
  {
    let (mut input, tx) = normalizer();
    tx.send(InputEvent::KeyboardConnected);
    tx.key(KeyCode::W, true);

    assert!(!input.state().keyboard_connected());
    assert_eq!(input.state().key_pressed(KeyCode::W), 0.0);

    input.poll(&NoGamepads);

    assert!(input.state().keyboard_connected());
    assert_eq!(input.state().key_pressed(KeyCode::W), 1.0);
  }

  #[test]
  fn key_intensity_is_clamped()
  {
    let (mut input, tx) = normalizer();
    tx.send(InputEvent::Key { code: KeyCode::A, value: 0.4 });
    tx.send(InputEvent::Key { code: KeyCode::D, value: 4.0 });
    input.poll(&NoGamepads);

    assert_eq!(input.state().key_pressed(KeyCode::A), 0.4);
    assert_eq!(input.state().key_pressed(KeyCode::D), 1.0);
  }

  #[test]
  fn mouse_delta_is_edge_triggered()
  {
    let (mut input, tx) = normalizer();
    tx.mouse_moved(3.0, -1.0);
    tx.mouse_moved(1.0, 1.0);
    input.poll(&NoGamepads);

    assert_eq!(input.state().take_mouse_delta(), Vec2::new(4.0, 0.0));
    assert_eq!(input.state().take_mouse_delta(), Vec2::ZERO);
  }

  #[test]
  fn unread_mouse_delta_does_not_carry_over()
  {
    let (mut input, tx) = normalizer();
    tx.mouse_moved(5.0, 5.0);
    input.poll(&NoGamepads);
    tx.mouse_moved(1.0, 0.0);
    input.poll(&NoGamepads);

    assert_eq!(input.state().take_mouse_delta(), Vec2::new(1.0, 0.0));
  }

  #[test]
  fn mouse_buttons_out_of_range_are_ignored()
  {
    let (mut input, tx) = normalizer();
    tx.mouse_button(MOUSE_RIGHT, true);
    tx.mouse_button(42, true);
    input.poll(&NoGamepads);

    assert_eq!(input.state().mouse_button_pressed(MOUSE_RIGHT), 1.0);
    assert_eq!(input.state().mouse_button_pressed(42), 0.0);
  }

  #[test]
  fn keyboard_disconnect_releases_keys()
  {
    let (mut input, tx) = normalizer();
    tx.send(InputEvent::KeyboardConnected);
    tx.key(KeyCode::SPACE, true);
    input.poll(&NoGamepads);

    tx.send(InputEvent::KeyboardDisconnected);
    input.poll(&NoGamepads);

    assert!(!input.state().keyboard_connected());
    assert_eq!(input.state().key_pressed(KeyCode::SPACE), 0.0);
  }

  #[test]
  fn latest_connect_becomes_current()
  {
    let (mut input, _tx) = normalizer();
    input.connect_gamepad(DeviceHandle(1), ElementSet::all(), DeviceProfile::Standard);
    input.connect_gamepad(DeviceHandle(2), ElementSet::BUTTON_A, DeviceProfile::Standard);

    let current = input.state().current_gamepad().map(GamepadState::handle);
    assert_eq!(current, Some(Some(DeviceHandle(2))));
    assert_eq!(input.state().gamepads().len(), 2);
  }

  #[test]
  fn disconnecting_current_does_not_fail_over()
  {
    let (mut input, _tx) = normalizer();
    input.connect_gamepad(DeviceHandle(1), ElementSet::all(), DeviceProfile::Standard);
    input.connect_gamepad(DeviceHandle(2), ElementSet::all(), DeviceProfile::Standard);

    input.disconnect_gamepad(DeviceHandle(2));

    assert!(input.state().current_gamepad().is_none());
    assert!(input.state().gamepads()[0].is_connected());

    // The other pad is still plugged in, it just isn't driving anything
    assert!(input.state().controller_connected());

    input.disconnect_gamepad(DeviceHandle(1));
    assert!(!input.state().controller_connected());
  }

  #[test]
  fn reconnect_reuses_slot()
  {
    let (mut input, tx) = normalizer();
    tx.send(InputEvent::GamepadConnected {
      handle: DeviceHandle(9),
      elements: ElementSet::LEFT_THUMBSTICK,
      profile: DeviceProfile::Standard,
    });
    tx.send(InputEvent::GamepadDisconnected { handle: DeviceHandle(9) });
    tx.send(InputEvent::GamepadConnected {
      handle: DeviceHandle(9),
      elements: ElementSet::RIGHT_THUMBSTICK,
      profile: DeviceProfile::Standard,
    });
    input.poll(&NoGamepads);

    let state = input.state();
    assert_eq!(state.gamepads().len(), 1);

    let pad = state.current_gamepad().map(|p| (p.has_left_thumbstick(), p.has_right_thumbstick()));
    assert_eq!(pad, Some((false, true)));
  }

  #[test]
  fn unknown_disconnect_is_ignored()
  {
    let (mut input, _tx) = normalizer();
    input.disconnect_gamepad(DeviceHandle(5));
    assert!(input.state().gamepads().is_empty());
  }

  #[test]
  fn sender_works_from_another_thread()
  {
    let (mut input, tx) = normalizer();
    let worker = std::thread::spawn(move || {
      tx.send(InputEvent::MouseConnected);
    });
    worker.join().expect("sender thread panicked");

    input.poll(&NoGamepads);
    assert!(input.state().mouse_connected());
  }
}
