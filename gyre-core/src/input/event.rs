use std::sync::mpsc;

use glam::Vec2;

use super::gamepad::{DeviceProfile, ElementSet};
use super::keys::KeyCode;

/// Opaque id of a platform device. The device itself stays owned by the
/// platform's discovery subsystem; this only names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub u64);

/// Everything the platform layer can tell the normalizer.
///
/// Events may be sent from any thread; they are applied in arrival order
/// at the start of the next poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent
{
  KeyboardConnected,
  KeyboardDisconnected,
  MouseConnected,
  MouseDisconnected,
  GamepadConnected
  {
    handle: DeviceHandle,
    elements: ElementSet,
    profile: DeviceProfile,
  },
  GamepadDisconnected
  {
    handle: DeviceHandle,
  },
  Key
  {
    code: KeyCode,
    value: f32,
  },
  MouseButton
  {
    index: usize,
    value: f32,
  },
  MouseMoved
  {
    delta: Vec2,
  },
  Scrolled
  {
    lines: f32,
  },
}

//
// ──────────────────────────────────────────────────────────────
//   Sender
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
pub struct InputSender
{
  tx: mpsc::Sender<InputEvent>,
}

impl InputSender
{
  pub(crate) fn new(tx: mpsc::Sender<InputEvent>) -> Self
  {
    Self { tx }
  }

  pub fn send(&self, event: InputEvent)
  {
    // The receiver only goes away on shutdown
    if self.tx.send(event).is_err()
    {
      log::trace!("input normalizer gone, dropped {event:?}");
    }
  }

  pub fn key(&self, code: KeyCode, pressed: bool)
  {
    self.send(InputEvent::Key { code, value: if pressed { 1.0 } else { 0.0 } });
  }

  pub fn mouse_button(&self, index: usize, pressed: bool)
  {
    self.send(InputEvent::MouseButton { index, value: if pressed { 1.0 } else { 0.0 } });
  }

  pub fn mouse_moved(&self, dx: f32, dy: f32)
  {
    self.send(InputEvent::MouseMoved { delta: Vec2::new(dx, dy) });
  }
}
