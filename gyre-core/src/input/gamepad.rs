//! Gamepad slots: capability negotiation at connect time and per-poll refresh

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::deadzone::ignore_inner_radius;
use super::event::DeviceHandle;
use super::InputConfig;
use crate::math::clamp;

//
// ──────────────────────────────────────────────────────────────
//   Device description
// ──────────────────────────────────────────────────────────────
//

bitflags! {
  /// Physical elements a controller reports when it connects.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct ElementSet: u8
  {
    const DIRECTION_PAD    = 1 << 0;
    const LEFT_THUMBSTICK  = 1 << 1;
    const RIGHT_THUMBSTICK = 1 << 2;
    const BUTTON_A         = 1 << 3;
    const BUTTON_B         = 1 << 4;
    const BUTTON_X         = 1 << 5;
    const BUTTON_Y         = 1 << 6;
  }
}

/// How a controller's elements behave, as far as polling cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceProfile
{
  /// Nothing unusual.
  #[default]
  Standard,
  /// Restricted element subset (remote-style controllers). Only the pad
  /// and the A/X buttons are read, and the pad doubles as the left stick.
  Subset,
  /// Analog sticks that report noise at rest; a dead zone is applied.
  Drifting,
  /// Buttons that report fully pressed while partially pressed.
  DigitalButtons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stick
{
  Left,
  Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button
{
  A,
  B,
  X,
  Y,
}

/// Non-blocking snapshot queries against live devices.
///
/// `None` means the element (or the device) can't supply a value right
/// now; the slot keeps its last known value.
pub trait GamepadSource
{
  fn direction_pad(&self, handle: DeviceHandle) -> Option<Vec2>;
  fn thumbstick(&self, handle: DeviceHandle, stick: Stick) -> Option<Vec2>;
  fn button(&self, handle: DeviceHandle, button: Button) -> Option<f32>;
}

/// Source used when no gamepad backend is available.
pub struct NoGamepads;

impl GamepadSource for NoGamepads
{
  fn direction_pad(&self, _handle: DeviceHandle) -> Option<Vec2>
  {
    None
  }

  fn thumbstick(&self, _handle: DeviceHandle, _stick: Stick) -> Option<Vec2>
  {
    None
  }

  fn button(&self, _handle: DeviceHandle, _button: Button) -> Option<f32>
  {
    None
  }
}

//
// ──────────────────────────────────────────────────────────────
//   GamepadState
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadState
{
  index: usize,
  handle: Option<DeviceHandle>,
  profile: DeviceProfile,

  has_direction_pad: bool,
  has_left_thumbstick: bool,
  has_right_thumbstick: bool,
  has_button_a: bool,
  has_button_b: bool,
  has_button_x: bool,
  has_button_y: bool,
  use_input_subset: bool,
  ignore_inner_radius: bool,

  direction_pad: Vec2,
  left_thumbstick: Vec2,
  right_thumbstick: Vec2,
  button_a: f32,
  button_b: f32,
  button_x: f32,
  button_y: f32,
}

impl GamepadState
{
  pub fn new(index: usize) -> Self
  {
    Self { index, ..Self::default() }
  }

  pub(crate) fn connect(&mut self, handle: DeviceHandle, elements: ElementSet, profile: DeviceProfile)
  {
    *self = Self::new(self.index);

    self.handle = Some(handle);
    self.profile = profile;

    self.has_direction_pad = elements.contains(ElementSet::DIRECTION_PAD);
    self.has_left_thumbstick = elements.contains(ElementSet::LEFT_THUMBSTICK);
    self.has_right_thumbstick = elements.contains(ElementSet::RIGHT_THUMBSTICK);
    self.has_button_a = elements.contains(ElementSet::BUTTON_A);
    self.has_button_b = elements.contains(ElementSet::BUTTON_B);
    self.has_button_x = elements.contains(ElementSet::BUTTON_X);
    self.has_button_y = elements.contains(ElementSet::BUTTON_Y);

    self.use_input_subset = profile == DeviceProfile::Subset;
    self.ignore_inner_radius = profile == DeviceProfile::Drifting
      && (self.has_left_thumbstick || self.has_right_thumbstick);

    log::debug!(
      "gamepad slot {} negotiated {:?} ({:?}): subset={} inner_radius={}",
      self.index,
      elements,
      profile,
      self.use_input_subset,
      self.ignore_inner_radius
    );
  }

  pub(crate) fn disconnect(&mut self)
  {
    *self = Self::new(self.index);
  }

  /// Refreshes live values from `source`. Returns false when disconnected.
  pub(crate) fn poll(&mut self, source: &dyn GamepadSource, config: &InputConfig) -> bool
  {
    let Some(handle) = self.handle
    else
    {
      return false;
    };

    if self.has_direction_pad
    {
      if let Some(pad) = source.direction_pad(handle).filter(|v| v.is_finite())
      {
        self.direction_pad = pad.clamp(Vec2::NEG_ONE, Vec2::ONE);
      }
    }

    if self.use_input_subset
    {
      self.left_thumbstick = self.direction_pad;
    }
    else
    {
      if self.has_left_thumbstick
      {
        if let Some(v) = self.read_stick(source, handle, Stick::Left, config)
        {
          self.left_thumbstick = v;
        }
      }

      if self.has_right_thumbstick
      {
        if let Some(v) = self.read_stick(source, handle, Stick::Right, config)
        {
          self.right_thumbstick = v;
        }
      }
    }

    if self.has_button_a
    {
      if let Some(v) = self.read_button(source, handle, Button::A, config)
      {
        self.button_a = v;
      }
    }

    if self.has_button_x
    {
      if let Some(v) = self.read_button(source, handle, Button::X, config)
      {
        self.button_x = v;
      }
    }

    if !self.use_input_subset
    {
      if self.has_button_b
      {
        if let Some(v) = self.read_button(source, handle, Button::B, config)
        {
          self.button_b = v;
        }
      }

      if self.has_button_y
      {
        if let Some(v) = self.read_button(source, handle, Button::Y, config)
        {
          self.button_y = v;
        }
      }
    }

    true
  }

  fn read_stick(
    &self,
    source: &dyn GamepadSource,
    handle: DeviceHandle,
    stick: Stick,
    config: &InputConfig,
  ) -> Option<Vec2>
  {
    let raw = source.thumbstick(handle, stick).filter(|v| v.is_finite())?;

    if self.ignore_inner_radius
    {
      Some(ignore_inner_radius(raw, config.stick_inner_radius))
    }
    else
    {
      Some(raw.clamp_length_max(1.0))
    }
  }

  fn read_button(
    &self,
    source: &dyn GamepadSource,
    handle: DeviceHandle,
    button: Button,
    config: &InputConfig,
  ) -> Option<f32>
  {
    let raw = source.button(handle, button).filter(|v| v.is_finite())?;
    let value = clamp(raw, 0.0, 1.0);

    if self.profile == DeviceProfile::DigitalButtons
    {
      Some(if value >= config.button_threshold { 1.0 } else { 0.0 })
    }
    else
    {
      Some(value)
    }
  }

  //
  // ──────────────────────────────────────────────────────────────
  //   Accessors
  // ──────────────────────────────────────────────────────────────
  //

  pub fn index(&self) -> usize
  {
    self.index
  }

  pub fn handle(&self) -> Option<DeviceHandle>
  {
    self.handle
  }

  pub fn is_connected(&self) -> bool
  {
    self.handle.is_some()
  }

  pub fn profile(&self) -> DeviceProfile
  {
    self.profile
  }

  pub fn has_direction_pad(&self) -> bool
  {
    self.has_direction_pad
  }

  pub fn has_left_thumbstick(&self) -> bool
  {
    self.has_left_thumbstick
  }

  pub fn has_right_thumbstick(&self) -> bool
  {
    self.has_right_thumbstick
  }

  pub fn has_button(&self, button: Button) -> bool
  {
    match button
    {
      Button::A => self.has_button_a,
      Button::B => self.has_button_b,
      Button::X => self.has_button_x,
      Button::Y => self.has_button_y,
    }
  }

  pub fn use_input_subset(&self) -> bool
  {
    self.use_input_subset
  }

  pub fn ignores_inner_radius(&self) -> bool
  {
    self.ignore_inner_radius
  }

  /// True when `stick` can carry input, either physically or through the
  /// pad standing in for the left stick on subset devices.
  pub fn drives_thumbstick(&self, stick: Stick) -> bool
  {
    match stick
    {
      Stick::Left => self.has_left_thumbstick || (self.use_input_subset && self.has_direction_pad),
      Stick::Right => self.has_right_thumbstick && !self.use_input_subset,
    }
  }

  pub fn direction_pad(&self) -> Vec2
  {
    self.direction_pad
  }

  pub fn thumbstick(&self, stick: Stick) -> Vec2
  {
    match stick
    {
      Stick::Left => self.left_thumbstick,
      Stick::Right => self.right_thumbstick,
    }
  }

  pub fn button(&self, button: Button) -> f32
  {
    match button
    {
      Button::A => self.button_a,
      Button::B => self.button_b,
      Button::X => self.button_x,
      Button::Y => self.button_y,
    }
  }
}
