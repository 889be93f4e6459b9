//! gilrs-backed controller discovery and element queries

use gyre_core::input::{DeviceProfile, ElementSet};

/// USB vendor ids whose controllers report face buttons as plain on/off.
const DIGITAL_BUTTON_VENDORS: [u16; 2] = [
  0x057e, // Nintendo (Switch Pro, Joy-Con)
  0x2dc8, // 8BitDo
];

/// Specific vendor/product pairs with on/off face buttons.
const DIGITAL_BUTTON_PRODUCTS: [(u16, u16); 2] = [
  (0x28de, 0x1102), // Steam Controller
  (0x28de, 0x1142), // Steam Controller wireless
];

fn reports_digital_buttons(vendor_product: Option<(u16, u16)>) -> bool
{
  match vendor_product
  {
    Some((vendor, product)) =>
    {
      DIGITAL_BUTTON_VENDORS.contains(&vendor) || DIGITAL_BUTTON_PRODUCTS.contains(&(vendor, product))
    }
    None => false,
  }
}

/// Quirk profile for a controller with the given elements and USB ids.
///
/// Known on/off-button families come first. Otherwise anything with analog
/// sticks gets a dead zone, and a pad-only controller is read as a
/// remote-style subset device.
pub fn profile_for(elements: ElementSet, vendor_product: Option<(u16, u16)>) -> DeviceProfile
{
  let has_buttons =
    elements.intersects(ElementSet::BUTTON_A | ElementSet::BUTTON_B | ElementSet::BUTTON_X | ElementSet::BUTTON_Y);

  if has_buttons && reports_digital_buttons(vendor_product)
  {
    DeviceProfile::DigitalButtons
  }
  else if elements.intersects(ElementSet::LEFT_THUMBSTICK | ElementSet::RIGHT_THUMBSTICK)
  {
    DeviceProfile::Drifting
  }
  else if elements.contains(ElementSet::DIRECTION_PAD) && !elements.intersects(ElementSet::BUTTON_B | ElementSet::BUTTON_Y)
  {
    DeviceProfile::Subset
  }
  else
  {
    DeviceProfile::Standard
  }
}

#[cfg(feature = "gamepad")]
pub use backend::GamepadBackend;

#[cfg(not(feature = "gamepad"))]
pub use fallback::GamepadBackend;

#[cfg(feature = "gamepad")]
mod backend
{
  use std::collections::HashMap;

  use gilrs::{Axis, Gilrs};
  use glam::Vec2;
  use gyre_core::input::{Button, DeviceHandle, ElementSet, GamepadSource, InputEvent, Stick};
  use gyre_core::InputSender;

  use super::profile_for;

  pub fn handle_of(id: gilrs::GamepadId) -> DeviceHandle
  {
    DeviceHandle(usize::from(id) as u64)
  }

  pub struct GamepadBackend
  {
    /// None if gilrs failed to initialise; keyboard and mouse still work
    gilrs: Option<Gilrs>,
    ids: HashMap<DeviceHandle, gilrs::GamepadId>,
  }

  impl GamepadBackend
  {
    pub fn new() -> Self
    {
      let gilrs = match Gilrs::new()
      {
        Ok(g) => Some(g),
        Err(e) =>
        {
          log::warn!("failed to initialise gamepad support: {e}. Gamepads will not be available.");
          None
        }
      };

      Self { gilrs, ids: HashMap::new() }
    }

    /// Report every controller that was already plugged in at startup.
    pub fn announce(&mut self, sender: &InputSender)
    {
      let Some(gilrs) = &self.gilrs
      else
      {
        return;
      };

      let present: Vec<_> = gilrs.gamepads().map(|(id, _)| id).collect();
      for id in present
      {
        self.connect(id, sender);
      }
    }

    /// Drain gilrs events, forwarding connects and disconnects.
    pub fn pump(&mut self, sender: &InputSender)
    {
      let mut events = Vec::new();
      if let Some(gilrs) = &mut self.gilrs
      {
        while let Some(event) = gilrs.next_event()
        {
          events.push((event.id, event.event));
        }
      }

      for (id, event) in events
      {
        match event
        {
          gilrs::EventType::Connected => self.connect(id, sender),
          gilrs::EventType::Disconnected =>
          {
            let handle = handle_of(id);
            if self.ids.remove(&handle).is_some()
            {
              sender.send(InputEvent::GamepadDisconnected { handle });
            }
          }
          _ =>
          {}
        }
      }
    }

    pub fn source(&self) -> GilrsSource<'_>
    {
      GilrsSource { gilrs: self.gilrs.as_ref(), ids: &self.ids }
    }

    fn connect(&mut self, id: gilrs::GamepadId, sender: &InputSender)
    {
      let Some(gilrs) = &self.gilrs
      else
      {
        return;
      };

      let handle = handle_of(id);
      if self.ids.contains_key(&handle)
      {
        return;
      }

      let pad = gilrs.gamepad(id);
      let elements = elements_of(&pad);
      let vendor_product = pad.vendor_id().zip(pad.product_id());
      let profile = profile_for(elements, vendor_product);

      log::info!(
        "gamepad '{}' ({:04x?}) reports {:?}, profile {:?}",
        pad.name(),
        vendor_product,
        elements,
        profile
      );

      self.ids.insert(handle, id);
      sender.send(InputEvent::GamepadConnected { handle, elements, profile });
    }
  }

  fn elements_of(pad: &gilrs::Gamepad<'_>) -> ElementSet
  {
    let mut elements = ElementSet::empty();

    if pad.button_code(gilrs::Button::DPadUp).is_some() || pad.axis_code(Axis::DPadX).is_some()
    {
      elements |= ElementSet::DIRECTION_PAD;
    }
    if pad.axis_code(Axis::LeftStickX).is_some()
    {
      elements |= ElementSet::LEFT_THUMBSTICK;
    }
    if pad.axis_code(Axis::RightStickX).is_some()
    {
      elements |= ElementSet::RIGHT_THUMBSTICK;
    }

    for (button, flag) in [
      (gilrs::Button::South, ElementSet::BUTTON_A),
      (gilrs::Button::East, ElementSet::BUTTON_B),
      (gilrs::Button::West, ElementSet::BUTTON_X),
      (gilrs::Button::North, ElementSet::BUTTON_Y),
    ]
    {
      if pad.button_code(button).is_some()
      {
        elements |= flag;
      }
    }

    elements
  }

  /// Per-poll view of the live controllers.
  pub struct GilrsSource<'a>
  {
    gilrs: Option<&'a Gilrs>,
    ids: &'a HashMap<DeviceHandle, gilrs::GamepadId>,
  }

  impl GilrsSource<'_>
  {
    fn pad(&self, handle: DeviceHandle) -> Option<gilrs::Gamepad<'_>>
    {
      let id = *self.ids.get(&handle)?;
      self.gilrs?.connected_gamepad(id)
    }
  }

  fn pressed(pad: &gilrs::Gamepad<'_>, button: gilrs::Button) -> f32
  {
    pad.button_data(button).map_or(0.0, |data| data.value())
  }

  impl GamepadSource for GilrsSource<'_>
  {
    fn direction_pad(&self, handle: DeviceHandle) -> Option<Vec2>
    {
      let pad = self.pad(handle)?;

      let x = pressed(&pad, gilrs::Button::DPadRight) - pressed(&pad, gilrs::Button::DPadLeft);
      let y = pressed(&pad, gilrs::Button::DPadUp) - pressed(&pad, gilrs::Button::DPadDown);

      // Some drivers expose the pad as a hat axis instead of buttons
      if x == 0.0 && y == 0.0
      {
        return Some(Vec2::new(pad.value(Axis::DPadX), pad.value(Axis::DPadY)));
      }

      Some(Vec2::new(x, y))
    }

    fn thumbstick(&self, handle: DeviceHandle, stick: Stick) -> Option<Vec2>
    {
      let pad = self.pad(handle)?;

      // gilrs reports up as positive y
      let (x_axis, y_axis) = match stick
      {
        Stick::Left => (Axis::LeftStickX, Axis::LeftStickY),
        Stick::Right => (Axis::RightStickX, Axis::RightStickY),
      };

      Some(Vec2::new(pad.value(x_axis), pad.value(y_axis)))
    }

    fn button(&self, handle: DeviceHandle, button: Button) -> Option<f32>
    {
      let pad = self.pad(handle)?;

      // Xbox layout: South=A, East=B, West=X, North=Y
      let mapped = match button
      {
        Button::A => gilrs::Button::South,
        Button::B => gilrs::Button::East,
        Button::X => gilrs::Button::West,
        Button::Y => gilrs::Button::North,
      };

      Some(pressed(&pad, mapped))
    }
  }
}

#[cfg(not(feature = "gamepad"))]
mod fallback
{
  use gyre_core::input::NoGamepads;
  use gyre_core::InputSender;

  /// Keyboard and mouse only build.
  pub struct GamepadBackend;

  impl GamepadBackend
  {
    pub fn new() -> Self
    {
      log::info!("built without gamepad support");
      Self
    }

    pub fn announce(&mut self, _sender: &InputSender) {}

    pub fn pump(&mut self, _sender: &InputSender) {}

    pub fn source(&self) -> NoGamepads
    {
      NoGamepads
    }
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  const XBOX_SERIES: Option<(u16, u16)> = Some((0x045e, 0x0b12));
  const SWITCH_PRO: Option<(u16, u16)> = Some((0x057e, 0x2009));

  #[test]
  fn sticks_get_a_dead_zone()
  {
    assert_eq!(profile_for(ElementSet::all(), None), DeviceProfile::Drifting);
    assert_eq!(profile_for(ElementSet::all(), XBOX_SERIES), DeviceProfile::Drifting);
    assert_eq!(profile_for(ElementSet::RIGHT_THUMBSTICK, None), DeviceProfile::Drifting);
  }

  #[test]
  fn on_off_button_families_snap_their_buttons()
  {
    assert_eq!(profile_for(ElementSet::all(), SWITCH_PRO), DeviceProfile::DigitalButtons);
    assert_eq!(profile_for(ElementSet::all(), Some((0x2dc8, 0x6001))), DeviceProfile::DigitalButtons);
    assert_eq!(profile_for(ElementSet::BUTTON_A | ElementSet::BUTTON_B, Some((0x28de, 0x1142))), DeviceProfile::DigitalButtons);

    // Same vendor, different Valve product
    assert_eq!(profile_for(ElementSet::all(), Some((0x28de, 0x1205))), DeviceProfile::Drifting);
  }

  #[test]
  fn buttonless_devices_never_snap()
  {
    assert_eq!(profile_for(ElementSet::LEFT_THUMBSTICK, SWITCH_PRO), DeviceProfile::Drifting);
    assert_eq!(profile_for(ElementSet::DIRECTION_PAD, SWITCH_PRO), DeviceProfile::Subset);
  }

  #[test]
  fn pad_only_controllers_are_subset_devices()
  {
    assert_eq!(profile_for(ElementSet::DIRECTION_PAD, None), DeviceProfile::Subset);
    assert_eq!(
      profile_for(ElementSet::DIRECTION_PAD | ElementSet::BUTTON_A | ElementSet::BUTTON_X, None),
      DeviceProfile::Subset
    );
  }

  #[test]
  fn button_boxes_are_standard()
  {
    assert_eq!(profile_for(ElementSet::BUTTON_A | ElementSet::BUTTON_B, XBOX_SERIES), DeviceProfile::Standard);
    assert_eq!(profile_for(ElementSet::empty(), None), DeviceProfile::Standard);
    assert_eq!(
      profile_for(ElementSet::all() - ElementSet::LEFT_THUMBSTICK - ElementSet::RIGHT_THUMBSTICK, None),
      DeviceProfile::Standard
    );
  }
}
