use glam::Vec2;

use crate::input::smoothing::differential;
use crate::input::{Button, InputState, KeyCode, Stick, MOUSE_LEFT, MOUSE_MIDDLE, MOUSE_RIGHT};

//
// ──────────────────────────────────────────────────────────────
//   Bindings
//
//   Keyboard   yaw: ←/→ or A/D    pitch: ↑/↓ or W/S
//              zoom: E/= in, Q/- out   reset: R   brake: Space
//   Gamepad    right stick: yaw/pitch   left stick: pan
//              Y/A: zoom in/out   B: reset   X: brake
//   Mouse      left drag: free-look   right/middle drag: pan
//              wheel: zoom
// ──────────────────────────────────────────────────────────────
//

const YAW_POSITIVE: [KeyCode; 2] = [KeyCode::RIGHT_ARROW, KeyCode::D];
const YAW_NEGATIVE: [KeyCode; 2] = [KeyCode::LEFT_ARROW, KeyCode::A];
const PITCH_POSITIVE: [KeyCode; 2] = [KeyCode::UP_ARROW, KeyCode::W];
const PITCH_NEGATIVE: [KeyCode; 2] = [KeyCode::DOWN_ARROW, KeyCode::S];
const ZOOM_IN: [KeyCode; 3] = [KeyCode::E, KeyCode::EQUAL, KeyCode::KEYPAD_PLUS];
const ZOOM_OUT: [KeyCode; 3] = [KeyCode::Q, KeyCode::MINUS, KeyCode::KEYPAD_MINUS];

const PRESSED: f32 = 0.5;

/// Where one rotation axis gets its drive this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisDrive
{
  /// Continuous value from an analog stick, magnitude matters.
  Analog(f64),
  /// Key pair differential, sign only.
  Digital(f64),
  Idle,
}

/// One frame of camera intent, read out of the input snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls
{
  pub yaw: AxisDrive,
  pub pitch: AxisDrive,
  /// Positive zooms in.
  pub zoom: f64,
  pub pan: Vec2,
  pub look: Vec2,
  pub drag: Vec2,
  pub scroll: f32,
  pub reset: bool,
  pub brake: bool,
}

/// Reads the frame's controls. Consumes the edge-triggered mouse delta and
/// scroll.
pub fn read_controls(input: &InputState) -> Controls
{
  let pad = input.current_gamepad();

  let right_stick = pad.filter(|p| p.drives_thumbstick(Stick::Right)).map(|p| p.thumbstick(Stick::Right));
  let left_stick = pad.filter(|p| p.drives_thumbstick(Stick::Left)).map(|p| p.thumbstick(Stick::Left));

  let yaw = axis_drive(right_stick.map(|s| s.x), key_pair(input, &YAW_POSITIVE, &YAW_NEGATIVE));
  let pitch = axis_drive(right_stick.map(|s| s.y), key_pair(input, &PITCH_POSITIVE, &PITCH_NEGATIVE));

  let pad_zoom = pad.map_or(0.0, |p| differential(p.button(Button::Y), p.button(Button::A)));
  let key_zoom = key_pair(input, &ZOOM_IN, &ZOOM_OUT);
  let zoom = if pad_zoom != 0.0 { pad_zoom } else { key_zoom };

  let pad_pressed = |button: Button| pad.is_some_and(|p| p.button(button) >= PRESSED);

  let delta = input.take_mouse_delta();
  let look_held = input.mouse_button_pressed(MOUSE_LEFT) >= PRESSED;
  let drag_held = input.mouse_button_pressed(MOUSE_RIGHT) >= PRESSED
    || input.mouse_button_pressed(MOUSE_MIDDLE) >= PRESSED;

  Controls {
    yaw,
    pitch,
    zoom: zoom as f64,
    pan: left_stick.unwrap_or(Vec2::ZERO),
    look: if look_held { delta } else { Vec2::ZERO },
    drag: if drag_held { delta } else { Vec2::ZERO },
    scroll: input.take_scroll(),
    reset: input.key_pressed(KeyCode::R) >= PRESSED || pad_pressed(Button::B),
    brake: input.key_pressed(KeyCode::SPACE) >= PRESSED || pad_pressed(Button::X),
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Helpers
// ──────────────────────────────────────────────────────────────
//

/// Stick wins when it is live and deflected, otherwise the keys.
fn axis_drive(stick: Option<f32>, keys: f32) -> AxisDrive
{
  match stick
  {
    Some(v) if v != 0.0 => AxisDrive::Analog(v as f64),
    _ if keys != 0.0 => AxisDrive::Digital(keys as f64),
    _ => AxisDrive::Idle,
  }
}

fn key_pair(input: &InputState, positive: &[KeyCode], negative: &[KeyCode]) -> f32
{
  differential(strongest(input, positive), strongest(input, negative))
}

fn strongest(input: &InputState, keys: &[KeyCode]) -> f32
{
  keys.iter().map(|&k| input.key_pressed(k)).fold(0.0, f32::max)
}
