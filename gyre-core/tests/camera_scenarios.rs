use std::cell::Cell;
use std::f64::consts::PI;

use glam::{Vec2, Vec3};
use gyre_core::input::{
  Button, DeviceHandle, DeviceProfile, ElementSet, GamepadSource, InputEvent, KeyCode, NoGamepads, Stick, MOUSE_LEFT,
  MOUSE_RIGHT,
};
use gyre_core::math::rotation;
use gyre_core::{CameraConfig, CameraIntegrator, InputConfig, InputNormalizer, InputSender};

const PAD: DeviceHandle = DeviceHandle(1);
const FRAME: f64 = 1.0 / 60.0;

/// A controller whose elements read whatever the test last set.
#[derive(Default)]
struct ScriptedPad
{
  left: Cell<Option<Vec2>>,
  right: Cell<Option<Vec2>>,
  buttons: Cell<Option<f32>>,
}

impl GamepadSource for ScriptedPad
{
  fn direction_pad(&self, _handle: DeviceHandle) -> Option<Vec2>
  {
    None
  }

  fn thumbstick(&self, _handle: DeviceHandle, stick: Stick) -> Option<Vec2>
  {
    match stick
    {
      Stick::Left => self.left.get(),
      Stick::Right => self.right.get(),
    }
  }

  fn button(&self, _handle: DeviceHandle, _button: Button) -> Option<f32>
  {
    self.buttons.get()
  }
}

fn rig() -> (CameraIntegrator, InputNormalizer, InputSender)
{
  let (input, tx) = InputNormalizer::new(&InputConfig::default());
  (CameraIntegrator::new(&CameraConfig::default()), input, tx)
}

#[test]
fn right_stick_only_gamepad_yaws_the_camera()
{
  let (mut camera, mut input, tx) = rig();
  tx.send(InputEvent::GamepadConnected {
    handle: PAD,
    elements: ElementSet::RIGHT_THUMBSTICK,
    profile: DeviceProfile::Standard,
  });

  let pad_source = ScriptedPad::default();
  pad_source.right.set(Some(Vec2::new(0.5, 0.0)));
  input.poll(&pad_source);

  let pad = input.state().current_gamepad().expect("gamepad should be current");
  assert!(pad.has_right_thumbstick());
  assert!(!pad.has_left_thumbstick());
  assert!(!pad.has_direction_pad());
  for button in [Button::A, Button::B, Button::X, Button::Y]
  {
    assert!(!pad.has_button(button));
  }
  assert!(!pad.use_input_subset());
  assert!(!pad.ignores_inner_radius());

  let view_before = camera.view_matrix();
  let yaw_before = camera.yaw();

  camera.update(FRAME, input.state());

  let expected_speed = PI * FRAME * 0.5;
  assert!((camera.rotation_speed() - expected_speed).abs() < 1e-9);
  assert!(camera.rotation_speed() > 0.0 && camera.rotation_speed() < PI);
  assert_eq!(camera.pitch_speed(), 0.0);

  let yaw_step = camera.yaw() - yaw_before;
  assert!(yaw_step > 0.0 && yaw_step < 0.01, "{yaw_step}");

  // With the focus at the origin, a pure yaw step post-multiplies the old view
  let expected = view_before * rotation((yaw_step as f32).to_degrees(), Vec3::Y);
  assert!(camera.view_matrix().abs_diff_eq(expected, 1e-5));
}

#[test]
fn idle_session_stays_put()
{
  let (mut camera, mut input, _tx) = rig();
  let initial = camera.view_matrix();

  for _ in 0..300
  {
    input.poll(&NoGamepads);
    camera.update(0.016, input.state());

    assert_eq!(camera.rotation_speed(), 0.0);
    assert_eq!(camera.view_matrix(), initial);
    assert_eq!(camera.view_matrix(), initial);
  }
}

#[test]
fn nan_delta_leaves_state_untouched()
{
  let (mut camera, mut input, tx) = rig();
  tx.key(KeyCode::D, true);
  tx.key(KeyCode::UP_ARROW, true);

  for _ in 0..10
  {
    input.poll(&NoGamepads);
    camera.update(FRAME, input.state());
  }

  let speed = camera.rotation_speed();
  let pitch_speed = camera.pitch_speed();
  let (yaw, pitch, distance) = (camera.yaw(), camera.pitch(), camera.distance());
  let view = camera.view_matrix();
  assert!(speed > 0.0);

  // Free-look drag, pan drag, scroll and brake all land on the bad frame
  tx.mouse_button(MOUSE_LEFT, true);
  tx.mouse_button(MOUSE_RIGHT, true);
  tx.mouse_moved(100.0, 40.0);
  tx.send(InputEvent::Scrolled { lines: 2.0 });
  tx.key(KeyCode::SPACE, true);
  input.poll(&NoGamepads);
  camera.update(f64::NAN, input.state());

  assert_eq!(camera.rotation_speed(), speed);
  assert_eq!(camera.pitch_speed(), pitch_speed);
  assert_eq!((camera.yaw(), camera.pitch(), camera.distance()), (yaw, pitch, distance));
  assert_eq!(camera.focus(), Vec3::ZERO);
  assert_eq!(camera.view_matrix(), view);
  assert_eq!(camera.delta_time(), FRAME);

  // The motion was consumed with the skipped frame
  assert_eq!(input.state().take_mouse_delta(), Vec2::ZERO);
  assert_eq!(input.state().take_scroll(), 0.0);
}

#[test]
fn disconnect_falls_back_to_keyboard()
{
  let (mut camera, mut input, tx) = rig();
  let pad_source = ScriptedPad::default();
  pad_source.right.set(Some(Vec2::new(-1.0, 0.0)));

  tx.send(InputEvent::GamepadConnected { handle: PAD, elements: ElementSet::all(), profile: DeviceProfile::Standard });
  input.poll(&pad_source);
  camera.update(FRAME, input.state());
  assert!(camera.rotation_speed() < 0.0);

  tx.send(InputEvent::GamepadDisconnected { handle: PAD });
  tx.key(KeyCode::RIGHT_ARROW, true);
  input.poll(&pad_source);
  assert!(!input.state().controller_connected());

  let before = camera.rotation_speed();
  camera.update(FRAME, input.state());
  assert!((camera.rotation_speed() - (before + PI * FRAME)).abs() < 1e-12);
}

#[test]
fn drifting_stick_noise_does_not_spin()
{
  let (mut camera, mut input, tx) = rig();
  let pad_source = ScriptedPad::default();
  pad_source.right.set(Some(Vec2::new(0.08, -0.05)));
  pad_source.left.set(Some(Vec2::new(-0.1, 0.02)));

  tx.send(InputEvent::GamepadConnected {
    handle: PAD,
    elements: ElementSet::LEFT_THUMBSTICK | ElementSet::RIGHT_THUMBSTICK,
    profile: DeviceProfile::Drifting,
  });

  let initial = camera.view_matrix();
  for _ in 0..120
  {
    input.poll(&pad_source);
    camera.update(FRAME, input.state());
  }

  assert_eq!(camera.rotation_speed(), 0.0);
  assert_eq!(camera.view_matrix(), initial);
}

#[test]
fn zoom_buttons_pull_the_camera_in()
{
  let (mut camera, mut input, tx) = rig();
  let pad_source = ScriptedPad::default();
  tx.send(InputEvent::GamepadConnected {
    handle: PAD,
    elements: ElementSet::BUTTON_Y,
    profile: DeviceProfile::DigitalButtons,
  });

  // Partially pressed Y snaps to fully pressed on this profile
  pad_source.buttons.set(Some(0.7));
  input.poll(&pad_source);
  camera.update(FRAME, input.state());

  assert!(camera.distance() < CameraConfig::default().initial_distance);
}
