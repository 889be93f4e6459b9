//! Camera state integrator: turns polled input plus elapsed time into an
//! orbiting view.

mod controls;

pub use controls::{read_controls, AxisDrive, Controls};

use std::f64::consts::PI;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::smoothing::{accelerate_clamp, ramp_clamp};
use crate::input::InputState;
use crate::math::{clamp, rotation, translation, wrap_range};

//
// ──────────────────────────────────────────────────────────────
//   Configuration
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig
{
  /// Angular acceleration in rad/s² applied by full input
  pub rotation_acceleration: f64,
  /// Rate in rad/s² at which spin bleeds off with no input
  pub rotation_damping: f64,
  /// Spin limit in rad/s; never above π
  pub max_rotation_speed: f64,

  /// Distance change per second at full zoom input
  pub zoom_speed: f64,
  /// Fraction of distance removed per scroll line
  pub scroll_zoom_step: f64,
  /// Pan speed in distance-lengths per second at full stick
  pub pan_speed: f32,
  /// Radians of look (or distance-fractions of pan) per mouse count
  pub mouse_sensitivity: f32,

  pub initial_yaw: f64,
  pub initial_pitch: f64,
  pub initial_distance: f64,
  pub min_distance: f64,
  pub max_distance: f64,

  pub fovy_degrees: f32,
  pub near: f32,
  pub far: f32,

  /// Longest frame the integrator will accept, in seconds
  pub max_frame_delta: f64,
}

impl Default for CameraConfig
{
  fn default() -> Self
  {
    Self {
      rotation_acceleration: PI,
      rotation_damping: PI / 2.0,
      max_rotation_speed: PI,

      zoom_speed: 4.0,
      scroll_zoom_step: 0.1,
      pan_speed: 0.5,
      mouse_sensitivity: 0.005,

      initial_yaw: 0.0,
      initial_pitch: 0.3,
      initial_distance: 6.0,
      min_distance: 1.5,
      max_distance: 50.0,

      fovy_degrees: 65.0,
      near: 0.1,
      far: 100.0,

      max_frame_delta: 0.25,
    }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   CameraIntegrator
// ──────────────────────────────────────────────────────────────
//

pub struct CameraIntegrator
{
  config: CameraConfig,

  delta_time: f64,
  rotation_speed: f64,
  pitch_speed: f64,

  yaw: f64,
  pitch: f64,
  distance: f64,
  focus: Vec3,
}

impl CameraIntegrator
{
  pub fn new(config: &CameraConfig) -> Self
  {
    let mut camera = Self {
      config: config.clone(),
      delta_time: 0.0,
      rotation_speed: 0.0,
      pitch_speed: 0.0,
      yaw: 0.0,
      pitch: 0.0,
      distance: 0.0,
      focus: Vec3::ZERO,
    };
    camera.reset();
    camera
  }

  /// Back to the configured starting pose, at rest.
  pub fn reset(&mut self)
  {
    self.rotation_speed = 0.0;
    self.pitch_speed = 0.0;
    self.yaw = wrap_range(self.config.initial_yaw, -PI, PI);
    self.pitch = wrap_range(self.config.initial_pitch, -PI, PI);
    self.distance = clamp(self.config.initial_distance, self.config.min_distance, self.config.max_distance);
    self.focus = Vec3::ZERO;
  }

  /// Advances the camera by one frame. Never fails.
  ///
  /// A negative or NaN `delta_time` skips the frame: the edge-triggered
  /// mouse input is consumed and nothing else changes. Anything longer than
  /// `max_frame_delta` (debugger pauses, suspended windows) is cut down to it.
  pub fn update(&mut self, delta_time: f64, input: &InputState)
  {
    let controls = read_controls(input);

    let Some(dt) = self.sanitize_delta(delta_time)
    else
    {
      return;
    };
    self.delta_time = dt;

    if controls.reset
    {
      self.reset();
    }

    self.update_rotation_speed(&controls, dt);

    if controls.brake
    {
      self.rotation_speed = 0.0;
      self.pitch_speed = 0.0;
    }

    let sensitivity = self.config.mouse_sensitivity as f64;
    let yaw = self.yaw + self.rotation_speed * dt + controls.look.x as f64 * sensitivity;
    let pitch = self.pitch + self.pitch_speed * dt - controls.look.y as f64 * sensitivity;

    self.yaw = wrap_range(yaw, -PI, PI);
    self.pitch = wrap_range(pitch, -PI, PI);

    self.update_zoom(&controls, dt);
    self.update_pan(&controls, dt);
  }

  /// None for a clock anomaly, otherwise the delta capped to `max_frame_delta`.
  fn sanitize_delta(&self, delta_time: f64) -> Option<f64>
  {
    if delta_time.is_nan() || delta_time < 0.0
    {
      log::debug!("clock anomaly: delta {delta_time}, frame skipped");
      return None;
    }

    if delta_time > self.config.max_frame_delta
    {
      log::debug!("long frame: delta {delta_time}, capped at {}", self.config.max_frame_delta);
      return Some(self.config.max_frame_delta.max(0.0));
    }

    Some(delta_time)
  }

  /// Advances both spin rates and keeps them inside [-π, π].
  fn update_rotation_speed(&mut self, controls: &Controls, dt: f64)
  {
    let limit = self.speed_limit();
    let accel = self.config.rotation_acceleration * dt;
    let damping = self.config.rotation_damping * dt;

    self.rotation_speed = advance_speed(self.rotation_speed, controls.yaw, accel, damping, limit);
    self.pitch_speed = advance_speed(self.pitch_speed, controls.pitch, accel, damping, limit);
  }

  fn speed_limit(&self) -> f64
  {
    let limit = self.config.max_rotation_speed.abs();
    if limit.is_nan()
    {
      PI
    }
    else
    {
      limit.min(PI)
    }
  }

  fn update_zoom(&mut self, controls: &Controls, dt: f64)
  {
    let (lo, hi) = (self.config.min_distance, self.config.max_distance);

    if controls.zoom != 0.0
    {
      // Zooming in shortens the distance
      self.distance = accelerate_clamp(self.distance, self.config.zoom_speed * dt, -controls.zoom, lo, hi);
    }

    if controls.scroll != 0.0
    {
      let factor = 1.0 - controls.scroll as f64 * self.config.scroll_zoom_step;
      self.distance = clamp(self.distance * factor.max(0.0), lo, hi);
    }
  }

  fn update_pan(&mut self, controls: &Controls, dt: f64)
  {
    let distance = self.distance as f32;
    let stick = controls.pan * self.config.pan_speed * dt as f32;
    let drag = Vec2::new(-controls.drag.x, controls.drag.y) * self.config.mouse_sensitivity;
    let offset = (stick + drag) * distance;

    if offset == Vec2::ZERO || !offset.is_finite()
    {
      return;
    }

    let (right, up) = self.screen_axes();
    self.focus += right * offset.x + up * offset.y;
  }

  /// World-space directions of the screen's +X and +Y.
  fn screen_axes(&self) -> (Vec3, Vec3)
  {
    // Orientation is orthonormal, so its transpose is its inverse
    let inverse = self.orientation().transpose();
    (inverse.transform_vector3(Vec3::X), inverse.transform_vector3(Vec3::Y))
  }

  fn orientation(&self) -> Mat4
  {
    let pitch = (self.pitch as f32).to_degrees();
    let yaw = (self.yaw as f32).to_degrees();
    rotation(pitch, Vec3::X) * rotation(yaw, Vec3::Y)
  }

  /// World-to-view transform for the current state. Pure read.
  pub fn view_matrix(&self) -> Mat4
  {
    let back_off = translation(0.0, 0.0, -(self.distance as f32));
    let to_focus = translation(-self.focus.x, -self.focus.y, -self.focus.z);
    back_off * self.orientation() * to_focus
  }

  //
  // ──────────────────────────────────────────────────────────────
  //   Accessors
  // ──────────────────────────────────────────────────────────────
  //

  pub fn config(&self) -> &CameraConfig
  {
    &self.config
  }

  /// Elapsed seconds used by the last update, after sanitising.
  pub fn delta_time(&self) -> f64
  {
    self.delta_time
  }

  /// Yaw spin in rad/s.
  pub fn rotation_speed(&self) -> f64
  {
    self.rotation_speed
  }

  pub fn pitch_speed(&self) -> f64
  {
    self.pitch_speed
  }

  pub fn yaw(&self) -> f64
  {
    self.yaw
  }

  pub fn pitch(&self) -> f64
  {
    self.pitch
  }

  pub fn distance(&self) -> f64
  {
    self.distance
  }

  pub fn focus(&self) -> Vec3
  {
    self.focus
  }

  /// Camera position in world space.
  pub fn eye(&self) -> Vec3
  {
    self.view_matrix().inverse().transform_point3(Vec3::ZERO)
  }
}

/// One frame of spin for a single axis.
fn advance_speed(speed: f64, drive: AxisDrive, accel: f64, damping: f64, limit: f64) -> f64
{
  match drive
  {
    AxisDrive::Analog(input) => accelerate_clamp(speed, accel, input, -limit, limit),
    AxisDrive::Digital(input) => ramp_clamp(speed, accel, input, -limit, limit),
    AxisDrive::Idle => clamp(decay_toward_zero(speed, damping), -limit, limit),
  }
}

fn decay_toward_zero(speed: f64, amount: f64) -> f64
{
  if speed > 0.0
  {
    (speed - amount).max(0.0)
  }
  else
  {
    (speed + amount).min(0.0)
  }
}
