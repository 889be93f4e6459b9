use std::time::Instant;

use glam::{Mat4, Vec3};

use crate::camera::CameraConfig;
use crate::math::{identity, perspective_right_hand};

//
// ──────────────────────────────────────────────────────────────
//   Per-frame data handed to the draw layer
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameData
{
  pub projection_matrix: Mat4,
  pub view_matrix: Mat4,
  pub projection_view_matrix: Mat4,
  pub normalized_light_direction: Vec3,
}

impl FrameData
{
  pub fn new(projection: Mat4, view: Mat4, light_direction: Vec3) -> Self
  {
    Self {
      projection_matrix: projection,
      view_matrix: view,
      projection_view_matrix: projection * view,
      normalized_light_direction: light_direction.normalize_or_zero(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConstants
{
  pub model_matrix: Mat4,
}

impl Default for ModelConstants
{
  fn default() -> Self
  {
    Self { model_matrix: identity() }
  }
}

/// Projection for a drawable of `width` x `height` pixels.
pub fn projection_for(width: u32, height: u32, camera: &CameraConfig) -> Mat4
{
  let aspect = if height == 0 { 1.0 } else { width as f32 / height as f32 };
  perspective_right_hand(camera.fovy_degrees.to_radians(), aspect, camera.near, camera.far)
}

//
// ──────────────────────────────────────────────────────────────
//   FrameClock
// ──────────────────────────────────────────────────────────────
//

/// Elapsed time between display callbacks, with pause support and an
/// exponentially smoothed FPS readout.
pub struct FrameClock
{
  last_frame: Option<Instant>,
  paused: bool,
  /// Smoothed FPS using exponential moving average
  smoothed_fps: f64,
  /// Smoothing factor (lower = smoother, 0.0-1.0)
  smoothing: f64,
}

impl Default for FrameClock
{
  fn default() -> Self
  {
    Self::new()
  }
}

impl FrameClock
{
  pub fn new() -> Self
  {
    Self { last_frame: None, paused: false, smoothed_fps: 60.0, smoothing: 0.05 }
  }

  /// Seconds since the previous tick.
  pub fn tick(&mut self) -> f64
  {
    self.tick_at(Instant::now())
  }

  /// Seconds between `now` and the previous tick. The first tick after
  /// creation or resume reports zero, as does every tick while paused.
  pub fn tick_at(&mut self, now: Instant) -> f64
  {
    if self.paused
    {
      return 0.0;
    }

    let elapsed = match self.last_frame
    {
      Some(last) => now.saturating_duration_since(last).as_secs_f64(),
      None => 0.0,
    };
    self.last_frame = Some(now);

    if elapsed > 0.0
    {
      let instant_fps = 1.0 / elapsed;
      self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing) + instant_fps * self.smoothing;
    }

    elapsed
  }

  pub fn pause(&mut self)
  {
    self.paused = true;
  }

  /// Resumes without counting the paused stretch as frame time.
  pub fn resume(&mut self)
  {
    self.paused = false;
    self.last_frame = None;
  }

  pub fn is_paused(&self) -> bool
  {
    self.paused
  }

  pub fn fps(&self) -> f64
  {
    self.smoothed_fps
  }
}

#[cfg(test)]
mod tests
{
  use super::*;
  use std::time::Duration;

  #[test]
  fn frame_data_composes_and_normalizes()
  {
    let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 10.0);
    let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
    let frame = FrameData::new(proj, view, Vec3::new(0.0, -3.0, 4.0));

    assert_eq!(frame.projection_view_matrix, proj * view);
    assert!((frame.normalized_light_direction.length() - 1.0).abs() < 1e-6);
    assert!((frame.normalized_light_direction - Vec3::new(0.0, -0.6, 0.8)).length() < 1e-6);
  }

  #[test]
  fn projection_survives_zero_height()
  {
    let m = projection_for(800, 0, &CameraConfig::default());
    assert!(m.is_finite());
  }

  #[test]
  fn clock_measures_between_ticks()
  {
    let start = Instant::now();
    let mut clock = FrameClock::new();

    assert_eq!(clock.tick_at(start), 0.0);
    let dt = clock.tick_at(start + Duration::from_millis(16));
    assert!((dt - 0.016).abs() < 1e-9);
  }

  #[test]
  fn clock_never_runs_backwards()
  {
    let start = Instant::now() + Duration::from_secs(1);
    let mut clock = FrameClock::new();
    clock.tick_at(start);

    assert_eq!(clock.tick_at(start - Duration::from_millis(5)), 0.0);
  }

  #[test]
  fn pause_hides_elapsed_time()
  {
    let start = Instant::now();
    let mut clock = FrameClock::new();
    clock.tick_at(start);

    clock.pause();
    assert_eq!(clock.tick_at(start + Duration::from_secs(5)), 0.0);

    clock.resume();
    assert_eq!(clock.tick_at(start + Duration::from_secs(10)), 0.0);
    let dt = clock.tick_at(start + Duration::from_secs(10) + Duration::from_millis(20));
    assert!((dt - 0.020).abs() < 1e-9);
  }

  #[test]
  fn fps_moves_toward_frame_rate()
  {
    let start = Instant::now();
    let mut clock = FrameClock::new();
    clock.tick_at(start);

    for i in 1..=400
    {
      clock.tick_at(start + Duration::from_millis(10 * i));
    }
    assert!((clock.fps() - 100.0).abs() < 1.0, "{}", clock.fps());
  }
}
