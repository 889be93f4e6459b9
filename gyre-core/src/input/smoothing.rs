use glam::Vec2;

use crate::math::clamp;

//
// ──────────────────────────────────────────────────────────────
//   Input smoothing
//
//   Each helper takes the current value, applies one frame's
//   worth of change and returns the new value. Callers pass
//   `speed` already scaled by the frame's elapsed time; an
//   unscaled speed makes the result frame-rate dependent.
// ──────────────────────────────────────────────────────────────
//

/// Combines a positive/negative intensity pair into -1, 0 or +1.
///
/// Both held cancels out to 0.
pub fn differential(positive: f32, negative: f32) -> f32
{
  let mut result = 0.0;

  if positive > 0.0
  {
    result += 1.0;
  }

  if negative > 0.0
  {
    result -= 1.0;
  }

  result
}

/// Moves `current` by `speed * input`, clamped to `[lo, hi]`.
///
/// For analog sources whose magnitude matters (thumbstick axes).
pub fn accelerate_clamp(current: f64, speed: f64, input: f64, lo: f64, hi: f64) -> f64
{
  clamp(current + speed * input, lo, hi)
}

/// Per-axis [`accelerate_clamp`] for 2D inputs.
pub fn accelerate_clamp2(current: Vec2, speed: f32, input: Vec2, lo: f32, hi: f32) -> Vec2
{
  Vec2::new(
    clamp(current.x + speed * input.x, lo, hi),
    clamp(current.y + speed * input.y, lo, hi),
  )
}

/// Moves `current` by a fixed `speed` up (positive input) or down
/// (zero or negative input), clamped to `[lo, hi]`.
///
/// Only the sign of `input` counts, so digital keys give a constant
/// acceleration however the intensity reads.
pub fn ramp_clamp(current: f64, speed: f64, input: f64, lo: f64, hi: f64) -> f64
{
  if input > 0.0
  {
    clamp(current + speed, lo, hi)
  }
  else
  {
    clamp(current - speed, lo, hi)
  }
}

#[cfg(test)]
mod tests
{
  use super::*;
  use std::f64::consts::PI;

  #[test]
  fn differential_truth_table()
  {
    assert_eq!(differential(1.0, 0.0), 1.0);
    assert_eq!(differential(0.0, 1.0), -1.0);
    assert_eq!(differential(1.0, 1.0), 0.0);
    assert_eq!(differential(0.0, 0.0), 0.0);
  }

  #[test]
  fn differential_ignores_magnitude()
  {
    assert_eq!(differential(0.1, 0.0), 1.0);
    assert_eq!(differential(0.2, 0.9), 0.0);
    assert_eq!(differential(0.0, 0.3), -1.0);
  }

  #[test]
  fn accelerate_clamp_is_monotonic_in_input()
  {
    let inputs = [-2.0, -1.0, -0.5, 0.0, 0.1, 0.5, 1.0, 3.0];
    let results: Vec<f64> =
      inputs.iter().map(|&i| accelerate_clamp(0.2, 0.7, i, -PI, PI)).collect();

    for pair in results.windows(2)
    {
      assert!(pair[0] <= pair[1], "{results:?}");
    }
  }

  #[test]
  fn accelerate_clamp_respects_bounds()
  {
    assert_eq!(accelerate_clamp(3.0, 10.0, 1.0, -PI, PI), PI);
    assert_eq!(accelerate_clamp(-3.0, 10.0, -1.0, -PI, PI), -PI);
    assert!((accelerate_clamp(0.0, 0.5, 0.5, -PI, PI) - 0.25).abs() < 1e-12);
  }

  #[test]
  fn accelerate_clamp2_works_per_axis()
  {
    let v = accelerate_clamp2(Vec2::new(0.9, 0.0), 0.5, Vec2::new(1.0, -1.0), -1.0, 1.0);
    assert_eq!(v, Vec2::new(1.0, -0.5));
  }

  #[test]
  fn ramp_clamp_uses_sign_only()
  {
    assert_eq!(ramp_clamp(0.0, 0.25, 0.01, -1.0, 1.0), 0.25);
    assert_eq!(ramp_clamp(0.0, 0.25, 100.0, -1.0, 1.0), 0.25);
    assert_eq!(ramp_clamp(0.0, 0.25, -0.01, -1.0, 1.0), -0.25);
  }

  #[test]
  fn ramp_clamp_treats_zero_input_as_down()
  {
    assert_eq!(ramp_clamp(0.5, 0.25, 0.0, -1.0, 1.0), 0.25);
  }

  #[test]
  fn ramp_clamp_saturates()
  {
    assert_eq!(ramp_clamp(0.9, 0.25, 1.0, -1.0, 1.0), 1.0);
    assert_eq!(ramp_clamp(-0.9, 0.25, -1.0, -1.0, 1.0), -1.0);
  }
}
