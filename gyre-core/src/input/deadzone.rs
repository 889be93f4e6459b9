//! Radial dead zone for analog sticks

use glam::Vec2;

/// Zeroes stick input inside `inner_radius` and rescales the rest so the
/// output magnitude runs linearly from 0 at the threshold to 1 at the rim.
///
/// Direction is preserved. Magnitudes above 1 (miscalibrated hardware) are
/// clamped to 1 first, and non-finite input reads as rest.
pub fn ignore_inner_radius(point: Vec2, inner_radius: f32) -> Vec2
{
  if !point.is_finite()
  {
    return Vec2::ZERO;
  }

  let r = point.length().min(1.0);
  if r <= inner_radius || r == 0.0
  {
    return Vec2::ZERO;
  }

  let direction = point / point.length();
  let scaled = (r - inner_radius) / (1.0 - inner_radius);

  direction * scaled
}
