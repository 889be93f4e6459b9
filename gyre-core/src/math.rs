use glam::{Mat4, Vec3, Vec4};

//
// ──────────────────────────────────────────────────────────────
//   Matrix builders
//
//   Arguments are given in row-major order so the code reads like
//   the textbook form; glam stores columns, so `make_mat4`
//   transposes on the way in.
// ──────────────────────────────────────────────────────────────
//

#[allow(clippy::too_many_arguments)]
#[rustfmt::skip]
pub fn make_mat4(
  m11: f32, m12: f32, m13: f32, m14: f32,
  m21: f32, m22: f32, m23: f32, m24: f32,
  m31: f32, m32: f32, m33: f32, m34: f32,
  m41: f32, m42: f32, m43: f32, m44: f32,
) -> Mat4
{
  Mat4::from_cols(
    Vec4::new(m11, m21, m31, m41),
    Vec4::new(m12, m22, m32, m42),
    Vec4::new(m13, m23, m33, m43),
    Vec4::new(m14, m24, m34, m44),
  )
}

#[rustfmt::skip]
pub fn identity() -> Mat4
{
  make_mat4(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
  )
}

/// Rotation of `degrees` about `axis` (Rodrigues' formula).
///
/// `axis` must be non-zero; it is normalised here, so any length works.
#[rustfmt::skip]
pub fn rotation(degrees: f32, axis: Vec3) -> Mat4
{
  debug_assert!(axis.length_squared() > 0.0, "rotation axis must be non-zero");

  let axis = axis.normalize();
  let radians = degrees.to_radians();
  let ct = radians.cos();
  let st = radians.sin();
  let ci = 1.0 - ct;
  let (x, y, z) = (axis.x, axis.y, axis.z);

  make_mat4(
    ct + x * x * ci,     x * y * ci - z * st, x * z * ci + y * st, 0.0,
    y * x * ci + z * st, ct + y * y * ci,     y * z * ci - x * st, 0.0,
    z * x * ci - y * st, z * y * ci + x * st, ct + z * z * ci,     0.0,
    0.0,                 0.0,                 0.0,                 1.0,
  )
}

#[rustfmt::skip]
pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4
{
  make_mat4(
    1.0, 0.0, 0.0, tx,
    0.0, 1.0, 0.0, ty,
    0.0, 0.0, 1.0, tz,
    0.0, 0.0, 0.0, 1.0,
  )
}

#[rustfmt::skip]
pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4
{
  make_mat4(
    sx,  0.0, 0.0, 0.0,
    0.0, sy,  0.0, 0.0,
    0.0, 0.0, sz,  0.0,
    0.0, 0.0, 0.0, 1.0,
  )
}

/// Right-handed perspective projection with zero-to-one depth
/// (the wgpu / Metal clip-space convention).
///
/// View-space `z = -near` lands on depth 0 and `z = -far` on depth 1.
#[rustfmt::skip]
pub fn perspective_right_hand(fovy_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4
{
  let ys = 1.0 / (fovy_radians * 0.5).tan();
  let xs = ys / aspect;
  let zs = far / (near - far);

  make_mat4(
    xs,  0.0, 0.0,  0.0,
    0.0, ys,  0.0,  0.0,
    0.0, 0.0, zs,   near * zs,
    0.0, 0.0, -1.0, 0.0,
  )
}

//
// ──────────────────────────────────────────────────────────────
//   Scalar helpers
// ──────────────────────────────────────────────────────────────
//

/// Clamps `x` to `[lo, hi]`. Works for `f32` and `f64` alike.
///
/// Unlike `f32::clamp` this never panics on `lo > hi` and passes NaN through.
pub fn clamp<T: PartialOrd>(x: T, lo: T, hi: T) -> T
{
  if x < lo
  {
    lo
  }
  else if x > hi
  {
    hi
  }
  else
  {
    x
  }
}

/// Wraps `x` into `[lo, hi)`.
///
/// Values already in range are returned untouched, which keeps the
/// function exactly idempotent.
pub fn wrap_range(x: f64, lo: f64, hi: f64) -> f64
{
  if x >= lo && x < hi
  {
    return x;
  }

  let wrapped = (x - lo).rem_euclid(hi - lo) + lo;

  // rem_euclid can round up to the full span for tiny negative inputs
  if wrapped >= hi
  {
    lo
  }
  else
  {
    wrapped
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
  use std::f64::consts::PI;

  fn assert_mat_eq(a: Mat4, b: Mat4)
  {
    assert!(a.abs_diff_eq(b, 1e-5), "\n{a:?}\n!=\n{b:?}");
  }

  #[test]
  fn make_mat4_reads_row_major()
  {
    let m = translation(1.0, 2.0, 3.0);
    assert_eq!(m.w_axis, Vec4::new(1.0, 2.0, 3.0, 1.0));
  }

  #[test]
  fn identity_matches_glam()
  {
    assert_eq!(identity(), Mat4::IDENTITY);
  }

  #[test]
  fn zero_rotation_is_identity_for_any_axis()
  {
    for axis in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, -2.0, 0.5), Vec3::splat(100.0)]
    {
      assert_mat_eq(rotation(0.0, axis), Mat4::IDENTITY);
    }
  }

  #[test]
  fn rotation_about_z_turns_x_into_y()
  {
    let p = rotation(90.0, Vec3::Z).transform_point3(Vec3::X);
    assert!(p.abs_diff_eq(Vec3::Y, 1e-6), "{p:?}");
  }

  #[test]
  fn rotation_matches_glam_axis_angle()
  {
    let axis = Vec3::new(0.3, -1.0, 2.0);
    let expected = Mat4::from_axis_angle(axis.normalize(), 37.0_f32.to_radians());
    assert_mat_eq(rotation(37.0, axis), expected);
  }

  #[test]
  fn translation_and_scaling_move_points()
  {
    let p = translation(1.0, -2.0, 3.0).transform_point3(Vec3::ONE);
    assert_eq!(p, Vec3::new(2.0, -1.0, 4.0));

    let s = scaling(2.0, 3.0, 4.0).transform_point3(Vec3::ONE);
    assert_eq!(s, Vec3::new(2.0, 3.0, 4.0));
  }

  #[test]
  fn perspective_matches_glam_rh_zero_to_one()
  {
    let ours = perspective_right_hand(1.0, 1.5, 0.1, 100.0);
    let glam = Mat4::perspective_rh(1.0, 1.5, 0.1, 100.0);
    assert_mat_eq(ours, glam);
  }

  #[test]
  fn perspective_maps_near_and_far_to_unit_depth()
  {
    let proj = perspective_right_hand(1.0, 1.0, 0.5, 50.0);
    let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.5));
    let far = proj.project_point3(Vec3::new(0.0, 0.0, -50.0));
    assert!(near.z.abs() < 1e-6);
    assert!((far.z - 1.0).abs() < 1e-6);
  }

  #[test]
  fn clamp_stays_in_range()
  {
    let samples = [-10.0_f64, -1.0, -0.5, 0.0, 0.25, 1.0, 7.5];
    for &x in &samples
    {
      let c = clamp(x, -1.0, 1.0);
      assert!((-1.0..=1.0).contains(&c));
      if (-1.0..=1.0).contains(&x)
      {
        assert_eq!(c, x);
      }
    }
    assert_eq!(clamp(5.0_f32, 0.0, 2.0), 2.0);
    assert_eq!(clamp(-5.0_f32, 0.0, 2.0), 0.0);
  }

  #[test]
  fn clamp_propagates_nan()
  {
    assert!(clamp(f32::NAN, 0.0, 1.0).is_nan());
    assert!(clamp(f64::NAN, 0.0, 1.0).is_nan());
  }

  #[test]
  fn wrap_range_is_idempotent()
  {
    for x in [-100.0, -7.0, -PI, -3.0, 0.0, 1.0, PI, 3.5, 6.3, 1e6, -1e-18]
    {
      let once = wrap_range(x, -PI, PI);
      assert!((-PI..PI).contains(&once), "{x} -> {once}");
      assert_eq!(wrap_range(once, -PI, PI), once);
    }
  }

  #[test]
  fn wrap_range_preserves_angle()
  {
    let w = wrap_range(PI + 0.5, -PI, PI);
    assert!((w - (-PI + 0.5)).abs() < 1e-12);
  }
}
