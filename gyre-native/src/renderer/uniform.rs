use gyre_core::{FrameData, ModelConstants};

//
// ──────────────────────────────────────────────────────────────
//   Frame uniform (GPU side)
//
//   WGSL layout (cube.wgsl, binding 0):
//     projection      : mat4x4<f32>   → 64 bytes
//     view            : mat4x4<f32>   → 64 bytes
//     projection_view : mat4x4<f32>   → 64 bytes
//     light_direction : vec3<f32>     → 12 bytes
//     _pad            : f32           →  4 bytes
//   Total: 208 bytes
// ──────────────────────────────────────────────────────────────
//

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform
{
  pub projection: [[f32; 4]; 4],
  pub view: [[f32; 4]; 4],
  pub projection_view: [[f32; 4]; 4],
  pub light_direction: [f32; 3],
  pub _pad: f32,
}

// Catch CPU/GPU layout mismatches at compile time
const _: () = assert!(std::mem::size_of::<FrameUniform>() == 208);

impl FrameUniform
{
  pub fn from_frame(frame: &FrameData) -> Self
  {
    Self {
      projection: frame.projection_matrix.to_cols_array_2d(),
      view: frame.view_matrix.to_cols_array_2d(),
      projection_view: frame.projection_view_matrix.to_cols_array_2d(),
      light_direction: frame.normalized_light_direction.to_array(),
      _pad: 0.0,
    }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Model uniform (binding 1)
// ──────────────────────────────────────────────────────────────
//

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform
{
  pub model: [[f32; 4]; 4],
}

const _: () = assert!(std::mem::size_of::<ModelUniform>() == 64);

impl ModelUniform
{
  pub fn from_constants(constants: &ModelConstants) -> Self
  {
    Self { model: constants.model_matrix.to_cols_array_2d() }
  }
}

#[cfg(test)]
mod tests
{
  use super::*;
  use glam::{Mat4, Vec3};

  #[test]
  fn frame_uniform_is_column_major()
  {
    let projection = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
    let view = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let frame = FrameData::new(projection, view, Vec3::new(0.0, -2.0, 0.0));

    let uniform = FrameUniform::from_frame(&frame);

    // Translation lives in the fourth column
    assert_eq!(uniform.view[3], [1.0, 2.0, 3.0, 1.0]);
    assert_eq!(uniform.projection[0][0], 2.0);
    assert_eq!(uniform.projection_view[3], [2.0, 6.0, 12.0, 1.0]);
    assert_eq!(uniform.light_direction, [0.0, -1.0, 0.0]);
  }

  #[test]
  fn frame_uniform_bytes_cover_every_field()
  {
    let uniform = FrameUniform::from_frame(&FrameData::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::X));
    assert_eq!(bytemuck::bytes_of(&uniform).len(), 208);
  }

  #[test]
  fn model_uniform_defaults_to_identity()
  {
    let uniform = ModelUniform::from_constants(&ModelConstants::default());
    assert_eq!(uniform.model, Mat4::IDENTITY.to_cols_array_2d());
  }
}
