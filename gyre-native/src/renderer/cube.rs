use glam::Vec3;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeVertex
{
  pub position: [f32; 3],
  pub normal: [f32; 3],
}

impl CubeVertex
{
  pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

  pub fn layout() -> wgpu::VertexBufferLayout<'static>
  {
    wgpu::VertexBufferLayout {
      array_stride: std::mem::size_of::<CubeVertex>() as u64,
      step_mode: wgpu::VertexStepMode::Vertex,
      attributes: &Self::ATTRIBUTES,
    }
  }
}

// (normal, u, v) with u × v == normal, so corners walked
// (-u-v) → (+u-v) → (+u+v) → (-u+v) are counter-clockwise seen from outside
const FACES: [(Vec3, Vec3, Vec3); 6] = [
  (Vec3::X, Vec3::Y, Vec3::Z),
  (Vec3::NEG_X, Vec3::Z, Vec3::Y),
  (Vec3::Y, Vec3::Z, Vec3::X),
  (Vec3::NEG_Y, Vec3::X, Vec3::Z),
  (Vec3::Z, Vec3::X, Vec3::Y),
  (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// Unit cube (half extent 1) with flat per-face normals: 24 vertices, 36 indices.
pub fn geometry() -> (Vec<CubeVertex>, Vec<u16>)
{
  let mut vertices = Vec::with_capacity(24);
  let mut indices = Vec::with_capacity(36);

  for (normal, u, v) in FACES
  {
    let base = vertices.len() as u16;

    for corner in [-u - v, u - v, u + v, -u + v]
    {
      vertices.push(CubeVertex { position: (normal + corner).to_array(), normal: normal.to_array() });
    }

    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
  }

  (vertices, indices)
}

pub struct CubeMesh
{
  pub vertex_buffer: wgpu::Buffer,
  pub index_buffer: wgpu::Buffer,
  pub index_count: u32,
}

impl CubeMesh
{
  pub fn create(device: &wgpu::Device) -> Self
  {
    let (vertices, indices) = geometry();

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Cube Vertex Buffer"),
      contents: bytemuck::cast_slice(&vertices),
      usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Cube Index Buffer"),
      contents: bytemuck::cast_slice(&indices),
      usage: wgpu::BufferUsages::INDEX,
    });

    Self { vertex_buffer, index_buffer, index_count: indices.len() as u32 }
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn sizes()
  {
    let (vertices, indices) = geometry();
    assert_eq!(vertices.len(), 24);
    assert_eq!(indices.len(), 36);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
  }

  #[test]
  fn triangles_wind_counter_clockwise_from_outside()
  {
    let (vertices, indices) = geometry();

    for tri in indices.chunks(3)
    {
      let a = Vec3::from(vertices[tri[0] as usize].position);
      let b = Vec3::from(vertices[tri[1] as usize].position);
      let c = Vec3::from(vertices[tri[2] as usize].position);
      let n = Vec3::from(vertices[tri[0] as usize].normal);

      assert!((b - a).cross(c - a).dot(n) > 0.0, "triangle {tri:?} faces inward");
    }
  }

  #[test]
  fn normals_point_out_of_their_face()
  {
    let (vertices, _) = geometry();

    for vertex in vertices
    {
      let p = Vec3::from(vertex.position);
      let n = Vec3::from(vertex.normal);
      assert_eq!(n.length(), 1.0);
      assert_eq!(p.dot(n), 1.0);
    }
  }
}
