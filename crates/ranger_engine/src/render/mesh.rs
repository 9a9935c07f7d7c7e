//! Mesh: vertex and index data with the buffers that hold them on the device

use super::buffer::{Ebo, Vbo};
use super::device::GraphicsDevice;

/// Packed `x, y, z` vertices and triangle indices.
///
/// Each mesh owns exactly one vertex buffer and one element buffer.
#[derive(Debug, Default)]
pub struct Mesh {
    /// Vertex components, three per vertex
    pub vertices: Vec<f32>,
    /// Indices into the vertex list
    pub indices: Vec<u32>,
    vbo: Vbo,
    ebo: Ebo,
}

impl Mesh {
    /// Empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Whether both buffers have device ids
    pub fn is_generated(&self) -> bool {
        self.vbo.is_generated() && self.ebo.is_generated()
    }

    /// Allocate both buffer ids
    pub fn gen_buffers(&mut self, device: &mut dyn GraphicsDevice) {
        self.vbo.gen_buffer(device);
        self.ebo.gen_buffer(device);
    }

    /// Upload vertices and indices.
    ///
    /// # Panics
    ///
    /// If [`Mesh::gen_buffers`] has not run.
    pub fn bind(&self, device: &mut dyn GraphicsDevice) {
        self.vbo.bind(device, &self.vertices);
        self.ebo.bind(device, &self.indices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::{BufferTarget, DeviceCall, HeadlessDevice};

    #[test]
    fn test_bind_uploads_both_buffers() {
        let mut device = HeadlessDevice::new();
        let mut mesh = Mesh::new();
        mesh.vertices.extend_from_slice(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        mesh.indices.extend_from_slice(&[0, 1, 2]);

        mesh.gen_buffers(&mut device);
        assert!(mesh.is_generated());
        mesh.bind(&mut device);

        let uploads: Vec<_> = device
            .calls()
            .iter()
            .filter_map(|c| match c {
                DeviceCall::BufferData { target, bytes } => Some((*target, *bytes)),
                _ => None,
            })
            .collect();
        assert_eq!(uploads, [(BufferTarget::Array, 36), (BufferTarget::ElementArray, 12)]);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    #[should_panic(expected = "gen_buffer")]
    fn test_bind_without_buffers_panics() {
        let mut device = HeadlessDevice::new();
        Mesh::new().bind(&mut device);
    }
}
