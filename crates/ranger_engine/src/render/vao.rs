//! Vertex array object

use log::debug;

use super::atlas::VectorShape;
use super::device::{BufferTarget, GraphicsDevice, VertexArrayId};
use super::mesh::Mesh;

const XYZ_COMPONENT_COUNT: i32 = 3;
const POSITION_ATTRIBUTE: u32 = 0;

/// Ties a mesh's buffers to the position attribute layout.
#[derive(Debug, Default)]
pub struct Vao {
    id: Option<VertexArrayId>,
}

impl Vao {
    /// Vertex array without an id
    pub fn new() -> Self {
        Self::default()
    }

    /// Device id, once bound
    pub fn id(&self) -> Option<VertexArrayId> {
        self.id
    }

    /// Generate ids as needed, upload `mesh` and record the attribute
    /// layout in the vertex array. The element buffer stays attached to the
    /// array; the array buffer is unbound.
    pub fn bind(&mut self, device: &mut dyn GraphicsDevice, mesh: &mut Mesh) {
        let id = match self.id {
            Some(id) => id,
            None => {
                let id = device.gen_vertex_array();
                self.id = Some(id);
                id
            }
        };

        if !mesh.is_generated() {
            mesh.gen_buffers(device);
        }

        device.bind_vertex_array(Some(id));
        mesh.bind(device);

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let stride = XYZ_COMPONENT_COUNT * std::mem::size_of::<f32>() as i32;
        device.vertex_attrib_pointer(POSITION_ATTRIBUTE, XYZ_COMPONENT_COUNT, stride, 0);
        device.enable_vertex_attrib_array(POSITION_ATTRIBUTE);

        device.bind_buffer(BufferTarget::Array, None);
        device.bind_vertex_array(None);
        debug!("vertex array {id} bound with {} vertices", mesh.vertex_count());
    }

    /// Make this array current
    pub fn activate(&self, device: &mut dyn GraphicsDevice) {
        device.bind_vertex_array(self.id);
    }

    /// Unbind any vertex array
    pub fn deactivate(&self, device: &mut dyn GraphicsDevice) {
        device.bind_vertex_array(None);
    }

    /// Draw `shape` from the currently active array
    pub fn render(&self, device: &mut dyn GraphicsDevice, shape: &VectorShape) {
        device.draw_elements(shape.primitive_mode, shape.count, shape.offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::{DeviceCall, HeadlessDevice, PrimitiveMode};

    #[test]
    fn test_bind_records_layout() {
        let mut device = HeadlessDevice::new();
        let mut mesh = Mesh::new();
        mesh.vertices.extend_from_slice(&[0.0; 9]);
        mesh.indices.extend_from_slice(&[0, 1, 2]);

        let mut vao = Vao::new();
        vao.bind(&mut device, &mut mesh);

        assert!(mesh.is_generated());
        assert!(device.calls().contains(&DeviceCall::VertexAttribPointer {
            index: 0,
            components: 3,
            stride: 12,
            offset: 0
        }));
        assert_eq!(device.calls().last(), Some(&DeviceCall::BindVertexArray(None)));
    }

    #[test]
    fn test_rebind_reuses_ids() {
        let mut device = HeadlessDevice::new();
        let mut mesh = Mesh::new();
        let mut vao = Vao::new();
        vao.bind(&mut device, &mut mesh);
        let first = vao.id();
        vao.bind(&mut device, &mut mesh);
        assert_eq!(vao.id(), first);

        let generated = device
            .calls()
            .iter()
            .filter(|c| matches!(c, DeviceCall::GenBuffer(_) | DeviceCall::GenVertexArray(_)))
            .count();
        assert_eq!(generated, 3);
    }

    #[test]
    fn test_render_uses_byte_offset() {
        let mut device = HeadlessDevice::new();
        let vao = Vao::new();
        let mut shape = VectorShape::new("tri", PrimitiveMode::Triangles);
        shape.set_offset(6);
        shape.count = 3;

        vao.render(&mut device, &shape);
        assert_eq!(
            device.calls(),
            &[DeviceCall::DrawElements {
                mode: PrimitiveMode::Triangles,
                count: 3,
                byte_offset: 24
            }]
        );
    }
}
