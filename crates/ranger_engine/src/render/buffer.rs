//! Vertex and element buffer objects

use std::marker::PhantomData;

use bytemuck::Pod;
use log::trace;

use super::device::{BufferId, BufferTarget, GraphicsDevice};

/// A device buffer holding elements of `T`.
///
/// An id must be generated with [`BufferObject::gen_buffer`] before the
/// buffer can be bound; binding without one is a programming error and
/// panics.
#[derive(Debug)]
pub struct BufferObject<T: Pod> {
    target: BufferTarget,
    id: Option<BufferId>,
    _marker: PhantomData<T>,
}

/// Vertex buffer object: packed `x, y, z` floats
pub type Vbo = BufferObject<f32>;

/// Element buffer object: vertex indices
pub type Ebo = BufferObject<u32>;

impl Default for Vbo {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Ebo {
    fn default() -> Self {
        Self::new()
    }
}

impl Vbo {
    /// Vertex buffer without an id
    pub fn new() -> Self {
        Self::with_target(BufferTarget::Array)
    }
}

impl Ebo {
    /// Element buffer without an id
    pub fn new() -> Self {
        Self::with_target(BufferTarget::ElementArray)
    }
}

impl<T: Pod> BufferObject<T> {
    fn with_target(target: BufferTarget) -> Self {
        Self {
            target,
            id: None,
            _marker: PhantomData,
        }
    }

    /// Binding point
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// Device id, once generated
    pub fn id(&self) -> Option<BufferId> {
        self.id
    }

    /// Whether [`BufferObject::gen_buffer`] has run
    pub fn is_generated(&self) -> bool {
        self.id.is_some()
    }

    /// Allocate the device id. Call this before [`BufferObject::bind`].
    pub fn gen_buffer(&mut self, device: &mut dyn GraphicsDevice) {
        let id = device.gen_buffer();
        trace!("generated {:?} buffer {id}", self.target);
        self.id = Some(id);
    }

    /// Bind the buffer and upload `data`.
    ///
    /// # Panics
    ///
    /// If no id was generated yet.
    pub fn bind(&self, device: &mut dyn GraphicsDevice, data: &[T]) {
        let Some(id) = self.id else {
            panic!(
                "{:?} buffer id has not been generated; call gen_buffer first",
                self.target
            );
        };

        device.bind_buffer(self.target, Some(id));
        device.buffer_data(self.target, bytemuck::cast_slice(data));
    }
}
