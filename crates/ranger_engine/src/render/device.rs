//! Graphics device abstraction
//!
//! The calls mirror the small slice of a GL style API the engine needs:
//! buffer objects, vertex arrays, shader programs, uniforms and indexed
//! draws. Ids are plain integers handed out by the device.

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::foundation::math::Mat4;

use super::color::Color;
use super::RenderError;

/// Buffer object id
pub type BufferId = u32;

/// Vertex array object id
pub type VertexArrayId = u32;

/// Compiled shader stage id
pub type ShaderId = u32;

/// Linked program id
pub type ProgramId = u32;

/// Binding point of a buffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attributes
    Array,
    /// Vertex indices
    ElementArray,
}

/// Programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// How indices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveMode {
    /// Independent triangles
    #[default]
    Triangles,
    /// Independent line segments
    Lines,
    /// Closed polyline
    LineLoop,
    /// Points
    Points,
}

/// Minimal GPU interface used by buffers, shaders and the stage.
pub trait GraphicsDevice {
    /// Allocate a buffer object id
    fn gen_buffer(&mut self) -> BufferId;

    /// Bind `id` to `target`, or unbind with `None`
    fn bind_buffer(&mut self, target: BufferTarget, id: Option<BufferId>);

    /// Upload `data` into the buffer bound to `target`
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]);

    /// Allocate a vertex array id
    fn gen_vertex_array(&mut self) -> VertexArrayId;

    /// Bind a vertex array, or unbind with `None`
    fn bind_vertex_array(&mut self, id: Option<VertexArrayId>);

    /// Describe attribute `index` of the bound array buffer
    fn vertex_attrib_pointer(&mut self, index: u32, components: i32, stride: i32, offset: usize);

    /// Enable attribute `index`
    fn enable_vertex_attrib_array(&mut self, index: u32);

    /// Compile one stage
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, RenderError>;

    /// Link a vertex and a fragment stage into a program
    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId, RenderError>;

    /// Release a compiled stage once linked
    fn delete_shader(&mut self, id: ShaderId);

    /// Make `program` current
    fn use_program(&mut self, program: ProgramId);

    /// Location of uniform `name` in `program`
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<i32>;

    /// Upload a matrix uniform
    fn uniform_matrix4(&mut self, location: i32, matrix: &Mat4);

    /// Upload an RGBA uniform
    fn uniform_color(&mut self, location: i32, color: &Color);

    /// Indexed draw from the bound vertex array
    fn draw_elements(&mut self, mode: PrimitiveMode, count: i32, byte_offset: usize);

    /// Background color used by [`GraphicsDevice::clear`]
    fn set_clear_color(&mut self, color: &Color);

    /// Clear the color buffer
    fn clear(&mut self);
}

/// One call made against a [`HeadlessDevice`].
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DeviceCall {
    GenBuffer(BufferId),
    BindBuffer(BufferTarget, Option<BufferId>),
    BufferData { target: BufferTarget, bytes: usize },
    GenVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    VertexAttribPointer { index: u32, components: i32, stride: i32, offset: usize },
    EnableVertexAttribArray(u32),
    CompileShader(ShaderStage, ShaderId),
    LinkProgram(ProgramId),
    DeleteShader(ShaderId),
    UseProgram(ProgramId),
    UniformMatrix4 { location: i32, matrix: Mat4 },
    UniformColor { location: i32, color: Color },
    DrawElements { mode: PrimitiveMode, count: i32, byte_offset: usize },
    SetClearColor(Color),
    Clear,
}

/// Device that performs no GPU work and records every call.
///
/// Stage sources containing `#error` fail to compile, so error paths can be
/// exercised without a driver.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    calls: Vec<DeviceCall>,
    next_id: u32,
    uniforms: HashMap<(ProgramId, String), i32>,
}

impl HeadlessDevice {
    /// Create an empty device
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Forget recorded calls; ids keep increasing
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of draw calls recorded
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::DrawElements { .. }))
            .count()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn gen_buffer(&mut self) -> BufferId {
        let id = self.next();
        self.calls.push(DeviceCall::GenBuffer(id));
        id
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: Option<BufferId>) {
        self.calls.push(DeviceCall::BindBuffer(target, id));
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        trace!("headless upload of {} bytes to {:?}", data.len(), target);
        self.calls.push(DeviceCall::BufferData {
            target,
            bytes: data.len(),
        });
    }

    fn gen_vertex_array(&mut self) -> VertexArrayId {
        let id = self.next();
        self.calls.push(DeviceCall::GenVertexArray(id));
        id
    }

    fn bind_vertex_array(&mut self, id: Option<VertexArrayId>) {
        self.calls.push(DeviceCall::BindVertexArray(id));
    }

    fn vertex_attrib_pointer(&mut self, index: u32, components: i32, stride: i32, offset: usize) {
        self.calls.push(DeviceCall::VertexAttribPointer {
            index,
            components,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.calls.push(DeviceCall::EnableVertexAttribArray(index));
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, RenderError> {
        if let Some(line) = source.lines().find(|l| l.trim_start().starts_with("#error")) {
            return Err(RenderError::ShaderCompile {
                stage,
                log: line.trim().to_string(),
            });
        }

        let id = self.next();
        self.calls.push(DeviceCall::CompileShader(stage, id));
        Ok(id)
    }

    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId, RenderError> {
        if vertex == fragment {
            return Err(RenderError::ShaderLink(format!(
                "stage {vertex} attached twice"
            )));
        }

        let id = self.next();
        debug!("headless program {id} linked from {vertex} and {fragment}");
        self.calls.push(DeviceCall::LinkProgram(id));
        Ok(id)
    }

    fn delete_shader(&mut self, id: ShaderId) {
        self.calls.push(DeviceCall::DeleteShader(id));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(DeviceCall::UseProgram(program));
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<i32> {
        let next = i32::try_from(self.uniforms.len()).ok()?;
        Some(*self.uniforms.entry((program, name.to_string())).or_insert(next))
    }

    fn uniform_matrix4(&mut self, location: i32, matrix: &Mat4) {
        self.calls.push(DeviceCall::UniformMatrix4 {
            location,
            matrix: *matrix,
        });
    }

    fn uniform_color(&mut self, location: i32, color: &Color) {
        self.calls.push(DeviceCall::UniformColor {
            location,
            color: *color,
        });
    }

    fn draw_elements(&mut self, mode: PrimitiveMode, count: i32, byte_offset: usize) {
        self.calls.push(DeviceCall::DrawElements {
            mode,
            count,
            byte_offset,
        });
    }

    fn set_clear_color(&mut self, color: &Color) {
        self.calls.push(DeviceCall::SetClearColor(*color));
    }

    fn clear(&mut self) {
        self.calls.push(DeviceCall::Clear);
    }
}
