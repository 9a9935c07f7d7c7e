//! Vector shapes packed into a shared mesh
//!
//! Every shape of an atlas lives in one mesh. A shape records where its
//! indices start and how many there are, so drawing it is a single indexed
//! draw against the atlas's vertex array.

use std::collections::HashMap;

use log::debug;

use crate::foundation::math::to_radians;

use super::device::{GraphicsDevice, PrimitiveMode};
use super::mesh::Mesh;
use super::vao::Vao;
use super::RenderError;

/// Name of the unit square with its corner at the origin
pub const SQUARE: &str = "Square";

/// Name of the unit square centered on the origin
pub const CENTERED_SQUARE: &str = "CenteredSquare";

/// Name of the triangle centered on the origin
pub const CENTERED_TRIANGLE: &str = "CenteredTriangle";

/// A named run of indices in an atlas mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorShape {
    /// Shape name
    pub name: String,
    /// How the indices form primitives
    pub primitive_mode: PrimitiveMode,
    /// Number of indices
    pub count: i32,
    offset: usize,
}

impl VectorShape {
    /// Shape with no indices
    pub fn new(name: impl Into<String>, primitive_mode: PrimitiveMode) -> Self {
        Self {
            name: name.into(),
            primitive_mode,
            count: 0,
            offset: 0,
        }
    }

    /// Set the first index, stored as a byte offset into the element buffer
    pub fn set_offset(&mut self, first_index: usize) {
        self.offset = first_index * std::mem::size_of::<u32>();
    }

    /// Byte offset of the first index
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Builds a mesh one shape at a time.
///
/// Vertex indices are 0-based: [`VectorAtlas::add_vertex`] returns the index
/// of the vertex it just added.
#[derive(Debug, Default)]
pub struct VectorAtlas {
    is_static: bool,
    has_colors: bool,
    component_count: usize,
    index_count: usize,
    prev_component_count: usize,
    prev_index_count: usize,
    mesh: Mesh,
}

impl VectorAtlas {
    /// Atlas with uniform (per shape) colors
    pub fn uniform(is_static: bool) -> Self {
        Self {
            is_static,
            has_colors: false,
            ..Self::default()
        }
    }

    /// Whether the mesh is uploaded once and never changed
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether vertices carry their own colors
    pub fn has_colors(&self) -> bool {
        self.has_colors
    }

    /// Number of vertices added
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Number of indices added
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Backing mesh
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Backing mesh, mutable
    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> u32 {
        self.mesh.vertices.extend_from_slice(&[x, y, z]);
        let index = self.component_count;
        self.component_count += 1;
        u32::try_from(index).unwrap_or(u32::MAX)
    }

    /// Append an index
    pub fn add_index(&mut self, index: u32) {
        self.mesh.indices.push(index);
        self.index_count += 1;
    }

    /// Append a vertex together with an index pointing at it
    pub fn add(&mut self, x: f32, y: f32, z: f32) {
        let index = self.add_vertex(x, y, z);
        self.add_index(index);
    }

    /// [`VectorAtlas::add`] with `z = 0`
    pub fn add_2d(&mut self, x: f32, y: f32) {
        self.add(x, y, 0.0);
    }

    /// Start a shape; returns the index of its first index
    pub fn begin(&mut self) -> usize {
        self.prev_component_count = self.component_count;
        self.prev_index_count = self.index_count;
        self.prev_index_count
    }

    /// Finish a shape; returns how many indices it added
    pub fn end(&self) -> usize {
        self.index_count - self.prev_index_count
    }

    /// Vertices added since the last [`VectorAtlas::begin`]
    pub fn vertices_since_begin(&self) -> usize {
        self.component_count - self.prev_component_count
    }
}

/// Pairs an atlas with the vertex array drawing it.
#[derive(Debug, Default)]
pub struct VectorObject {
    atlas: VectorAtlas,
    vao: Vao,
}

impl VectorObject {
    /// Object over a static uniform color atlas
    pub fn new() -> Self {
        Self {
            atlas: VectorAtlas::uniform(true),
            vao: Vao::new(),
        }
    }

    /// Atlas being built
    pub fn atlas(&self) -> &VectorAtlas {
        &self.atlas
    }

    /// Atlas being built, mutable
    pub fn atlas_mut(&mut self) -> &mut VectorAtlas {
        &mut self.atlas
    }

    /// Upload the atlas mesh and set up the vertex array
    pub fn bind(&mut self, device: &mut dyn GraphicsDevice) {
        self.vao.bind(device, self.atlas.mesh_mut());
    }

    /// Make the vertex array current
    pub fn activate(&self, device: &mut dyn GraphicsDevice) {
        self.vao.activate(device);
    }

    /// Unbind the vertex array
    pub fn deactivate(&self, device: &mut dyn GraphicsDevice) {
        self.vao.deactivate(device);
    }

    /// Draw `shape` from the active vertex array
    pub fn render(&self, device: &mut dyn GraphicsDevice, shape: &VectorShape) {
        self.vao.render(device, shape);
    }
}

/// Named shapes sharing one vector object.
#[derive(Debug, Default)]
pub struct Atlas {
    shapes: HashMap<String, VectorShape>,
    object: VectorObject,
}

impl Atlas {
    /// Empty atlas
    pub fn new() -> Self {
        Self {
            shapes: HashMap::new(),
            object: VectorObject::new(),
        }
    }

    /// Register `shape` under its name, replacing any previous one
    pub fn add_shape(&mut self, shape: VectorShape) {
        self.shapes.insert(shape.name.clone(), shape);
    }

    /// Shape by name
    pub fn shape(&self, name: &str) -> Option<&VectorShape> {
        self.shapes.get(name)
    }

    /// Number of shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether no shapes are registered
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shared vector object
    pub fn object(&self) -> &VectorObject {
        &self.object
    }

    /// Shared vector object, mutable
    pub fn object_mut(&mut self) -> &mut VectorObject {
        &mut self.object
    }

    /// Build a shape: `build` adds vertices and indices to the atlas mesh and
    /// the resulting run is registered under `name`.
    pub fn build_shape(
        &mut self,
        name: &str,
        mode: PrimitiveMode,
        build: impl FnOnce(&mut VectorAtlas),
    ) -> &VectorShape {
        let atlas = self.object.atlas_mut();
        let mut shape = VectorShape::new(name, mode);
        shape.set_offset(atlas.begin());
        build(atlas);
        shape.count = i32::try_from(atlas.end()).unwrap_or(i32::MAX);

        debug!("atlas shape '{name}' with {} indices", shape.count);
        self.shapes.insert(name.to_string(), shape);
        &self.shapes[name]
    }

    /// Draw the shape called `name`
    pub fn render(&self, device: &mut dyn GraphicsDevice, name: &str) -> Result<(), RenderError> {
        let shape = self
            .shape(name)
            .ok_or_else(|| RenderError::UnknownShape(name.to_string()))?;
        self.object.render(device, shape);
        Ok(())
    }
}

/// Atlas preloaded with the basic shapes: [`SQUARE`], [`CENTERED_SQUARE`]
/// and [`CENTERED_TRIANGLE`].
#[derive(Debug)]
pub struct BasicAtlas;

impl BasicAtlas {
    /// Create an atlas holding the basic shapes
    pub fn build() -> Atlas {
        let mut atlas = Atlas::new();
        Self::populate(&mut atlas);
        atlas
    }

    /// Add the basic shapes to `atlas`
    pub fn populate(atlas: &mut Atlas) {
        // Unit local space, corner at the origin.
        atlas.build_shape(SQUARE, PrimitiveMode::Triangles, |a| {
            let v0 = a.add_vertex(0.0, 0.0, 0.0);
            let v1 = a.add_vertex(0.0, 1.0, 0.0);
            let v2 = a.add_vertex(1.0, 1.0, 0.0);
            let v3 = a.add_vertex(1.0, 0.0, 0.0);
            for i in [v0, v1, v3, v1, v2, v3] {
                a.add_index(i);
            }
        });

        atlas.build_shape(CENTERED_SQUARE, PrimitiveMode::Triangles, |a| {
            const L: f32 = 0.5;
            let v0 = a.add_vertex(L, L, 0.0);
            let v1 = a.add_vertex(L, -L, 0.0);
            let v2 = a.add_vertex(-L, -L, 0.0);
            let v3 = a.add_vertex(-L, L, 0.0);
            for i in [v0, v3, v1, v1, v3, v2] {
                a.add_index(i);
            }
        });

        atlas.build_shape(CENTERED_TRIANGLE, PrimitiveMode::Triangles, |a| {
            const L: f32 = 0.25;
            // 30 degrees gives equal sides with a rectangular bounding box.
            let h = 0.5 * to_radians(30.0).cos();
            let v0 = a.add_vertex(-L, -h, 0.0);
            let v1 = a.add_vertex(L, -h, 0.0);
            let v2 = a.add_vertex(0.0, h, 0.0);
            for i in [v0, v1, v2] {
                a.add_index(i);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::{DeviceCall, HeadlessDevice};

    #[test]
    fn test_vertex_indices_are_zero_based() {
        let mut atlas = VectorAtlas::uniform(true);
        assert_eq!(atlas.add_vertex(0.0, 0.0, 0.0), 0);
        assert_eq!(atlas.add_vertex(1.0, 0.0, 0.0), 1);
        assert_eq!(atlas.component_count(), 2);
    }

    #[test]
    fn test_begin_end_bookkeeping() {
        let mut atlas = VectorAtlas::uniform(true);
        atlas.add_2d(0.0, 0.0);
        assert_eq!(atlas.begin(), 1);
        atlas.add_2d(1.0, 1.0);
        atlas.add_2d(2.0, 2.0);
        assert_eq!(atlas.end(), 2);
        assert_eq!(atlas.vertices_since_begin(), 2);
        assert_eq!(atlas.mesh().indices, [0, 1, 2]);
    }

    #[test]
    fn test_basic_atlas_shapes() {
        let atlas = BasicAtlas::build();
        assert_eq!(atlas.len(), 3);

        let square = atlas.shape(SQUARE).unwrap();
        assert_eq!(square.count, 6);
        assert_eq!(square.offset(), 0);

        let centered = atlas.shape(CENTERED_SQUARE).unwrap();
        assert_eq!(centered.offset(), 6 * 4);

        let triangle = atlas.shape(CENTERED_TRIANGLE).unwrap();
        assert_eq!(triangle.count, 3);
        assert_eq!(triangle.offset(), 12 * 4);

        let mesh = atlas.object().atlas().mesh();
        assert_eq!(mesh.vertex_count(), 11);
        let max = mesh.indices.iter().copied().max().unwrap();
        assert!((max as usize) < mesh.vertex_count());
        assert_eq!(&mesh.indices[6..12], &[4, 7, 5, 5, 7, 6]);
    }

    #[test]
    fn test_render_unknown_shape() {
        let mut device = HeadlessDevice::new();
        let atlas = BasicAtlas::build();
        let err = atlas.render(&mut device, "Hexagon").unwrap_err();
        assert!(matches!(err, RenderError::UnknownShape(name) if name == "Hexagon"));
    }

    #[test]
    fn test_render_draws_shape_run() {
        let mut device = HeadlessDevice::new();
        let mut atlas = BasicAtlas::build();
        atlas.object_mut().bind(&mut device);
        device.clear_calls();

        atlas.object().activate(&mut device);
        atlas.render(&mut device, CENTERED_TRIANGLE).unwrap();
        assert_eq!(
            device.calls().last(),
            Some(&DeviceCall::DrawElements {
                mode: PrimitiveMode::Triangles,
                count: 3,
                byte_offset: 48
            })
        );
    }
}
