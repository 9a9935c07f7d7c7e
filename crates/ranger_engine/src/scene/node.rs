//! Scene graph nodes
//!
//! A [`Node`] is the base transform unit of the graph. Its local transform is
//! described by discrete properties (position, rotation about Z, scale) and
//! cached as a matrix that is rebuilt lazily, only when a property changed
//! since the last read.

use bitflags::bitflags;

use crate::foundation::collections::NodeKey;
use crate::foundation::math::{to_radians, Mat4, Mat4Ext, Vec3};
use crate::render::color::Color;

use super::group::Group;

/// Tag value of nodes that were never tagged.
pub const NO_TAG: i32 = -1;

bitflags! {
    /// Cache state of a [`NodeTransform`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TransformFlags: u8 {
        /// Cached local matrix is stale
        const DIRTY = 0b0001;
        /// Cached inverse matrix is stale
        const INVERSE_DIRTY = 0b0010;
        /// The matrix is supplied from outside; dirty tracking is bypassed
        const MANAGED = 0b0100;
    }
}

/// Position, rotation and scale of anything placed in the scene graph.
///
/// Implementors only provide the core accessors; the convenience mutators
/// are defined in terms of them, so every path that changes a property also
/// marks the transform dirty.
pub trait Transformable {
    /// Local position
    fn position(&self) -> Vec3;

    /// Set all three position components
    fn set_position(&mut self, x: f32, y: f32, z: f32);

    /// Rotation about Z in radians
    fn rotation(&self) -> f32;

    /// Set rotation in radians
    fn set_rotation(&mut self, angle: f32);

    /// Scale factors
    fn scale(&self) -> Vec3;

    /// Set the scale factors
    fn set_scale(&mut self, scale: Vec3);

    /// Invalidate the cached matrices. No-op for managed transforms.
    fn set_dirty(&mut self);

    /// Whether the cached local matrix is stale
    fn is_dirty(&self) -> bool;

    /// Rebuild the local matrix if stale and return it.
    fn calc_transform(&mut self) -> &Mat4;

    /// Set x and y, keeping z
    fn set_position_2d(&mut self, x: f32, y: f32) {
        let z = self.position().z;
        self.set_position(x, y, z);
    }

    /// Set position from a vector
    fn set_position_vec(&mut self, v: &Vec3) {
        self.set_position(v.x, v.y, v.z);
    }

    /// Translate by `v`
    fn move_by(&mut self, v: &Vec3) {
        let p = self.position() + v;
        self.set_position(p.x, p.y, p.z);
    }

    /// Translate by `x, y`
    fn move_by_2d(&mut self, x: f32, y: f32) {
        self.move_by(&Vec3::new(x, y, 0.0));
    }

    /// Add `angle` radians to the rotation
    fn rotate_by(&mut self, angle: f32) {
        let r = self.rotation() + angle;
        self.set_rotation(r);
    }

    /// Set the rotation from degrees
    fn set_rotation_degrees(&mut self, degrees: f32) {
        self.set_rotation(to_radians(degrees));
    }

    /// Multiply every scale component by `s`
    fn scale_by(&mut self, s: f32) {
        let scale = self.scale() * s;
        self.set_scale(scale);
    }

    /// Multiply the x and y scale components
    fn scale_by_2d(&mut self, sx: f32, sy: f32) {
        let s = self.scale();
        self.set_scale(Vec3::new(s.x * sx, s.y * sy, s.z));
    }
}

/// Local TRS state with a lazily rebuilt matrix cache.
#[derive(Debug, Clone)]
pub struct NodeTransform {
    position: Vec3,
    rotation: f32,
    scale: Vec3,
    flags: TransformFlags,
    transform: Mat4,
    inverse: Mat4,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: 0.0,
            scale: Vec3::new(1.0, 1.0, 1.0),
            flags: TransformFlags::DIRTY | TransformFlags::INVERSE_DIRTY,
            transform: Mat4::identity(),
            inverse: Mat4::identity(),
        }
    }
}

impl NodeTransform {
    /// Fresh, dirty transform at the origin with unit scale
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cache flags
    pub fn flags(&self) -> TransformFlags {
        self.flags
    }

    /// Whether the cached inverse is stale
    pub fn is_inverse_dirty(&self) -> bool {
        self.flags.contains(TransformFlags::INVERSE_DIRTY)
    }

    /// Whether the matrix is supplied externally
    pub fn is_managed(&self) -> bool {
        self.flags.contains(TransformFlags::MANAGED)
    }

    /// Switch external management on or off. Turning it off marks the cache
    /// dirty so the properties take over again on the next read.
    pub fn set_managed(&mut self, managed: bool) {
        self.flags.set(TransformFlags::MANAGED, managed);
        if !managed {
            self.set_dirty();
        }
    }

    /// Install an externally computed matrix. Only meaningful for managed
    /// transforms; the inverse is invalidated either way.
    pub fn set_managed_matrix(&mut self, matrix: &Mat4) {
        self.transform.set_from(matrix);
        self.flags.insert(TransformFlags::INVERSE_DIRTY);
    }

    /// Cached matrix as last computed, without rebuilding it.
    pub fn cached(&self) -> &Mat4 {
        &self.transform
    }

    /// Inverse of the local matrix, recomputed only when stale. `None` when
    /// the matrix is singular (for example a zero scale).
    pub fn inverse_transform(&mut self) -> Option<&Mat4> {
        if self.is_inverse_dirty() || self.is_dirty() {
            let local = *self.calc_transform();
            self.inverse = local.try_inverse()?;
            self.flags.remove(TransformFlags::INVERSE_DIRTY);
        }
        Some(&self.inverse)
    }
}

impl Transformable for NodeTransform {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
        self.set_dirty();
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn set_rotation(&mut self, angle: f32) {
        self.rotation = angle;
        self.set_dirty();
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.set_dirty();
    }

    fn set_dirty(&mut self) {
        if self.is_managed() {
            return;
        }
        self.flags.insert(TransformFlags::DIRTY | TransformFlags::INVERSE_DIRTY);
    }

    fn is_dirty(&self) -> bool {
        self.flags.contains(TransformFlags::DIRTY)
    }

    #[allow(clippy::float_cmp)]
    fn calc_transform(&mut self) -> &Mat4 {
        if self.is_dirty() && !self.is_managed() {
            self.transform.set_translate_vec(&self.position);

            // Scale is composed before rotate so that, applied to a vector,
            // rotation happens first, then scale, then translation.
            if self.scale.x != 1.0 || self.scale.y != 1.0 {
                self.transform.scale_by(&self.scale);
            }

            if self.rotation != 0.0 {
                self.transform.rotate_by(self.rotation);
            }

            self.flags.remove(TransformFlags::DIRTY);
        }

        &self.transform
    }
}

/// What a leaf node draws: a named atlas shape in a uniform color.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    /// Shape name in the vector atlas
    pub shape: String,
    /// Fill color
    pub color: Color,
}

impl Visual {
    /// Create a visual for `shape`
    pub fn new(shape: impl Into<String>, color: Color) -> Self {
        Self {
            shape: shape.into(),
            color,
        }
    }
}

/// Variant of a node: traversal is dispatched on this tag.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Leaf, optionally carrying something to draw
    Leaf(Option<Visual>),
    /// Container owning an ordered list of children
    Group(Group),
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Display name, not required to be unique
    pub name: String,
    /// User assigned identifier for lookups, [`NO_TAG`] by default
    pub tag: i32,
    /// Invisible nodes and their subtrees are skipped by traversal
    pub visible: bool,
    pub(crate) z_order: i32,
    pub(crate) parent: Option<NodeKey>,
    transform: NodeTransform,
    pub(crate) kind: NodeKind,
}

impl Node {
    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            tag: NO_TAG,
            visible: true,
            z_order: 0,
            parent: None,
            transform: NodeTransform::new(),
            kind,
        }
    }

    /// Leaf that draws nothing
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Leaf(None))
    }

    /// Leaf drawing `visual`
    pub fn shape(name: impl Into<String>, visual: Visual) -> Self {
        Self::with_kind(name, NodeKind::Leaf(Some(visual)))
    }

    /// Empty group
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group(Group::new()))
    }

    /// Builder: set the tag
    #[must_use]
    pub fn with_tag(mut self, tag: i32) -> Self {
        self.tag = tag;
        self
    }

    /// Builder: set the position
    #[must_use]
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.transform.set_position_2d(x, y);
        self
    }

    /// Builder: set the draw order among siblings. Only honored when set
    /// before the node is attached; afterwards use
    /// [`super::SceneGraph::set_z_order`].
    #[must_use]
    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    /// Parent back-link, `None` for roots
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Draw order among siblings; lower values draw first (behind)
    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    /// Local transform
    pub fn transform(&self) -> &NodeTransform {
        &self.transform
    }

    /// Local transform, for mutation through [`Transformable`]
    pub fn transform_mut(&mut self) -> &mut NodeTransform {
        &mut self.transform
    }

    /// Node variant
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Group payload, if this node is a group
    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            NodeKind::Leaf(_) => None,
        }
    }

    /// What this node draws, if anything
    pub fn visual(&self) -> Option<&Visual> {
        match &self.kind {
            NodeKind::Leaf(visual) => visual.as_ref(),
            NodeKind::Group(_) => None,
        }
    }

    /// Whether this node is a group
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }
}
