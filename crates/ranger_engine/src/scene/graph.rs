//! Scene graph arena
//!
//! Every node lives in one [`SceneGraph`]. Parent and child links are
//! [`NodeKey`]s into the arena, so the tree can be walked downward for
//! drawing and upward for world transforms without shared ownership.

use crate::foundation::collections::{NodeArena, NodeKey};
use crate::foundation::math::{Mat4, Mat4Ext};
use crate::render::RenderError;

use super::error::SceneError;
use super::node::{Node, NodeKind, Transformable};

/// One node to draw, with its resolved world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Node to draw
    pub node: NodeKey,
    /// Parent world transform composed with the node's local transform
    pub world: Mat4,
    /// Distance from the traversal root
    pub depth: usize,
}

/// Draw commands in painter's order.
pub type DrawList = Vec<DrawCommand>;

/// Receives visible nodes during the draw pass.
pub trait NodeRenderer {
    /// Draw `node` with its world transform
    fn render(&mut self, node: &Node, world: &Mat4) -> Result<(), RenderError>;
}

/// Something that can be walked into a draw list and drawn.
pub trait Traversable {
    /// Walk the subtree at `root` in draw order, appending every visible node
    /// to `out`. Invisible subtrees are skipped entirely.
    fn visit(&mut self, root: NodeKey, parent_world: &Mat4, out: &mut DrawList) -> Result<(), SceneError>;

    /// Hand each command of `draws` to `renderer`.
    fn render(&self, draws: &DrawList, renderer: &mut dyn NodeRenderer) -> Result<(), RenderError>;
}

/// Arena owning every node of every scene.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: NodeArena<Node>,
}

impl SceneGraph {
    /// Empty graph
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::with_key(),
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `key` refers to a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Insert a detached node
    pub fn insert(&mut self, mut node: Node) -> NodeKey {
        node.parent = None;
        self.nodes.insert(node)
    }

    /// Insert a detached, empty group
    pub fn create_group(&mut self, name: impl Into<String>) -> NodeKey {
        self.insert(Node::group(name))
    }

    /// Insert a detached leaf that draws nothing
    pub fn create_leaf(&mut self, name: impl Into<String>) -> NodeKey {
        self.insert(Node::leaf(name))
    }

    /// Insert `node` and attach it under `parent`.
    pub fn spawn_child(&mut self, parent: NodeKey, node: Node) -> Result<NodeKey, SceneError> {
        let key = self.insert(node);
        if let Err(e) = self.add_child(parent, key) {
            self.nodes.remove(key);
            return Err(e);
        }
        Ok(key)
    }

    /// Node by key
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutable node by key
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Node by key, or [`SceneError::UnknownNode`]
    pub fn try_node(&self, key: NodeKey) -> Result<&Node, SceneError> {
        self.nodes.get(key).ok_or(SceneError::UnknownNode(key))
    }

    /// Mutable node by key, or [`SceneError::UnknownNode`]
    pub fn try_node_mut(&mut self, key: NodeKey) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(key).ok_or(SceneError::UnknownNode(key))
    }

    /// Parent of `key`, `None` for roots and unknown keys
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(Node::parent)
    }

    /// Children of `key` in insertion order; empty for leaves
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key)
            .and_then(Node::as_group)
            .map_or(&[][..], |g| g.children())
    }

    /// Whether `ancestor` appears on the parent chain of `key`, or is `key`.
    pub fn is_ancestor(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut cursor = Some(key);
        while let Some(k) = cursor {
            if k == ancestor {
                return true;
            }
            cursor = self.parent(k);
        }
        false
    }

    /// Attach `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        self.try_node(child)?;
        if !self.try_node(parent)?.is_group() {
            return Err(SceneError::NotAGroup(parent));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::CyclicParent { parent, child });
        }

        self.detach(child)?;

        let z_order = self.nodes[child].z_order;
        if let NodeKind::Group(group) = &mut self.nodes[parent].kind {
            group.push_child(child, z_order);
        }
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Move `child` under `new_parent`.
    pub fn reparent(&mut self, child: NodeKey, new_parent: NodeKey) -> Result<(), SceneError> {
        self.add_child(new_parent, child)
    }

    /// Unlink `child` from its parent, leaving it in the arena as a root.
    pub fn detach(&mut self, child: NodeKey) -> Result<(), SceneError> {
        let Some(parent) = self.try_node(child)?.parent else {
            return Ok(());
        };

        if let Some(node) = self.nodes.get_mut(parent) {
            if let NodeKind::Group(group) = &mut node.kind {
                group.remove_child(child);
            }
        }
        self.refresh_group_hints(parent);
        self.nodes[child].parent = None;
        Ok(())
    }

    /// Remove `key` and its whole subtree. Returns the number of nodes removed.
    pub fn remove(&mut self, key: NodeKey) -> Result<usize, SceneError> {
        self.detach(key)?;

        let mut removed = 0;
        let mut pending = vec![key];
        while let Some(k) = pending.pop() {
            if let Some(node) = self.nodes.remove(k) {
                if let NodeKind::Group(group) = node.kind {
                    pending.extend_from_slice(group.children());
                }
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Change a node's draw order and update its parent's sort hints.
    pub fn set_z_order(&mut self, key: NodeKey, z_order: i32) -> Result<(), SceneError> {
        let node = self.try_node_mut(key)?;
        node.z_order = z_order;
        if let Some(parent) = node.parent {
            self.refresh_group_hints(parent);
        }
        Ok(())
    }

    fn refresh_group_hints(&mut self, group_key: NodeKey) {
        // Take the group out so the arena can be read while it is updated.
        let Some(NodeKind::Group(group)) = self.nodes.get_mut(group_key).map(|n| &mut n.kind) else {
            return;
        };
        let mut group = std::mem::take(group);
        group.refresh_hints(&self.nodes);
        self.nodes[group_key].kind = NodeKind::Group(group);
    }

    /// Local transform of `key`, rebuilt if dirty
    pub fn calc_transform(&mut self, key: NodeKey) -> Result<Mat4, SceneError> {
        Ok(*self.try_node_mut(key)?.transform_mut().calc_transform())
    }

    /// Map `key`'s space to the space of `relative_root`'s parent, or to
    /// world space when `relative_root` is `None` or not an ancestor.
    ///
    /// Starts from the node's own local matrix and post-multiplies each
    /// ancestor's local matrix walking upward, stopping after
    /// `relative_root` has been applied.
    pub fn node_to_world_transform(
        &mut self,
        key: NodeKey,
        relative_root: Option<NodeKey>,
    ) -> Result<Mat4, SceneError> {
        let mut world = self.calc_transform(key)?;

        let mut cursor = self.parent(key);
        while let Some(parent) = cursor {
            let parent_t = self.calc_transform(parent)?;
            world.post_multiply(&parent_t);

            if Some(parent) == relative_root {
                break;
            }
            cursor = self.parent(parent);
        }

        Ok(world)
    }

    /// First node in the subtree at `root`, preorder, whose tag is `tag`
    pub fn find_by_tag(&self, root: NodeKey, tag: i32) -> Option<NodeKey> {
        self.find(root, &|n| n.tag == tag)
    }

    /// First node in the subtree at `root`, preorder, named `name`
    pub fn find_by_name(&self, root: NodeKey, name: &str) -> Option<NodeKey> {
        self.find(root, &|n| n.name == name)
    }

    fn find(&self, root: NodeKey, pred: &dyn Fn(&Node) -> bool) -> Option<NodeKey> {
        let node = self.nodes.get(root)?;
        if pred(node) {
            return Some(root);
        }
        self.children(root).iter().find_map(|c| self.find(*c, pred))
    }

    fn visit_node(
        &mut self,
        key: NodeKey,
        parent_world: &Mat4,
        depth: usize,
        out: &mut DrawList,
    ) -> Result<(), SceneError> {
        let node = self.try_node_mut(key)?;
        if !node.visible {
            return Ok(());
        }

        let mut world = *node.transform_mut().calc_transform();
        world.post_multiply(parent_world);
        out.push(DrawCommand { node: key, world, depth });

        let order = match &self.nodes[key].kind {
            NodeKind::Group(group) => group.draw_order(&self.nodes),
            NodeKind::Leaf(_) => return Ok(()),
        };

        for child in order {
            self.visit_node(child, &world, depth + 1, out)?;
        }
        Ok(())
    }
}

impl Traversable for SceneGraph {
    fn visit(&mut self, root: NodeKey, parent_world: &Mat4, out: &mut DrawList) -> Result<(), SceneError> {
        self.visit_node(root, parent_world, 0, out)
    }

    fn render(&self, draws: &DrawList, renderer: &mut dyn NodeRenderer) -> Result<(), RenderError> {
        for cmd in draws {
            // Nodes removed after the visit are skipped.
            if let Some(node) = self.nodes.get(cmd.node) {
                renderer.render(node, &cmd.world)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn names(graph: &SceneGraph, draws: &DrawList) -> Vec<String> {
        draws
            .iter()
            .map(|d| graph.node(d.node).map(|n| n.name.clone()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_world_transform_two_levels() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert(Node::group("parent").at(0.0, 1.0));
        let child = graph.spawn_child(parent, Node::leaf("child").at(1.0, 0.0)).unwrap();

        let world = graph.node_to_world_transform(child, None).unwrap();
        assert_relative_eq!(world.get_translation(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_world_transform_stops_at_relative_root() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Node::group("root").at(100.0, 0.0));
        let mid = graph.spawn_child(root, Node::group("mid").at(0.0, 10.0)).unwrap();
        let leaf = graph.spawn_child(mid, Node::leaf("leaf").at(1.0, 0.0)).unwrap();

        let relative = graph.node_to_world_transform(leaf, Some(mid)).unwrap();
        assert_relative_eq!(relative.get_translation(), Vec3::new(1.0, 10.0, 0.0));

        let world = graph.node_to_world_transform(leaf, None).unwrap();
        assert_relative_eq!(world.get_translation(), Vec3::new(101.0, 10.0, 0.0));
    }

    #[test]
    fn test_parent_rotation_applies_after_child_translation() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_group("parent");
        graph
            .node_mut(parent)
            .unwrap()
            .transform_mut()
            .set_rotation_degrees(90.0);
        let child = graph.spawn_child(parent, Node::leaf("child").at(1.0, 0.0)).unwrap();

        let world = graph.node_to_world_transform(child, None).unwrap();
        assert_relative_eq!(world.get_translation(), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_add_child_errors() {
        let mut graph = SceneGraph::new();
        let group = graph.create_group("g");
        let leaf = graph.create_leaf("l");
        let other = graph.create_leaf("o");

        assert_eq!(graph.add_child(leaf, other), Err(SceneError::NotAGroup(leaf)));
        assert_eq!(
            graph.add_child(group, group),
            Err(SceneError::CyclicParent { parent: group, child: group })
        );

        graph.remove(other).unwrap();
        assert_eq!(graph.add_child(group, other), Err(SceneError::UnknownNode(other)));
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.create_group("a");
        let b = graph.spawn_child(a, Node::group("b")).unwrap();
        let c = graph.spawn_child(b, Node::group("c")).unwrap();

        assert_eq!(
            graph.reparent(a, c),
            Err(SceneError::CyclicParent { parent: c, child: a })
        );

        graph.reparent(c, a).unwrap();
        assert_eq!(graph.parent(c), Some(a));
        assert_eq!(graph.children(a), &[b, c]);
        assert!(graph.children(b).is_empty());
    }

    #[test]
    fn test_remove_takes_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root");
        let g = graph.spawn_child(root, Node::group("g")).unwrap();
        let l1 = graph.spawn_child(g, Node::leaf("l1")).unwrap();
        graph.spawn_child(g, Node::leaf("l2")).unwrap();

        assert_eq!(graph.remove(g).unwrap(), 3);
        assert_eq!(graph.len(), 1);
        assert!(!graph.contains(l1));
        assert!(graph.children(root).is_empty());
    }

    #[test]
    fn test_visit_preorder_and_z_order() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root");
        let front = graph.spawn_child(root, Node::group("front").with_z_order(1)).unwrap();
        graph.spawn_child(front, Node::leaf("front.leaf")).unwrap();
        graph.spawn_child(root, Node::leaf("middle")).unwrap();
        graph.spawn_child(root, Node::leaf("back").with_z_order(-1)).unwrap();

        let mut draws = DrawList::new();
        graph.visit(root, &Mat4::identity(), &mut draws).unwrap();

        assert_eq!(names(&graph, &draws), ["root", "back", "middle", "front", "front.leaf"]);
        assert_eq!(draws[4].depth, 2);
    }

    #[test]
    fn test_visit_skips_invisible_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root");
        let hidden = graph.spawn_child(root, Node::group("hidden")).unwrap();
        graph.spawn_child(hidden, Node::leaf("inner")).unwrap();
        graph.spawn_child(root, Node::leaf("shown")).unwrap();
        graph.node_mut(hidden).unwrap().visible = false;

        let mut draws = DrawList::new();
        graph.visit(root, &Mat4::identity(), &mut draws).unwrap();
        assert_eq!(names(&graph, &draws), ["root", "shown"]);
    }

    #[test]
    fn test_set_z_order_resorts_siblings() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root");
        let a = graph.spawn_child(root, Node::leaf("a")).unwrap();
        graph.spawn_child(root, Node::leaf("b")).unwrap();

        graph.set_z_order(a, 5).unwrap();
        let mut draws = DrawList::new();
        graph.visit(root, &Mat4::identity(), &mut draws).unwrap();
        assert_eq!(names(&graph, &draws), ["root", "b", "a"]);

        let hints = graph.node(root).and_then(Node::as_group).unwrap();
        assert_eq!(hints.highest_z_order(), 5);
    }

    #[test]
    fn test_visit_composes_parent_world() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Node::group("root").at(10.0, 0.0));
        graph.spawn_child(root, Node::leaf("leaf").at(0.0, 5.0)).unwrap();

        let offset = Mat4::new_translation(&Vec3::new(0.0, 0.0, -1.0));
        let mut draws = DrawList::new();
        graph.visit(root, &offset, &mut draws).unwrap();
        assert_relative_eq!(draws[1].world.get_translation(), Vec3::new(10.0, 5.0, -1.0));
    }

    #[test]
    fn test_find_by_tag_and_name() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root");
        let g = graph.spawn_child(root, Node::group("g")).unwrap();
        let tagged = graph.spawn_child(g, Node::leaf("ship").with_tag(7)).unwrap();

        assert_eq!(graph.find_by_tag(root, 7), Some(tagged));
        assert_eq!(graph.find_by_name(root, "ship"), Some(tagged));
        assert_eq!(graph.find_by_tag(root, 8), None);
    }

    struct Recorder(Vec<String>);

    impl NodeRenderer for Recorder {
        fn render(&mut self, node: &Node, _world: &Mat4) -> Result<(), RenderError> {
            self.0.push(node.name.clone());
            Ok(())
        }
    }

    #[test]
    fn test_render_walks_draw_list() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root");
        let gone = graph.spawn_child(root, Node::leaf("gone")).unwrap();
        graph.spawn_child(root, Node::leaf("kept")).unwrap();

        let mut draws = DrawList::new();
        graph.visit(root, &Mat4::identity(), &mut draws).unwrap();
        graph.remove(gone).unwrap();

        let mut recorder = Recorder(Vec::new());
        graph.render(&draws, &mut recorder).unwrap();
        assert_eq!(recorder.0, ["root", "kept"]);
    }
}
