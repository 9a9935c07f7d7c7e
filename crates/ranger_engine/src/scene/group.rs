//! Group payload of container nodes

use crate::foundation::collections::{NodeArena, NodeKey};

use super::node::Node;

/// Value of [`Group::highest_z_order`] while the group has no children.
pub const EMPTY_HIGHEST_Z_ORDER: i32 = 10_000_000;

/// Ordered children of a container node plus the hints that decide whether
/// traversal needs to sort them by z-order.
#[derive(Debug, Clone)]
pub struct Group {
    children: Vec<NodeKey>,
    highest_z_order: i32,
    has_negative_z_orders: bool,
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    /// Empty group
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            highest_z_order: EMPTY_HIGHEST_Z_ORDER,
            has_negative_z_orders: false,
        }
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the group has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Highest z-order among the children
    pub fn highest_z_order(&self) -> i32 {
        self.highest_z_order
    }

    /// Whether any child has a negative z-order
    pub fn has_negative_z_orders(&self) -> bool {
        self.has_negative_z_orders
    }

    pub(crate) fn push_child(&mut self, key: NodeKey, z_order: i32) {
        if self.children.is_empty() {
            self.highest_z_order = z_order;
        } else {
            self.highest_z_order = self.highest_z_order.max(z_order);
        }
        self.has_negative_z_orders |= z_order < 0;
        self.children.push(key);
    }

    pub(crate) fn remove_child(&mut self, key: NodeKey) -> bool {
        let Some(index) = self.children.iter().position(|k| *k == key) else {
            return false;
        };
        self.children.remove(index);
        true
    }

    /// Recompute both hints from the children's current z-orders.
    pub(crate) fn refresh_hints(&mut self, nodes: &NodeArena<Node>) {
        let z_orders = self.children.iter().filter_map(|k| nodes.get(*k)).map(Node::z_order);

        self.highest_z_order = EMPTY_HIGHEST_Z_ORDER;
        self.has_negative_z_orders = false;
        for (i, z) in z_orders.enumerate() {
            self.highest_z_order = if i == 0 { z } else { self.highest_z_order.max(z) };
            self.has_negative_z_orders |= z < 0;
        }
    }

    /// Whether children must be sorted before they are drawn. All children at
    /// z-order zero keep insertion order without sorting.
    pub fn needs_sort(&self) -> bool {
        !self.children.is_empty() && (self.has_negative_z_orders || self.highest_z_order > 0)
    }

    /// Children in draw order: ascending z-order, ties broken by insertion
    /// order.
    pub fn draw_order(&self, nodes: &NodeArena<Node>) -> Vec<NodeKey> {
        let mut order = self.children.clone();
        if self.needs_sort() {
            order.sort_by_key(|k| nodes.get(*k).map_or(0, Node::z_order));
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with(z_orders: &[i32]) -> (NodeArena<Node>, Group) {
        let mut nodes = NodeArena::with_key();
        let mut group = Group::new();
        for (i, z) in z_orders.iter().enumerate() {
            let key = nodes.insert(Node::leaf(format!("n{i}")).with_z_order(*z));
            group.push_child(key, *z);
        }
        (nodes, group)
    }

    #[test]
    fn test_empty_group_uses_sentinel() {
        let group = Group::new();
        assert_eq!(group.highest_z_order(), EMPTY_HIGHEST_Z_ORDER);
        assert!(!group.has_negative_z_orders());
        assert!(!group.needs_sort());
    }

    #[test]
    fn test_hints_track_children() {
        let (_, group) = arena_with(&[3, -2, 1]);
        assert_eq!(group.highest_z_order(), 3);
        assert!(group.has_negative_z_orders());
        assert!(group.needs_sort());
    }

    #[test]
    fn test_zero_z_orders_keep_insertion_order() {
        let (nodes, group) = arena_with(&[0, 0, 0]);
        assert!(!group.needs_sort());
        assert_eq!(group.draw_order(&nodes), group.children());
    }

    #[test]
    fn test_draw_order_is_stable_ascending() {
        let (nodes, group) = arena_with(&[2, -1, 2, 0]);
        let order = group.draw_order(&nodes);
        let c = group.children();
        assert_eq!(order, vec![c[1], c[3], c[0], c[2]]);
    }

    #[test]
    fn test_refresh_after_removal() {
        let (nodes, mut group) = arena_with(&[5, -1]);
        let negative = group.children()[1];
        assert!(group.remove_child(negative));
        assert!(!group.remove_child(negative));

        group.refresh_hints(&nodes);
        assert_eq!(group.highest_z_order(), 5);
        assert!(!group.has_negative_z_orders());

        let first = group.children()[0];
        group.remove_child(first);
        group.refresh_hints(&nodes);
        assert_eq!(group.highest_z_order(), EMPTY_HIGHEST_Z_ORDER);
    }
}
