//! Arena handles
//!
//! Scene graph nodes live in a slot map and refer to each other through
//! generational keys, so a key to a removed node goes stale instead of
//! dangling.

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Handle to a node stored in a [`crate::scene::SceneGraph`].
    pub struct NodeKey;
}

/// Arena of values addressed by [`NodeKey`].
pub type NodeArena<T> = SlotMap<NodeKey, T>;
