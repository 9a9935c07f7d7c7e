//! Scene graph and scene stack errors

use thiserror::Error;

use crate::foundation::collections::NodeKey;

/// Errors from graph edits and scene stack operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The scene stack already holds its maximum number of scenes
    #[error("scene stack is full (capacity {capacity})")]
    CapacityExceeded {
        /// Maximum number of stacked scenes
        capacity: usize,
    },

    /// The key does not refer to a live node
    #[error("unknown node {0:?}")]
    UnknownNode(NodeKey),

    /// Children can only be attached to group nodes
    #[error("node {0:?} is not a group")]
    NotAGroup(NodeKey),

    /// Attaching would make a node its own ancestor
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    CyclicParent {
        /// Intended parent
        parent: NodeKey,
        /// Node being attached
        child: NodeKey,
    },

    /// The operation needs an active scene
    #[error("no active scene")]
    NoActiveScene,
}
