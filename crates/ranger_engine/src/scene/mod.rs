//! Scene graph and scene management
//!
//! Nodes carry local transforms and live in a [`SceneGraph`] arena. Scenes
//! own a root group in that graph and are stacked by the [`SceneManager`],
//! which plays their enter and exit transitions and gates gameplay stepping
//! on them.

pub mod base;
pub mod error;
pub mod graph;
pub mod group;
pub mod node;
pub mod scene_manager;
pub mod transition;

pub use base::{Scene, SceneBase};
pub use error::SceneError;
pub use graph::{DrawCommand, DrawList, NodeRenderer, SceneGraph, Traversable};
pub use group::Group;
pub use node::{Node, NodeKind, NodeTransform, Transformable, Visual, NO_TAG};
pub use scene_manager::{SceneManager, SlotState, DEFAULT_MAX_SCENES};
pub use transition::{InstantTransition, SlideTransition, Transition, TransitionState};
