//! Scenes: the unit the scene manager stacks and transitions between

use crate::foundation::collections::NodeKey;

use super::graph::SceneGraph;
use super::transition::{InstantTransition, Transition};

/// State shared by every scene: a name, the root group of its subtree and
/// the alive flag.
#[derive(Debug, Clone)]
pub struct SceneBase {
    name: String,
    root: NodeKey,
    alive: bool,
}

impl SceneBase {
    /// Create a scene whose root is a fresh group in `graph`
    pub fn new(graph: &mut SceneGraph, name: impl Into<String>) -> Self {
        let name = name.into();
        let root = graph.create_group(name.clone());
        Self {
            name,
            root,
            alive: false,
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root group of the scene's subtree
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Whether the scene is on stage
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark the scene as on or off stage
    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }
}

/// A stackable scene.
///
/// Implementors embed a [`SceneBase`] and override [`Scene::step`] with
/// their gameplay. Transitions default to [`InstantTransition`].
pub trait Scene {
    /// Shared scene state
    fn base(&self) -> &SceneBase;

    /// Shared scene state, mutable
    fn base_mut(&mut self) -> &mut SceneBase;

    /// Per-frame gameplay update. Only called while no transition runs.
    fn step(&mut self, dt: f32, graph: &mut SceneGraph);

    /// Transition played when this scene becomes active
    fn in_transition(&mut self) -> Box<dyn Transition> {
        Box::new(InstantTransition::new())
    }

    /// Transition played when this scene leaves the stage
    fn out_transition(&mut self) -> Box<dyn Transition> {
        Box::new(InstantTransition::new())
    }

    /// Called when the scene becomes active, before its in-transition starts
    fn enter(&mut self, _graph: &mut SceneGraph) {}

    /// Called once the scene's out-transition has finished, just before its
    /// subtree is removed from the graph
    fn exit(&mut self, _graph: &mut SceneGraph) {}

    /// Scene name
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Root group of the scene's subtree
    fn root(&self) -> NodeKey {
        self.base().root()
    }

    /// Whether the scene is on stage
    fn is_alive(&self) -> bool {
        self.base().is_alive()
    }

    /// Mark the scene as on or off stage
    fn set_alive(&mut self, alive: bool) {
        self.base_mut().set_alive(alive);
    }
}

impl Scene for SceneBase {
    fn base(&self) -> &SceneBase {
        self
    }

    fn base_mut(&mut self) -> &mut SceneBase {
        self
    }

    fn step(&mut self, _dt: f32, _graph: &mut SceneGraph) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::transition::TransitionState;

    #[test]
    fn test_new_scene_owns_root_group() {
        let mut graph = SceneGraph::new();
        let scene = SceneBase::new(&mut graph, "menu");

        let root = graph.node(scene.root()).unwrap();
        assert!(root.is_group());
        assert_eq!(root.name, "menu");
        assert!(!scene.is_alive());
    }

    #[test]
    fn test_default_transitions_are_instant() {
        let mut graph = SceneGraph::new();
        let mut scene = SceneBase::new(&mut graph, "s");

        let mut t = scene.in_transition();
        assert_eq!(t.state(), TransitionState::Idle);
        t.start(&mut graph);
        assert!(t.step(0.0, &mut graph));
    }
}
