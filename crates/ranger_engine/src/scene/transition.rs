//! Scene transitions
//!
//! A transition animates a scene onto or off the stage. The scene manager
//! starts it, steps it once per frame until it reports completion, then
//! stops it.

use log::warn;

use crate::foundation::collections::NodeKey;
use crate::foundation::math::Vec3;

use super::graph::SceneGraph;
use super::node::Transformable;

/// Lifecycle of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    /// Not started yet
    #[default]
    Idle,
    /// Started, not finished
    Running,
    /// Finished or stopped
    Complete,
}

/// Animation run while a scene enters or leaves.
pub trait Transition {
    /// Capture starting state and begin running
    fn start(&mut self, graph: &mut SceneGraph);

    /// Advance by `dt` seconds. Returns `true` exactly once, on the step
    /// that completes the transition.
    fn step(&mut self, dt: f32, graph: &mut SceneGraph) -> bool;

    /// Jump to the end state. Safe to call on a transition that never
    /// started, in which case nothing happens.
    fn stop(&mut self, graph: &mut SceneGraph);

    /// Current lifecycle state
    fn state(&self) -> TransitionState;
}

/// Transition that completes on its first step, whatever `dt` is.
#[derive(Debug, Default)]
pub struct InstantTransition {
    state: TransitionState,
}

impl InstantTransition {
    /// Create an idle transition
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transition for InstantTransition {
    fn start(&mut self, _graph: &mut SceneGraph) {
        self.state = TransitionState::Running;
    }

    fn step(&mut self, _dt: f32, _graph: &mut SceneGraph) -> bool {
        if self.state == TransitionState::Complete {
            return false;
        }
        self.state = TransitionState::Complete;
        true
    }

    fn stop(&mut self, _graph: &mut SceneGraph) {
        if self.state != TransitionState::Idle {
            self.state = TransitionState::Complete;
        }
    }

    fn state(&self) -> TransitionState {
        self.state
    }
}

/// Moves a scene root linearly between two offsets from its resting
/// position over a fixed duration.
#[derive(Debug)]
pub struct SlideTransition {
    root: NodeKey,
    from: Vec3,
    to: Vec3,
    duration: f32,
    elapsed: f32,
    baseline: Vec3,
    state: TransitionState,
}

impl SlideTransition {
    /// Slide `root` from `from` to `to`, both offsets from its position at
    /// [`Transition::start`].
    pub fn new(root: NodeKey, from: Vec3, to: Vec3, duration: f32) -> Self {
        Self {
            root,
            from,
            to,
            duration,
            elapsed: 0.0,
            baseline: Vec3::zeros(),
            state: TransitionState::Idle,
        }
    }

    /// Enter from `offset` and come to rest at the resting position
    pub fn slide_in(root: NodeKey, offset: Vec3, duration: f32) -> Self {
        Self::new(root, offset, Vec3::zeros(), duration)
    }

    /// Leave the resting position towards `offset`
    pub fn slide_out(root: NodeKey, offset: Vec3, duration: f32) -> Self {
        Self::new(root, Vec3::zeros(), offset, duration)
    }

    /// Fraction of the duration elapsed, in `0..=1`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    fn place(&self, graph: &mut SceneGraph, t: f32) {
        let offset = self.from.lerp(&self.to, t);
        match graph.node_mut(self.root) {
            Some(node) => node.transform_mut().set_position_vec(&(self.baseline + offset)),
            None => warn!("slide transition target {:?} no longer exists", self.root),
        }
    }
}

impl Transition for SlideTransition {
    fn start(&mut self, graph: &mut SceneGraph) {
        self.baseline = graph
            .node(self.root)
            .map_or_else(Vec3::zeros, |n| n.transform().position());
        self.elapsed = 0.0;
        self.state = TransitionState::Running;
        self.place(graph, 0.0);
    }

    fn step(&mut self, dt: f32, graph: &mut SceneGraph) -> bool {
        if self.state != TransitionState::Running {
            return false;
        }

        self.elapsed += dt;
        let t = self.progress();
        self.place(graph, t);

        if t >= 1.0 {
            self.state = TransitionState::Complete;
            return true;
        }
        false
    }

    fn stop(&mut self, graph: &mut SceneGraph) {
        if self.state == TransitionState::Idle {
            return;
        }
        if self.state == TransitionState::Running {
            self.place(graph, 1.0);
        }
        self.state = TransitionState::Complete;
    }

    fn state(&self) -> TransitionState {
        self.state
    }
}
