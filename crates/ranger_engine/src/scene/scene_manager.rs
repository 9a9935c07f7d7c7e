//! Scene stack with enter and exit transitions
//!
//! The manager owns the [`SceneGraph`] every scene builds into, a bounded
//! stack of scenes, the scene currently leaving the stage and at most one
//! transition per direction. The top of the stack is the active scene once
//! transitions settle.
//!
//! Displacing the active scene (by [`SceneManager::push`] or
//! [`SceneManager::pop`]) moves it off the stack into the outgoing slot and
//! starts the out-transition it supplies. The incoming scene supplies its own
//! in-transition. Gameplay stepping of the active scene is gated on both
//! transitions being idle. An active scene that clears its alive flag during
//! its step is displaced the same way as by a pop.

use log::{debug, info, warn};

use crate::foundation::math::Mat4;

use super::base::Scene;
use super::error::SceneError;
use super::graph::{DrawList, SceneGraph, Traversable};
use super::transition::Transition;

/// Default maximum number of stacked scenes.
pub const DEFAULT_MAX_SCENES: usize = 10;

/// Combined state of the active slot and both transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No active scene and no transition running
    Empty,
    /// A scene is active and no transition runs
    ActiveNoTransition,
    /// Only an in-transition runs
    TransitioningIn,
    /// Only an out-transition runs
    TransitioningOut,
    /// Both transitions run
    TransitioningBoth,
}

/// Stack based scene controller.
pub struct SceneManager {
    graph: SceneGraph,
    scenes: Vec<Box<dyn Scene>>,
    capacity: usize,
    top_active: bool,
    outgoing: Option<Box<dyn Scene>>,
    transition_in: Option<Box<dyn Transition>>,
    transition_out: Option<Box<dyn Transition>>,
    exhausted_reported: bool,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SCENES)
    }
}

impl SceneManager {
    /// Create a manager holding at most `capacity` scenes
    pub fn new(capacity: usize) -> Self {
        Self {
            graph: SceneGraph::new(),
            scenes: Vec::with_capacity(capacity),
            capacity,
            top_active: false,
            outgoing: None,
            transition_in: None,
            transition_out: None,
            exhausted_reported: false,
        }
    }

    /// Graph shared by all scenes
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Graph shared by all scenes, for building scene content
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Maximum number of stacked scenes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stacked scenes, excluding the outgoing one
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the stack holds no scenes
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// The active scene, if any
    pub fn active_scene(&self) -> Option<&dyn Scene> {
        if self.top_active {
            self.scenes.last().map(|s| &**s)
        } else {
            None
        }
    }

    /// The scene currently transitioning out, if any
    pub fn outgoing_scene(&self) -> Option<&dyn Scene> {
        self.outgoing.as_deref()
    }

    /// Combined slot state
    pub fn slot_state(&self) -> SlotState {
        match (self.transition_in.is_some(), self.transition_out.is_some()) {
            (true, true) => SlotState::TransitioningBoth,
            (true, false) => SlotState::TransitioningIn,
            (false, true) => SlotState::TransitioningOut,
            (false, false) if self.top_active => SlotState::ActiveNoTransition,
            (false, false) => SlotState::Empty,
        }
    }

    fn check_capacity(&self) -> Result<(), SceneError> {
        if self.scenes.len() >= self.capacity {
            return Err(SceneError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Stack a scene without activating it.
    ///
    /// With an active scene the new one goes directly beneath it, so it
    /// becomes active when the active scene is popped. Otherwise it goes on
    /// top and is promoted by the next [`SceneManager::step`].
    pub fn add(&mut self, scene: Box<dyn Scene>) -> Result<(), SceneError> {
        self.check_capacity()?;
        debug!("adding scene '{}'", scene.name());

        if self.top_active {
            let below_top = self.scenes.len() - 1;
            self.scenes.insert(below_top, scene);
        } else {
            self.scenes.push(scene);
        }
        Ok(())
    }

    /// Make `scene` the active scene.
    ///
    /// The previously active scene, if any, leaves the stack and plays its
    /// out-transition while `scene` plays its in-transition.
    pub fn push(&mut self, scene: Box<dyn Scene>) -> Result<(), SceneError> {
        self.check_capacity()?;

        if self.top_active {
            self.displace_active();
        }

        info!("pushing scene '{}'", scene.name());
        self.scenes.push(scene);
        self.activate_top();
        Ok(())
    }

    /// Send the active scene off stage. The next scene down, if any, becomes
    /// active on the following [`SceneManager::step`].
    pub fn pop(&mut self) -> Result<(), SceneError> {
        if !self.top_active {
            return Err(SceneError::NoActiveScene);
        }
        self.displace_active();
        Ok(())
    }

    fn pop_scene(&mut self) -> Box<dyn Scene> {
        match self.scenes.pop() {
            Some(scene) => scene,
            None => panic!("scene stack popped while empty"),
        }
    }

    fn displace_active(&mut self) {
        if let Some(mut previous) = self.transition_out.take() {
            warn!("out-transition still running; finishing it early");
            previous.stop(&mut self.graph);
            self.finalize_outgoing();
        }

        // The displaced scene's in-transition, if still running, is cut short.
        if let Some(mut entering) = self.transition_in.take() {
            entering.stop(&mut self.graph);
        }

        let mut scene = self.pop_scene();
        self.top_active = false;

        let mut out = scene.out_transition();
        out.start(&mut self.graph);
        debug!("scene '{}' transitioning out", scene.name());

        self.transition_out = Some(out);
        self.outgoing = Some(scene);
    }

    fn activate_top(&mut self) {
        let Some(scene) = self.scenes.last_mut() else {
            return;
        };

        scene.enter(&mut self.graph);
        let mut t = scene.in_transition();
        t.start(&mut self.graph);
        scene.set_alive(true);
        debug!("scene '{}' transitioning in", scene.name());

        self.transition_in = Some(t);
        self.top_active = true;
    }

    fn finalize_outgoing(&mut self) {
        let Some(mut scene) = self.outgoing.take() else {
            return;
        };

        scene.set_alive(false);
        scene.exit(&mut self.graph);
        if let Err(e) = self.graph.remove(scene.root()) {
            warn!("scene '{}' root already gone: {e}", scene.name());
        }
        info!("scene '{}' finished", scene.name());
    }

    /// Advance one frame.
    ///
    /// Returns `false` when there is nothing left to run: the stack is empty
    /// and no scene is leaving. The host should stop its loop then.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.scenes.is_empty() && self.outgoing.is_none() {
            if !self.exhausted_reported {
                info!("no more scenes to run");
                self.exhausted_reported = true;
            }
            return false;
        }
        self.exhausted_reported = false;

        if let Some(mut t) = self.transition_in.take() {
            if t.step(dt, &mut self.graph) {
                t.stop(&mut self.graph);
                debug!("in-transition complete");
            } else {
                self.transition_in = Some(t);
            }
        }

        if let Some(mut t) = self.transition_out.take() {
            if t.step(dt, &mut self.graph) {
                t.stop(&mut self.graph);
                debug!("out-transition complete");
                self.finalize_outgoing();
            } else {
                self.transition_out = Some(t);
            }
        }

        if !self.top_active && !self.scenes.is_empty() {
            self.activate_top();
        }

        if self.top_active && self.transition_in.is_none() && self.transition_out.is_none() {
            let retired = match self.scenes.last_mut() {
                Some(scene) => {
                    scene.step(dt, &mut self.graph);
                    !scene.is_alive()
                }
                None => false,
            };

            // A scene marking itself dead during its step leaves the stage.
            if retired {
                self.displace_active();
            }
        }

        true
    }

    /// Draw list for the frame: the outgoing scene first, then the active
    /// scene on top of it.
    pub fn visit(&mut self, parent_world: &Mat4) -> Result<DrawList, SceneError> {
        let mut draws = DrawList::new();

        if let Some(scene) = &self.outgoing {
            self.graph.visit(scene.root(), parent_world, &mut draws)?;
        }

        if self.top_active {
            if let Some(scene) = self.scenes.last() {
                self.graph.visit(scene.root(), parent_world, &mut draws)?;
            }
        }

        Ok(draws)
    }
}
