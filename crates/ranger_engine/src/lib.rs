//! # Ranger Engine
//!
//! A minimal 2D game engine skeleton built around a scene graph.
//!
//! ## Features
//!
//! - **Scene Graph**: arena owned nodes with lazily cached local transforms
//!   and z-ordered groups
//! - **Scene Stack**: bounded stack of scenes with in and out transitions
//! - **Rendering Boundary**: vector shape atlas, shaders and buffers behind a
//!   [`render::GraphicsDevice`] trait, with a recording headless device
//! - **Configuration**: JSON (with comments), TOML or RON settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ranger_engine::prelude::*;
//!
//! struct Game;
//!
//! impl GameShell for Game {
//!     fn configure(&mut self, engine: &mut Engine) -> bool {
//!         let scene = SceneBase::new(engine.graph_mut(), "main");
//!         engine.push_scene(Box::new(scene)).is_ok()
//!     }
//! }
//!
//! fn main() -> Result<(), EngineError> {
//!     let mut engine = Engine::new(Settings::default());
//!     let mut host = HeadlessHost::with_frames(60);
//!     let mut device = HeadlessDevice::new();
//!     engine.launch(&mut host, &mut device, &mut Game)
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;

mod engine;
mod stage;

pub use engine::{Engine, EngineError, GameShell, HeadlessHost, Host};
pub use stage::Stage;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, Settings},
        foundation::{
            collections::NodeKey,
            math::{to_degrees, to_radians, Mat4, Mat4Ext, Vec2, Vec3},
            rectangle::Rectangle,
            time::Timer,
        },
        input::{Action, Event, EventKind, EventListener, KeyCode, Modifiers},
        render::{
            atlas::{CENTERED_SQUARE, CENTERED_TRIANGLE, SQUARE},
            Color, GraphicsDevice, HeadlessDevice, RenderError,
        },
        scene::{
            InstantTransition, Node, Scene, SceneBase, SceneError, SceneGraph, SceneManager,
            SlideTransition, Transformable, Transition, Visual,
        },
        Engine, EngineError, GameShell, HeadlessHost, Host, Stage,
    };
}
