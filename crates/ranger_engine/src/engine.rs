//! Engine bootstrap and main loop
//!
//! The engine owns the [`Settings`] and the [`Stage`]. A game plugs in
//! through [`GameShell`], the window system through [`Host`] and the GPU
//! through [`GraphicsDevice`], so the same loop runs against a real window
//! or the [`HeadlessHost`] and headless device.

use std::collections::VecDeque;

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::{Config, ConfigError, Settings};
use crate::foundation::logging;
use crate::foundation::time::Timer;
use crate::input::{Event, EventDispatcher, EventListener};
use crate::render::atlas::BasicAtlas;
use crate::render::device::GraphicsDevice;
use crate::render::shader::{basic, Shader};
use crate::render::RenderError;
use crate::scene::{Scene, SceneError, SceneGraph};
use crate::stage::Stage;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// The settings switched the engine off
    #[error("engine is not enabled in the configuration")]
    Disabled,

    /// Settings could not be loaded or are invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rendering setup or a frame failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A scene stack operation failed
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// The window system failed
    #[error("host error: {0}")]
    Host(String),
}

/// The game's hook into the engine.
pub trait GameShell {
    /// Called once before the loop starts. Push the game's scenes and adjust
    /// settings here. Returning `false` leaves without starting the loop.
    fn configure(&mut self, engine: &mut Engine) -> bool;
}

/// Window system the engine runs in.
pub trait Host {
    /// Create the window for `settings`
    fn open(&mut self, settings: &Settings) -> Result<(), EngineError>;

    /// Collect the events that arrived since the last poll
    fn poll(&mut self) -> Vec<Event>;

    /// Whether the window is still open
    fn is_running(&self) -> bool;

    /// Present the frame
    fn swap(&mut self);

    /// Ask the window to close after the current frame
    fn request_quit(&mut self);

    /// Tear the window down
    fn close(&mut self) {}
}

/// Host without a window. Runs a fixed number of frames and replays events
/// queued ahead of time.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    loop_for: Option<u32>,
    frames: u32,
    open: bool,
    quit_requested: bool,
    pending: VecDeque<(u32, Event)>,
}

impl HeadlessHost {
    /// Host running for the settings' `LoopFor` frames
    pub fn new() -> Self {
        Self::default()
    }

    /// Host running exactly `frames` frames, overriding the settings
    pub fn with_frames(frames: u32) -> Self {
        Self {
            loop_for: Some(frames),
            ..Self::default()
        }
    }

    /// Deliver `event` on the poll of frame `frame` (0 based)
    pub fn queue_event(&mut self, frame: u32, event: Event) {
        self.pending.push_back((frame, event));
    }

    /// Frames presented so far
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Whether something asked the host to quit
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

impl Host for HeadlessHost {
    fn open(&mut self, settings: &Settings) -> Result<(), EngineError> {
        let frames = *self.loop_for.get_or_insert(settings.engine.loop_for);
        if frames == 0 {
            warn!("headless host has no frame limit; running until the scenes finish");
        }
        info!("headless host '{}' open for {frames} frames", settings.window.title);
        self.open = true;
        Ok(())
    }

    fn poll(&mut self) -> Vec<Event> {
        let frame = self.frames;
        let mut due = Vec::new();
        self.pending.retain(|(at, event)| {
            if *at <= frame {
                due.push(event.clone());
                false
            } else {
                true
            }
        });
        due
    }

    fn is_running(&self) -> bool {
        if !self.open || self.quit_requested {
            return false;
        }
        match self.loop_for {
            Some(0) | None => true,
            Some(limit) => self.frames < limit,
        }
    }

    fn swap(&mut self) {
        self.frames += 1;
    }

    fn request_quit(&mut self) {
        debug!("quit requested at frame {}", self.frames);
        self.quit_requested = true;
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Core engine: settings, stage and the frame loop.
pub struct Engine {
    settings: Settings,
    stage: Stage,
    timer: Timer,
    listeners: EventDispatcher,
    frames: u64,
}

impl Engine {
    /// Engine using `settings`
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            stage: Stage::default(),
            timer: Timer::new(),
            listeners: EventDispatcher::new(),
            frames: 0,
        }
    }

    /// Engine with settings loaded from `path`
    pub fn from_config_file(path: &str) -> Result<Self, EngineError> {
        let settings = Settings::load_from_file(path)?;
        Ok(Self::new(settings))
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings, adjustable until launch
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Stage
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Stage, mutable
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Graph the scenes build their nodes into
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        self.stage.scenes_mut().graph_mut()
    }

    /// Make `scene` the active scene
    pub fn push_scene(&mut self, scene: Box<dyn Scene>) -> Result<(), EngineError> {
        self.stage.scenes_mut().push(scene)?;
        Ok(())
    }

    /// Stack `scene` beneath the active one
    pub fn add_scene(&mut self, scene: Box<dyn Scene>) -> Result<(), EngineError> {
        self.stage.scenes_mut().add(scene)?;
        Ok(())
    }

    /// Register an input listener on top of the existing ones
    pub fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.register(listener);
    }

    /// Replace the frame timer, e.g. with [`Timer::fixed`]
    pub fn set_timer(&mut self, timer: Timer) {
        self.timer = timer;
    }

    /// Frames rendered by the last launch
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Configure the game and run the loop until the host closes or the
    /// scenes run out.
    pub fn launch(
        &mut self,
        host: &mut dyn Host,
        device: &mut dyn GraphicsDevice,
        game: &mut dyn GameShell,
    ) -> Result<(), EngineError> {
        logging::init_with_level(&self.settings.engine.log_level);
        info!("engine configuring...");

        if !game.configure(self) {
            info!("game declined to configure; not starting");
            return Ok(());
        }

        if !self.settings.engine.enabled {
            return Err(EngineError::Disabled);
        }
        self.settings.validate()?;

        if self.settings.engine.show_config {
            info!("{:#?}", self.settings);
        }

        info!("engine starting...");
        host.open(&self.settings)?;
        let result = self.run(host, device);
        host.close();
        info!("engine stopped after {} frames", self.frames);
        result
    }

    fn run(&mut self, host: &mut dyn Host, device: &mut dyn GraphicsDevice) -> Result<(), EngineError> {
        self.stage.configure(&self.settings);
        device.set_clear_color(&self.settings.window.clear_color);

        if self.settings.engine.show_gl_info {
            info!(
                "requested GL {}.{}",
                self.settings.engine.gl_major_version, self.settings.engine.gl_minor_version
            );
        }

        let shader = Shader::from_source(device, basic::VERTEX, basic::FRAGMENT)?;
        let mut atlas = BasicAtlas::build();
        atlas.object_mut().bind(device);

        let refresh = self.settings.engine.fps_refresh_rate;
        let mut since_report = 0.0;
        let mut frames_since_report = 0u32;
        self.frames = 0;

        while host.is_running() {
            for mut event in host.poll() {
                self.listeners.dispatch(&mut event);
                if !event.is_handled() && event.requests_quit() {
                    info!("quit key pressed");
                    host.request_quit();
                }
            }

            let dt = self.timer.tick();
            if !self.stage.step(dt) {
                info!("stage has nothing left to run");
                break;
            }

            device.clear();
            self.stage.render(device, &atlas, &shader)?;
            host.swap();
            self.frames += 1;

            if self.settings.engine.show_timing_info {
                since_report += dt;
                frames_since_report += 1;
                if since_report >= refresh {
                    #[allow(clippy::cast_precision_loss)]
                    let fps = frames_since_report as f32 / since_report;
                    info!("fps {fps:.1}, frame {:.3} ms", dt * 1000.0);
                    since_report = 0.0;
                    frames_since_report = 0;
                }
            }
        }

        Ok(())
    }
}
