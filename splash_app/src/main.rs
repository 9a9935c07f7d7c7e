//! Splash demo application
//!
//! Shows a splash scene that slides in, holds for a moment and slides out,
//! revealing the game scene stacked beneath it. Runs headless; pass a
//! settings file (`.json`, `.toml` or `.ron`) as the first argument to
//! override the defaults.

use ranger_engine::prelude::*;

const FRAME_STEP: f32 = 1.0 / 60.0;

struct SplashScene {
    base: SceneBase,
    spinner: NodeKey,
    hold: f32,
    elapsed: f32,
}

impl SplashScene {
    fn new(graph: &mut SceneGraph, hold: f32) -> Result<Self, SceneError> {
        let base = SceneBase::new(graph, "Splash");

        let backdrop = Node::shape("backdrop", Visual::new(CENTERED_SQUARE, Color::from_ints(32, 32, 48, 255)))
            .with_z_order(-1);
        let backdrop = graph.spawn_child(base.root(), backdrop)?;
        graph.try_node_mut(backdrop)?.transform_mut().scale_by(400.0);

        let spinner = Node::shape("spinner", Visual::new(CENTERED_TRIANGLE, Color::from_ints(255, 200, 0, 255)));
        let spinner = graph.spawn_child(base.root(), spinner)?;
        graph.try_node_mut(spinner)?.transform_mut().scale_by(100.0);

        Ok(Self {
            base,
            spinner,
            hold,
            elapsed: 0.0,
        })
    }
}

impl Scene for SplashScene {
    fn base(&self) -> &SceneBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SceneBase {
        &mut self.base
    }

    fn step(&mut self, dt: f32, graph: &mut SceneGraph) {
        if let Some(node) = graph.node_mut(self.spinner) {
            node.transform_mut().rotate_by(to_radians(90.0) * dt);
        }

        self.elapsed += dt;
        if self.elapsed >= self.hold {
            log::info!("splash done after {:.2}s", self.elapsed);
            self.set_alive(false);
        }
    }

    fn in_transition(&mut self) -> Box<dyn Transition> {
        Box::new(SlideTransition::slide_in(self.root(), Vec3::new(-1024.0, 0.0, 0.0), 0.5))
    }

    fn out_transition(&mut self) -> Box<dyn Transition> {
        Box::new(SlideTransition::slide_out(self.root(), Vec3::new(1024.0, 0.0, 0.0), 0.5))
    }
}

struct GameScene {
    base: SceneBase,
    ship: NodeKey,
    remaining: f32,
}

impl GameScene {
    fn new(graph: &mut SceneGraph, duration: f32) -> Result<Self, SceneError> {
        let base = SceneBase::new(graph, "Game");

        let ship = Node::shape("ship", Visual::new(SQUARE, Color::from_ints(0, 200, 255, 255))).at(-300.0, 0.0);
        let ship = graph.spawn_child(base.root(), ship)?;
        graph.try_node_mut(ship)?.transform_mut().scale_by(25.0);

        Ok(Self {
            base,
            ship,
            remaining: duration,
        })
    }
}

impl Scene for GameScene {
    fn base(&self) -> &SceneBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SceneBase {
        &mut self.base
    }

    fn step(&mut self, dt: f32, graph: &mut SceneGraph) {
        if let Some(node) = graph.node_mut(self.ship) {
            node.transform_mut().move_by_2d(120.0 * dt, 0.0);
        }

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.set_alive(false);
        }
    }
}

struct SplashGame;

impl SplashGame {
    fn build(engine: &mut Engine) -> Result<(), EngineError> {
        let splash = SplashScene::new(engine.graph_mut(), 2.0)?;
        let game = GameScene::new(engine.graph_mut(), 5.0)?;
        engine.push_scene(Box::new(splash))?;
        engine.add_scene(Box::new(game))?;
        Ok(())
    }
}

impl GameShell for SplashGame {
    fn configure(&mut self, engine: &mut Engine) -> bool {
        engine.settings_mut().window.title = "Ranger Splash".to_string();
        match Self::build(engine) {
            Ok(()) => true,
            Err(e) => {
                log::error!("failed to build scenes: {e}");
                false
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut engine = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading settings from {path}");
            Engine::from_config_file(&path)?
        }
        None => Engine::new(Settings::default()),
    };
    engine.set_timer(Timer::fixed(FRAME_STEP));

    let mut host = HeadlessHost::new();
    let mut device = HeadlessDevice::new();
    engine.launch(&mut host, &mut device, &mut SplashGame)?;

    log::info!(
        "ran {} frames, {} draw calls",
        engine.frames(),
        device.draw_count()
    );
    Ok(())
}
