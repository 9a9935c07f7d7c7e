//! The stage: scene stack plus the camera it is viewed through
//!
//! [`Stage::configure`] derives the projection from the window settings.
//! Each frame the engine steps the stage and then renders it: the scene
//! manager produces a draw list and every leaf with a visual is drawn from
//! the shape atlas with the flat color shader.

use log::{debug, info};

use crate::config::Settings;
use crate::foundation::math::Mat4;
use crate::render::atlas::Atlas;
use crate::render::camera::{Camera, View, Viewport};
use crate::render::device::GraphicsDevice;
use crate::render::shader::Shader;
use crate::render::RenderError;
use crate::scene::{Node, NodeRenderer, SceneGraph, SceneManager, Traversable};

const MODEL_UNIFORM: &str = "model";
const VIEW_UNIFORM: &str = "view";
const PROJECTION_UNIFORM: &str = "projection";
const COLOR_UNIFORM: &str = "fragColor";

/// Scene manager, camera and view for one window.
pub struct Stage {
    scenes: SceneManager,
    camera: Camera,
    view: View,
    viewport: Viewport,
    view_projection: Mat4,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(SceneManager::default())
    }
}

impl Stage {
    /// Stage around `scenes` with an identity camera
    pub fn new(scenes: SceneManager) -> Self {
        Self {
            scenes,
            camera: Camera::new(),
            view: View::new(),
            viewport: Viewport::default(),
            view_projection: Mat4::identity(),
        }
    }

    /// Set up the viewport, projection and view from `settings`.
    pub fn configure(&mut self, settings: &Settings) {
        let window = &settings.window;
        let (width, height) = window.device_res.as_pair();
        self.viewport.set_dimensions(0, 0, width, height);

        let correction = Camera::ratio_correction(window.device_res.as_pair(), window.virtual_res.as_pair());

        #[allow(clippy::cast_precision_loss)]
        let (right, top) = (width as f32, height as f32);
        self.camera.set_projection(correction, 0.0, 0.0, top, right);

        if settings.camera.centered {
            self.camera.centered();
        }

        let offset = settings.camera.view;
        self.view.set_projection(offset.x, offset.y, offset.z);

        self.view_projection = self.camera.matrix() * self.view.matrix();
        info!("stage configured: {width}x{height}, ratio correction {correction}");
    }

    /// Scene stack
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Scene stack, mutable
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// View
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Device viewport
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Projection composed with the view
    pub fn view_projection(&self) -> &Mat4 {
        &self.view_projection
    }

    /// Advance the scenes. `false` once there is nothing left to run.
    pub fn step(&mut self, dt: f32) -> bool {
        self.scenes.step(dt)
    }

    /// Draw the outgoing and active scenes. Returns the number of shapes
    /// drawn.
    pub fn render(
        &mut self,
        device: &mut dyn GraphicsDevice,
        atlas: &Atlas,
        shader: &Shader,
    ) -> Result<usize, RenderError> {
        let draws = self.scenes.visit(&Mat4::identity())?;

        let Some(program) = shader.program() else {
            return Err(RenderError::Device("shader program is not linked".to_string()));
        };

        shader.activate(device);
        if let Some(location) = device.uniform_location(program, VIEW_UNIFORM) {
            device.uniform_matrix4(location, self.view.matrix());
        }
        if let Some(location) = device.uniform_location(program, PROJECTION_UNIFORM) {
            device.uniform_matrix4(location, self.camera.matrix());
        }

        let mut renderer = ShapeRenderer {
            model: device.uniform_location(program, MODEL_UNIFORM),
            color: device.uniform_location(program, COLOR_UNIFORM),
            device,
            atlas,
            drawn: 0,
        };

        atlas.object().activate(renderer.device);
        let graph: &SceneGraph = self.scenes.graph();
        graph.render(&draws, &mut renderer)?;
        atlas.object().deactivate(renderer.device);

        debug!("stage drew {} of {} nodes", renderer.drawn, draws.len());
        Ok(renderer.drawn)
    }
}

/// Draws leaf visuals from the atlas.
struct ShapeRenderer<'a> {
    device: &'a mut dyn GraphicsDevice,
    atlas: &'a Atlas,
    model: Option<i32>,
    color: Option<i32>,
    drawn: usize,
}

impl NodeRenderer for ShapeRenderer<'_> {
    fn render(&mut self, node: &Node, world: &Mat4) -> Result<(), RenderError> {
        let Some(visual) = node.visual() else {
            return Ok(());
        };

        if let Some(location) = self.model {
            self.device.uniform_matrix4(location, world);
        }
        if let Some(location) = self.color {
            self.device.uniform_color(location, &visual.color);
        }

        self.atlas.render(self.device, &visual.shape)?;
        self.drawn += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimensions;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use crate::render::atlas::{BasicAtlas, CENTERED_SQUARE};
    use crate::render::color::Color;
    use crate::render::device::{DeviceCall, HeadlessDevice};
    use crate::render::shader::basic;
    use crate::scene::{SceneBase, Visual};
    use approx::assert_relative_eq;

    fn settings(device: (u32, u32), virtual_res: (u32, u32)) -> Settings {
        let mut settings = Settings::default();
        settings.window.device_res = Dimensions::new(device.0, device.1);
        settings.window.virtual_res = Dimensions::new(virtual_res.0, virtual_res.1);
        settings
    }

    #[test]
    fn test_configure_centers_origin() {
        let mut stage = Stage::default();
        let mut s = settings((800, 600), (800, 600));
        s.camera.view.z = -1.0;
        stage.configure(&s);

        assert_eq!(stage.viewport().width, 800);
        assert_relative_eq!(stage.camera().correction(), 1.0);

        let origin = stage.view_projection().transform_vec3(&Vec3::zeros());
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-5);

        let corner = stage.view_projection().transform_vec3(&Vec3::new(400.0, 300.0, 0.0));
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(corner.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_applies_before_projection() {
        let mut stage = Stage::default();
        let mut s = settings((800, 600), (800, 600));
        s.camera.view.x = 100.0;
        s.camera.view.z = -1.0;
        stage.configure(&s);

        // The view shifts the world right by 100 before projecting.
        let p = stage.view_projection().transform_vec3(&Vec3::new(-100.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_render_draws_visuals_only() {
        let mut device = HeadlessDevice::new();
        let shader = Shader::from_source(&mut device, basic::VERTEX, basic::FRAGMENT).unwrap();
        let mut atlas = BasicAtlas::build();
        atlas.object_mut().bind(&mut device);

        let mut stage = Stage::default();
        stage.configure(&settings((1024, 768), (1024, 768)));

        let scenes = stage.scenes_mut();
        let base = SceneBase::new(scenes.graph_mut(), "scene");
        let red = Color::from_ints(255, 0, 0, 255);
        scenes
            .graph_mut()
            .spawn_child(base.root(), Node::shape("box", Visual::new(CENTERED_SQUARE, red)).at(10.0, 0.0))
            .unwrap();
        scenes.graph_mut().spawn_child(base.root(), Node::leaf("empty")).unwrap();
        scenes.push(Box::new(base)).unwrap();
        assert!(stage.step(0.016));

        device.clear_calls();
        assert_eq!(stage.render(&mut device, &atlas, &shader).unwrap(), 1);
        assert_eq!(device.draw_count(), 1);
        assert!(device
            .calls()
            .iter()
            .any(|c| matches!(c, DeviceCall::UniformColor { color, .. } if *color == red)));
    }

    #[test]
    fn test_render_unknown_shape_fails() {
        let mut device = HeadlessDevice::new();
        let shader = Shader::from_source(&mut device, basic::VERTEX, basic::FRAGMENT).unwrap();
        let atlas = BasicAtlas::build();

        let mut stage = Stage::default();
        let scenes = stage.scenes_mut();
        let base = SceneBase::new(scenes.graph_mut(), "scene");
        scenes
            .graph_mut()
            .spawn_child(base.root(), Node::shape("odd", Visual::new("Hexagon", Color::default())))
            .unwrap();
        scenes.push(Box::new(base)).unwrap();

        let err = stage.render(&mut device, &atlas, &shader).unwrap_err();
        assert!(matches!(err, RenderError::UnknownShape(name) if name == "Hexagon"));
    }

    #[test]
    fn test_render_requires_linked_shader() {
        let mut device = HeadlessDevice::new();
        let atlas = BasicAtlas::build();
        let mut stage = Stage::default();
        let shader = Shader::new("basic.vs", "basic.fs");
        assert!(matches!(
            stage.render(&mut device, &atlas, &shader),
            Err(RenderError::Device(_))
        ));
    }
}
