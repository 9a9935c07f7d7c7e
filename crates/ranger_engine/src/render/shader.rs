//! Shader programs

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::device::{GraphicsDevice, ProgramId, ShaderStage};
use super::RenderError;

/// A vertex and fragment shader pair linked into one program.
///
/// Created blank from two file names; [`Shader::load`] reads them from an
/// asset directory, compiles and links them.
#[derive(Debug, Clone)]
pub struct Shader {
    vertex_src: PathBuf,
    fragment_src: PathBuf,
    vertex_code: String,
    fragment_code: String,
    program: Option<ProgramId>,
}

impl Shader {
    /// Blank shader referring to two files relative to the asset directory
    pub fn new(vertex_src: impl Into<PathBuf>, fragment_src: impl Into<PathBuf>) -> Self {
        Self {
            vertex_src: vertex_src.into(),
            fragment_src: fragment_src.into(),
            vertex_code: String::new(),
            fragment_code: String::new(),
            program: None,
        }
    }

    /// Compile and link in-memory sources
    pub fn from_source(
        device: &mut dyn GraphicsDevice,
        vertex_code: &str,
        fragment_code: &str,
    ) -> Result<Self, RenderError> {
        let mut shader = Self::new("<memory>", "<memory>");
        shader.vertex_code = vertex_code.to_string();
        shader.fragment_code = fragment_code.to_string();
        shader.link(device)?;
        Ok(shader)
    }

    /// Read both sources from `asset_dir`, then compile and link them.
    pub fn load(&mut self, device: &mut dyn GraphicsDevice, asset_dir: &Path) -> Result<(), RenderError> {
        self.vertex_code = fs::read_to_string(asset_dir.join(&self.vertex_src))?;
        self.fragment_code = fs::read_to_string(asset_dir.join(&self.fragment_src))?;
        self.link(device)
    }

    fn link(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), RenderError> {
        let vertex = device.compile_shader(ShaderStage::Vertex, &self.vertex_code)?;
        let fragment = device.compile_shader(ShaderStage::Fragment, &self.fragment_code)?;
        debug!("compiled shader stages {vertex} and {fragment}");

        let program = device.link_program(vertex, fragment)?;
        device.delete_shader(vertex);
        device.delete_shader(fragment);

        info!(
            "linked shader program {program} ({}, {})",
            self.vertex_src.display(),
            self.fragment_src.display()
        );
        self.program = Some(program);
        Ok(())
    }

    /// Linked program, once loaded
    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    /// Make the program current. Does nothing before a successful load.
    pub fn activate(&self, device: &mut dyn GraphicsDevice) {
        if let Some(program) = self.program {
            device.use_program(program);
        }
    }
}

/// Minimal flat color shader pair used by the stage
pub mod basic {
    /// Vertex stage: model, view and projection uniforms
    pub const VERTEX: &str = "#version 450 core
layout (location = 0) in vec3 aPos;
uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;
void main() {
    gl_Position = projection * view * model * vec4(aPos, 1.0);
}
";

    /// Fragment stage: one uniform color
    pub const FRAGMENT: &str = "#version 450 core
out vec4 FragColor;
uniform vec4 fragColor;
void main() {
    FragColor = fragColor;
}
";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::{DeviceCall, HeadlessDevice};

    #[test]
    fn test_from_source_links_and_frees_stages() {
        let mut device = HeadlessDevice::new();
        let shader = Shader::from_source(&mut device, basic::VERTEX, basic::FRAGMENT).unwrap();
        let program = shader.program().unwrap();

        let deletes = device
            .calls()
            .iter()
            .filter(|c| matches!(c, DeviceCall::DeleteShader(_)))
            .count();
        assert_eq!(deletes, 2);

        shader.activate(&mut device);
        assert_eq!(device.calls().last(), Some(&DeviceCall::UseProgram(program)));
    }

    #[test]
    fn test_compile_failure_is_reported() {
        let mut device = HeadlessDevice::new();
        let err = Shader::from_source(&mut device, basic::VERTEX, "#error nope").unwrap_err();
        assert!(matches!(
            err,
            RenderError::ShaderCompile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let mut device = HeadlessDevice::new();
        let mut shader = Shader::new("missing.vs", "missing.fs");
        let err = shader
            .load(&mut device, Path::new("/nonexistent/ranger/assets"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
        assert!(shader.program().is_none());
    }

    #[test]
    fn test_load_reads_asset_dir() {
        let dir = std::env::temp_dir().join(format!("ranger_shader_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("basic.vs"), basic::VERTEX).unwrap();
        fs::write(dir.join("basic.fs"), basic::FRAGMENT).unwrap();

        let mut device = HeadlessDevice::new();
        let mut shader = Shader::new("basic.vs", "basic.fs");
        shader.load(&mut device, &dir).unwrap();
        assert!(shader.program().is_some());

        fs::remove_dir_all(&dir).unwrap();
    }
}
