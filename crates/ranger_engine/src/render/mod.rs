//! # Rendering boundary
//!
//! Backend agnostic rendering for the 2D engine. Everything here talks to the
//! GPU through the [`GraphicsDevice`] trait, so the same buffers, shaders and
//! atlases drive a real GL context or the recording [`HeadlessDevice`] used by
//! tests and headless hosts.
//!
//! ## Layout
//!
//! - **Device**: the trait every backend implements, plus the headless one
//! - **Buffers**: vertex and element buffer objects, the mesh owning them and
//!   the vertex array tying a mesh to its attribute layout
//! - **Shaders**: program loading, compilation and linking
//! - **Atlas**: named vector shapes packed into one shared mesh
//! - **Color** and **Camera**: clear colors, palette, projection and view

use thiserror::Error;

use crate::scene::SceneError;

pub mod atlas;
pub mod buffer;
pub mod camera;
pub mod color;
pub mod device;
pub mod mesh;
pub mod shader;
pub mod vao;

pub use atlas::{Atlas, BasicAtlas, VectorAtlas, VectorObject, VectorShape};
pub use buffer::{BufferObject, Ebo, Vbo};
pub use camera::{Camera, View, Viewport};
pub use color::{Color, ColorError};
pub use device::{
    BufferTarget, DeviceCall, GraphicsDevice, HeadlessDevice, PrimitiveMode, ShaderStage,
};
pub use mesh::Mesh;
pub use shader::Shader;
pub use vao::Vao;

/// Rendering error types
///
/// Construction time failures (shader compile and link, asset reads) are
/// reported to the caller, who decides whether to abort startup.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A shader stage failed to compile
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile {
        /// Stage that failed
        stage: ShaderStage,
        /// Compiler log
        log: String,
    },

    /// Compiled stages failed to link into a program
    #[error("shader program failed to link: {0}")]
    ShaderLink(String),

    /// Shader or asset file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The atlas has no shape by that name
    #[error("unknown shape '{0}'")]
    UnknownShape(String),

    /// The scene graph could not be walked for drawing
    #[error("scene traversal failed: {0}")]
    Scene(#[from] SceneError),

    /// Backend specific failure
    #[error("graphics device error: {0}")]
    Device(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
