//! # Rendering System
//!
//! Backend-agnostic rendering core for the scene viewer.
//!
//! ## Architecture
//!
//! - **API**: [`GraphicsDevice`](api::GraphicsDevice) trait, shader program wrapper, error-queue checks
//! - **Backends**: OpenGL 3.3 device and the headless reference device
//! - **Primitives**: fly camera
//! - **Resources**: GPU uploads, materials, primitives, meshes and models
//! - **Systems**: directional and point lights
//! - **Passes**: render targets and the per-frame pass orchestrator
//!
//! Every module is written against `&mut dyn GraphicsDevice`; none of them
//! talk to a windowing system.

pub mod api;
pub mod backends;
pub mod passes;
pub mod primitives;
pub mod resources;
pub mod systems;

pub use api::{GraphicsDevice, ShaderProgram, ShaderSet};
pub use backends::{GlDevice, HeadlessDevice};
pub use passes::{FrameInputs, FrameRenderer, FrameStats, PassKind};
pub use primitives::{Camera, CameraMovement};
pub use resources::{Material, Mesh, Model, Primitive};
pub use systems::lighting::{DirectionalLight, PointLight};

use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer setup failed
    ///
    /// Raised when render targets or the shader set can not be created.
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A draw or pass failed while recording a frame
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// A GPU resource could not be created
    ///
    /// Buffers, textures, vertex arrays and framebuffers report through this
    /// variant; the offending resource is described in the message.
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    BackendError(String),

    /// A pass was begun out of order
    #[error("Pass {requested:?} can not run after {previous:?}")]
    PassOrder {
        /// Pass that was requested
        requested: PassKind,
        /// Pass that ran last in this frame, if any
        previous: Option<PassKind>,
    },
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
