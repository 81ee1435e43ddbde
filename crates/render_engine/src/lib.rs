//! # Render Engine
//!
//! A small scene renderer with forward and deferred shading, directional and
//! point-light shadow maps, and glTF scene loading.
//!
//! ## Features
//!
//! - **Scene Loading**: glTF / GLB import into an owned, index-based scene asset
//! - **GPU Binding**: buffers, textures and attribute layouts uploaded through a device trait
//! - **Fly Camera**: yaw/pitch/zoom camera driving the view and projection
//! - **Render Passes**: shadow, G-buffer and composite passes in a fixed order
//! - **Devices**: OpenGL 3.3 backend through `glow`, plus a command-recording headless device for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use render_engine::prelude::*;
//!
//! let mut device = HeadlessDevice::new();
//! let config = ApplicationConfig::default();
//!
//! let shaders = ShaderSet::load(&mut device, &config.assets.shaders_dir);
//! let fallback = upload_fallback(&mut device, &config.assets.fallback_texture_path());
//! let scene = Model::load(&mut device, &config.assets.scene_path(), fallback);
//! let point = PointLight::load(
//!     &mut device,
//!     PointLight::DEFAULT_POSITION,
//!     PointLight::DEFAULT_INTENSITY,
//!     &config.assets.light_sphere_path(),
//!     fallback,
//! );
//! let camera = Camera::from_config(&config.camera);
//! let directional = DirectionalLight::default();
//!
//! let mut renderer = FrameRenderer::new(&mut device, &config.renderer, shaders, 1280, 720)?;
//! let inputs = FrameInputs { camera: &camera, scene: &scene, directional: &directional, point: &point };
//! let stats = renderer.render_frame(&mut device, &inputs)?;
//! println!("{} draw calls", stats.draw_calls);
//! # Ok::<(), render_engine::render::RenderError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod input;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, ImageData, SceneAsset},
        core::config::{ApplicationConfig, AssetConfig, CameraConfig, RendererConfig, ShadingMode, ShadowMode},
        config::Config,
        foundation::{
            math::{Mat4, Vec3},
            time::Timer,
        },
        input::{CursorTracker, KeyCode, ViewerInput},
        render::{
            resources::uploader::upload_fallback,
            Camera, CameraMovement, DirectionalLight, FrameInputs, FrameRenderer, FrameStats, GraphicsDevice,
            GlDevice, HeadlessDevice, Model, PassKind, PointLight, RenderError, ShaderSet,
        },
    };
}
