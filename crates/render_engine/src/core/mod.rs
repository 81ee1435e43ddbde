//! # Core Engine Module
//!
//! Shared configuration that the application, the renderer and the asset
//! loaders all read from.

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

pub use config::{
    ApplicationConfig,
    AssetConfig,
    CameraConfig,
    RendererConfig,
    ShadingMode,
    ShadowMode,
    WindowConfig,
};
pub use crate::config::{Config, ConfigError};
